//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging backend.
//! Entities, repository ports and the post/category services live here;
//! nothing in this crate talks to a database or the network directly.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
