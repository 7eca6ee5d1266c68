//! Conversions from service views to wire DTOs.

use inkwell_core::domain::{Category, Pagination, User};
use inkwell_core::services::{AuthorRef, CategoryRef, CommentView, PostView};
use inkwell_shared::dto::{
    AuthorSummary, CategoryResponse, CategorySummary, CommentResponse, PaginationMeta,
    PostResponse, UserResponse,
};

pub fn post_response(post: PostView) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        excerpt: post.excerpt,
        featured_image: post.featured_image,
        category: post.category.map(category_summary),
        author: post.author.map(author_summary),
        tags: post.tags,
        is_published: post.is_published,
        view_count: post.view_count,
        comments: post
            .comments
            .map(|comments| comments.into_iter().map(comment_response).collect()),
        comment_count: post.comment_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn comment_response(comment: CommentView) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        user: comment.user.map(author_summary),
        content: comment.content,
        created_at: comment.created_at,
    }
}

pub fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        color: category.color,
        is_active: category.is_active,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
    }
}

pub fn pagination_meta(pagination: Pagination) -> PaginationMeta {
    PaginationMeta {
        page: pagination.page,
        limit: pagination.limit,
        total: pagination.total,
        pages: pagination.pages,
    }
}

fn author_summary(author: AuthorRef) -> AuthorSummary {
    AuthorSummary {
        id: author.id,
        name: author.name,
    }
}

fn category_summary(category: CategoryRef) -> CategorySummary {
    CategorySummary {
        id: category.id,
        name: category.name,
        slug: category.slug,
    }
}
