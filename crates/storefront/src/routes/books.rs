//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use bookstall_core::BookId;

use crate::db::{BookFilter, BookRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Book, CurrentUser};
use crate::routes::{MessageQuery, flash_messages};
use crate::state::AppState;

/// Query parameters for the book listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Book listing template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BookListTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub books: Vec<Book>,
    pub categories: Vec<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Book detail template.
#[derive(Template, WebTemplate)]
#[template(path = "books/show.html")]
pub struct BookDetailTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub book: Book,
}

/// Display the catalog, optionally filtered by category or search terms.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<ListQuery>,
) -> Result<BookListTemplate> {
    let repo = BookRepository::new(state.pool());

    // Treat blank form submissions the same as absent parameters.
    let category = query.category.filter(|c| !c.trim().is_empty());
    let search = query.search.filter(|s| !s.trim().is_empty());

    let filter = BookFilter {
        category: category.clone(),
        search: search.clone(),
    };

    let books = repo.list(&filter).await?;
    let categories = repo.categories().await?;

    let (error, success) = flash_messages(&MessageQuery {
        error: query.error,
        success: query.success,
    });

    Ok(BookListTemplate {
        current_user,
        error,
        success,
        books,
        categories,
        category,
        search,
    })
}

/// Display a single book.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<BookDetailTemplate> {
    let book = BookRepository::new(state.pool())
        .get(BookId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("book {id}")))?;

    let (error, success) = flash_messages(&query);

    Ok(BookDetailTemplate {
        current_user,
        error,
        success,
        book,
    })
}
