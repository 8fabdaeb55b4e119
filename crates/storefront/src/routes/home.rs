//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};

use crate::db::BookRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Book, CurrentUser};
use crate::routes::{MessageQuery, flash_messages};
use crate::state::AppState;

/// Number of featured books shown on the home page.
const FEATURED_COUNT: i64 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub featured: Vec<Book>,
}

/// Display the home page with a shelf of featured books.
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Result<HomeTemplate> {
    let featured = BookRepository::new(state.pool()).featured(FEATURED_COUNT).await?;
    let (error, success) = flash_messages(&query);

    Ok(HomeTemplate {
        current_user,
        error,
        success,
        featured,
    })
}
