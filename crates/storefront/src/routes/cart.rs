//! Cart route handlers.
//!
//! All cart routes require a logged-in user. Mutations redirect back with a
//! message code rather than rendering a page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use bookstall_core::{BookId, CartItemId, Price};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CartLine, CurrentUser, cart_total};
use crate::routes::{MessageQuery, flash_messages};
use crate::services::{CartError, CartService};
use crate::state::AppState;

/// Add-to-cart form data.
#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    pub quantity: Option<i64>,
}

/// Quantity update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub quantity: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub lines: Vec<CartLine>,
    pub total: Price,
}

/// Display the cart.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<CartTemplate> {
    let lines = CartService::new(state.pool())
        .lines(user.user_id)
        .await
        .map_err(cart_error)?;
    let total = cart_total(&lines);
    let (error, success) = flash_messages(&query);

    Ok(CartTemplate {
        current_user: Some(user),
        error,
        success,
        lines,
        total,
    })
}

/// Add a book to the cart. Quantity defaults to 1.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<AddForm>,
) -> Response {
    let quantity = form.quantity.unwrap_or(1);

    match CartService::new(state.pool())
        .add(user.user_id, BookId::new(id), quantity)
        .await
    {
        Ok(book) => {
            tracing::debug!(user_id = %user.user_id, book_id = %book.id, quantity, "Added to cart");
            Redirect::to("/books?success=added").into_response()
        }
        Err(CartError::InvalidQuantity(_)) => {
            Redirect::to(&format!("/book/{id}?error=invalid_quantity")).into_response()
        }
        Err(e) => cart_error(e).into_response(),
    }
}

/// Set a cart line's quantity. Zero removes the line.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<UpdateForm>,
) -> Result<Redirect> {
    CartService::new(state.pool())
        .update(user.user_id, CartItemId::new(id), form.quantity)
        .await
        .map_err(cart_error)?;

    Ok(Redirect::to("/cart?success=updated"))
}

/// Remove a cart line.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    CartService::new(state.pool())
        .remove(user.user_id, CartItemId::new(id))
        .await
        .map_err(cart_error)?;

    Ok(Redirect::to("/cart?success=removed"))
}

fn cart_error(e: CartError) -> AppError {
    match e {
        CartError::BookNotFound => AppError::NotFound("book".to_owned()),
        CartError::ItemNotFound => AppError::NotFound("cart item".to_owned()),
        CartError::NotOwner => AppError::Forbidden("cart item".to_owned()),
        CartError::InvalidQuantity(q) => AppError::BadRequest(format!("invalid quantity: {q}")),
        CartError::Repository(e) => AppError::Database(e),
    }
}
