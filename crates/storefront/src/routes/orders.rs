//! Checkout and order route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};

use bookstall_core::OrderId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Order, OrderLine};
use crate::routes::{MessageQuery, flash_messages};
use crate::services::{OrderError, OrderService};
use crate::state::AppState;

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/success.html")]
pub struct OrderSuccessTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrderHistoryTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub orders: Vec<Order>,
}

/// Place an order from the current cart.
///
/// Failures redirect back to the cart with a message code. Unexpected
/// persistence errors are logged and reported, never shown to the client.
pub async fn checkout(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Response {
    match OrderService::new(state.pool()).place_order(user.user_id).await {
        Ok(order) => {
            tracing::info!(
                user_id = %user.user_id,
                order_id = %order.id,
                total = %order.total_amount,
                "Order placed"
            );
            Redirect::to(&format!("/order_success/{}", order.id)).into_response()
        }
        Err(OrderError::EmptyCart) => Redirect::to("/cart?error=empty_cart").into_response(),
        Err(OrderError::InsufficientStock(title)) => {
            tracing::warn!(user_id = %user.user_id, book = %title, "Checkout rejected, out of stock");
            Redirect::to("/cart?error=out_of_stock").into_response()
        }
        Err(e) => {
            tracing::error!(user_id = %user.user_id, "Checkout failed: {}", e);
            sentry::capture_error(&e);
            Redirect::to("/cart?error=checkout_failed").into_response()
        }
    }
}

/// Display the confirmation page for one of the user's orders.
pub async fn success(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response> {
    match OrderService::new(state.pool())
        .find_order(user.user_id, OrderId::new(id))
        .await
    {
        Ok((order, items)) => Ok(OrderSuccessTemplate {
            current_user: Some(user),
            error: None,
            success: None,
            order,
            items,
        }
        .into_response()),
        Err(OrderError::NotFound) => Err(AppError::NotFound(format!("order {id}"))),
        Err(OrderError::NotOwner) => Ok(Redirect::to("/?error=forbidden").into_response()),
        Err(OrderError::Repository(e)) => Err(AppError::Database(e)),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Display the user's order history.
pub async fn my_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<OrderHistoryTemplate> {
    let orders = OrderService::new(state.pool())
        .history(user.user_id)
        .await
        .map_err(|e| match e {
            OrderError::Repository(e) => AppError::Database(e),
            other => AppError::Internal(other.to_string()),
        })?;

    let (error, success) = flash_messages(&query);

    Ok(OrderHistoryTemplate {
        current_user: Some(user),
        error,
        success,
        orders,
    })
}
