//! Authentication route handlers.
//!
//! Handles registration, login, and logout against the local user store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::{MessageQuery, flash_messages};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub next: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    // Already logged in, nothing to register.
    if current_user.is_some() {
        return Redirect::to("/").into_response();
    }

    let (error, success) = flash_messages(&query);

    RegisterTemplate {
        current_user: None,
        error,
        success,
    }
    .into_response()
}

/// Handle registration form submission.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.register(&form.username, &form.email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "User registered");
            Redirect::to("/login?success=registered").into_response()
        }
        Err(e) => {
            let code = match &e {
                AuthError::InvalidUsername(_) => "invalid_username",
                AuthError::InvalidEmail(_) => "invalid_email",
                AuthError::WeakPassword(_) => "weak_password",
                AuthError::UsernameTaken => "username_taken",
                AuthError::EmailTaken => "email_taken",
                AuthError::InvalidCredentials
                | AuthError::Repository(_)
                | AuthError::PasswordHash => {
                    tracing::error!("Registration failed: {}", e);
                    sentry::capture_error(&e);
                    "failed"
                }
            };
            Redirect::to(&format!("/register?error={code}")).into_response()
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if current_user.is_some() {
        return Redirect::to("/").into_response();
    }

    let (error, success) = flash_messages(&MessageQuery {
        error: query.error,
        success: query.success,
    });

    LoginTemplate {
        current_user: None,
        error,
        success,
        next: query.next,
    }
    .into_response()
}

/// Handle login form submission.
///
/// On success the user lands on the page they were headed to before the
/// login redirect, or the home page.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser::new(&user);

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/login?error=session").into_response();
            }

            tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
            Redirect::to(safe_next(form.next.as_deref())).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "Login failed");
            Redirect::to(&login_retry_url(form.next.as_deref())).into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            sentry::capture_error(&e);
            Redirect::to(&login_retry_url(form.next.as_deref())).into_response()
        }
    }
}

/// Handle logout.
///
/// Clears the current user and destroys the whole session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/?success=logged_out").into_response()
}

/// Only follow same-site return paths; anything else falls back to home.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

fn login_retry_url(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => {
            format!("/login?error=credentials&next={}", urlencoding::encode(path))
        }
        _ => "/login?error=credentials".to_owned(),
    }
}
