use crate::{
    auth::{MaybeUser, SESSION_COOKIE},
    password,
    users::UserField,
    AppState,
};
use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Deserialize;
use std::sync::Arc;

/// One message for every sign-in/sign-up failure — wrong password, unknown
/// email, and already-registered email all look the same, so responses never
/// reveal whether an address is registered.
const GENERIC_REJECTION: &str = "Invalid email or password.";

// ── Template structs ───────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    error: Option<String>,
}

// ── Form types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

// ── Register ───────────────────────────────────────────────────────────────

/// GET /register
pub async fn register_page(MaybeUser(user): MaybeUser) -> Response {
    if user.is_some() {
        return Redirect::to("/urls").into_response();
    }
    RegisterTemplate { error: None }.into_response()
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return register_rejection();
    }

    let password_hash = match password::hash(&form.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("password hashing failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
        }
    };

    // A taken email gets the same rejection as bad credentials.
    let user = match state.users.register(email, &password_hash).await {
        Some(u) => u,
        None => return register_rejection(),
    };

    tracing::info!(user_id = %user.id, "new user registered");
    start_session(&state, jar, &user.id).await
}

fn register_rejection() -> Response {
    (
        StatusCode::BAD_REQUEST,
        RegisterTemplate {
            error: Some(GENERIC_REJECTION.into()),
        },
    )
        .into_response()
}

// ── Login / Logout ─────────────────────────────────────────────────────────

/// GET /login
pub async fn login_page(MaybeUser(user): MaybeUser) -> Response {
    if user.is_some() {
        return Redirect::to("/urls").into_response();
    }
    LoginTemplate { error: None }.into_response()
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let found = state
        .users
        .find_by(UserField::Email, form.email.trim())
        .await;

    // Single branch for "no such email" and "wrong password".
    let user = match found {
        Some(u) if password::verify(&form.password, &u.password_hash) => u,
        _ => {
            // Use a small artificial delay to blunt brute-force attempts.
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            return (
                StatusCode::FORBIDDEN,
                LoginTemplate {
                    error: Some(GENERIC_REJECTION.into()),
                },
            )
                .into_response();
        }
    };
    tracing::info!(user_id = %user.id, "user logged in");
    start_session(&state, jar, &user.id).await
}

/// POST /logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value()).await;
    }

    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.add(removal), Redirect::to("/login")).into_response()
}

// ── Private helpers ────────────────────────────────────────────────────────

/// Mint a session for `user_id`, set the cookie, and land on /urls.
async fn start_session(state: &AppState, jar: CookieJar, user_id: &str) -> Response {
    let token = state.sessions.create(user_id).await;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.session_duration_hours as i64 * 3600,
        ))
        .build();

    (jar.add(cookie), Redirect::to("/urls")).into_response()
}
