use crate::{
    auth::{AuthUser, MaybeUser},
    error::AppError,
    models::Link,
    store::OwnedOp,
    AppState,
};
use askama::Template;
use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

// ── Template structs ───────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "urls_index.html")]
struct UrlsIndexTemplate {
    user_email: String,
    base_url: String,
    links: Vec<Link>,
}

#[derive(Template)]
#[template(path = "urls_new.html")]
struct UrlsNewTemplate {
    user_email: String,
}

#[derive(Template)]
#[template(path = "urls_show.html")]
struct UrlsShowTemplate {
    user_email: String,
    code: String,
    long_url: String,
    short_url: String,
}

// ── Form types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateLinkForm {
    #[serde(default)]
    long_url: String,
}

#[derive(Deserialize)]
pub struct EditLinkForm {
    // Absent field deserializes to "" and becomes a no-op in the store.
    #[serde(default)]
    new_long_url: String,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /urls
/// The signed-in user's links, newest first. Anonymous visitors are
/// redirected to /login by the extractor.
pub async fn index(AuthUser(user): AuthUser, State(state): State<Arc<AppState>>) -> Response {
    let mut links: Vec<Link> = state.links.links_for_user(&user.id).into_values().collect();
    links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    UrlsIndexTemplate {
        user_email: user.email,
        base_url: state.config.base_url.clone(),
        links,
    }
    .into_response()
}

/// GET /urls/new
pub async fn new_page(AuthUser(user): AuthUser) -> Response {
    UrlsNewTemplate {
        user_email: user.email,
    }
    .into_response()
}

/// GET /urls/:code
/// Show/edit page for a single link. Unknown code → 404; someone else's
/// link → 403.
pub async fn show(
    AuthUser(user): AuthUser,
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let link = state.links.get(&code).ok_or(AppError::NotFound)?;
    if !state.links.is_owner(&user.id, &code) {
        return Err(AppError::Forbidden);
    }

    Ok(UrlsShowTemplate {
        user_email: user.email,
        short_url: format!("{}/u/{}", state.config.base_url, link.short_code),
        code: link.short_code,
        long_url: link.long_url,
    }
    .into_response())
}

/// POST /urls
/// Create a link. The destination is stored as-is — an arbitrary string,
/// no URL validation. Anonymous requests get 401 rather than a redirect.
pub async fn create(
    MaybeUser(user): MaybeUser,
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateLinkForm>,
) -> Result<Redirect, AppError> {
    let user = user.ok_or(AppError::Unauthorized)?;

    let code = state.links.create(form.long_url, &user.id);
    tracing::info!(owner = %user.id, code = %code, "link created");

    Ok(Redirect::to(&format!("/urls/{code}")))
}

/// POST /urls/:code/edit
/// Replace the destination. Check order: authenticated → exists → owned,
/// with the last two resolved by the store under a single entry guard.
/// An empty replacement value leaves the destination unchanged.
pub async fn update(
    MaybeUser(user): MaybeUser,
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Form(form): Form<EditLinkForm>,
) -> Result<Redirect, AppError> {
    let user = user.ok_or(AppError::Unauthorized)?;

    match state.links.update_owned(&user.id, &code, &form.new_long_url) {
        OwnedOp::NotFound => Err(AppError::NotFound),
        OwnedOp::NotOwner => Err(AppError::Forbidden),
        OwnedOp::Done => {
            tracing::info!(owner = %user.id, code = %code, "link updated");
            Ok(Redirect::to("/urls"))
        }
    }
}

/// POST /urls/:code/delete
pub async fn delete(
    MaybeUser(user): MaybeUser,
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Redirect, AppError> {
    let user = user.ok_or(AppError::Unauthorized)?;

    match state.links.delete_owned(&user.id, &code) {
        OwnedOp::NotFound => Err(AppError::NotFound),
        OwnedOp::NotOwner => Err(AppError::Forbidden),
        OwnedOp::Done => {
            tracing::info!(owner = %user.id, code = %code, "link deleted");
            Ok(Redirect::to("/urls"))
        }
    }
}
