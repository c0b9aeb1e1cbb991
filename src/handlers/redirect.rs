use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// GET /u/:code
///
/// Public redirect to the stored destination. No authentication — anyone
/// holding a short link may follow it. Unknown codes answer 404.
///
/// Destinations are stored as arbitrary strings, so the Location header is
/// built fallibly: a value that cannot be sent in a header (control
/// characters and the like) answers 400 instead of panicking the handler.
pub async fn redirect(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> Response {
    let link = match state.links.get(&code) {
        Some(link) => link,
        None => return AppError::NotFound.into_response(),
    };

    match HeaderValue::try_from(link.long_url.as_str()) {
        Ok(location) => {
            tracing::debug!(code = %code, "redirecting");
            let mut response = StatusCode::SEE_OTHER.into_response();
            response.headers_mut().insert(LOCATION, location);
            response
        }
        Err(_) => {
            tracing::warn!(code = %code, "stored destination is not sendable as a Location header");
            AppError::InvalidInput("that destination cannot be redirected to".into())
                .into_response()
        }
    }
}
