use crate::{
    models::User,
    users::UserField,
    AppState,
};
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use std::{
    collections::HashMap,
    convert::Infallible,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

// ── Session Store ──────────────────────────────────────────────────────────

struct Session {
    user_id: String,
    created_at: Instant,
}

/// In-memory session store. Each entry maps an opaque session token (UUID)
/// to the user it authenticates and the instant it was created. Tokens
/// expire after `session_duration`. The token in the cookie carries no
/// user data itself, so a forged cookie can only miss.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    pub session_duration: Duration,
}

impl SessionStore {
    pub fn new(session_duration_hours: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            session_duration: Duration::from_secs(session_duration_hours * 3600),
        }
    }

    /// Create a new session for `user_id` and return its token.
    pub async fn create(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        // Opportunistically prune expired sessions on every login
        sessions.retain(|_, s| s.created_at.elapsed() < self.session_duration);
        sessions.insert(
            token.clone(),
            Session {
                user_id: user_id.to_owned(),
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Resolve a token to the user id it authenticates, if it exists and
    /// has not expired.
    pub async fn user_id(&self, token: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|s| s.created_at.elapsed() < self.session_duration)
            .map(|s| s.user_id.clone())
    }

    /// Invalidate a specific session (logout).
    pub async fn remove(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }
}

// ── Extractors ─────────────────────────────────────────────────────────────

/// Resolve the request's session cookie to a user record, or `None` when
/// the request is anonymous, the token is stale, or the user has vanished.
async fn resolve_user(parts: &Parts, state: &AppState) -> Option<User> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(SESSION_COOKIE)?.value().to_owned();
    let user_id = state.sessions.user_id(&token).await?;
    state.users.find_by(UserField::Id, &user_id).await
}

/// Extractor that enforces authentication on any handler that includes it
/// as a parameter. If the request carries a valid session cookie the
/// extractor yields the user record; otherwise it short-circuits with a
/// redirect to the login page so the handler never runs.
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);
        match resolve_user(parts, &state).await {
            Some(user) => Ok(AuthUser(user)),
            None => Err(Redirect::to("/login")),
        }
    }
}

/// Infallible variant for handlers that behave differently for anonymous
/// visitors (login/register pages, and the POST routes that answer 401
/// instead of redirecting).
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);
        Ok(MaybeUser(resolve_user(parts, &state).await))
    }
}
