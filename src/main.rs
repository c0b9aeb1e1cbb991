use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod error;
mod handlers;
mod ids;
mod models;
mod password;
mod seed;
mod store;
mod users;

use auth::SessionStore;
use store::LinkStore;
use users::UserDirectory;

// ── Shared application state ───────────────────────────────────────────────

/// All process-wide state, passed explicitly into handlers via axum's
/// `State` — no module-level singletons, so tests can build isolated
/// instances. Nothing here survives a restart.
pub struct AppState {
    pub config: config::AppConfig,
    pub links: LinkStore,
    pub users: UserDirectory,
    pub sessions: SessionStore,
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinylink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting tinylink on {}:{}", config.host, config.port);
    tracing::info!("Base URL: {}", config.base_url);

    // Build shared state
    let links = LinkStore::new();
    let users = UserDirectory::new();
    let sessions = SessionStore::new(config.session_duration_hours);

    if config.seed_demo {
        seed::demo(&links, &users).await?;
    }

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        config,
        links,
        users,
        sessions,
    });

    // ── Router ─────────────────────────────────────────────────────────────
    let app = Router::new()
        // Root → the link index (which bounces anonymous visitors to /login)
        .route(
            "/",
            get(|| async { axum::response::Redirect::to("/urls") }),
        )
        // Health check — returns 200 OK with no auth required
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        // Link management
        .route(
            "/urls",
            get(handlers::links::index).post(handlers::links::create),
        )
        .route("/urls/new", get(handlers::links::new_page))
        .route("/urls/:code", get(handlers::links::show))
        .route("/urls/:code/edit", post(handlers::links::update))
        .route("/urls/:code/delete", post(handlers::links::delete))
        // Public short-link redirect
        .route("/u/:code", get(handlers::redirect::redirect))
        // Accounts
        .route(
            "/register",
            get(handlers::accounts::register_page).post(handlers::accounts::register),
        )
        .route(
            "/login",
            get(handlers::accounts::login_page).post(handlers::accounts::login),
        )
        .route("/logout", post(handlers::accounts::logout))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
