use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Public base URL used when displaying short links, e.g. "https://go.example.com"
    /// Must NOT have a trailing slash.
    pub base_url: String,

    /// How many hours a session token remains valid
    pub session_duration_hours: u64,

    /// Seed the stores with demo fixtures at startup (SEED_DEMO=1).
    /// Everything is in-memory, so this is the only way to start non-empty.
    pub seed_demo: bool,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let session_duration_hours = std::env::var("SESSION_DURATION_HOURS")
            .unwrap_or_else(|_| "1".into())
            .parse::<u64>()
            .unwrap_or(1);

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        let seed_demo = matches!(
            std::env::var("SEED_DEMO").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            base_url,
            session_duration_hours,
            seed_demo,
        })
    }
}
