use crate::{models::Link, password, store::LinkStore, users::UserDirectory};

/// Populate the stores with the demo fixtures: one user and two links.
/// Everything is in-memory, so this is the only way to start non-empty.
pub async fn demo(links: &LinkStore, users: &UserDirectory) -> anyhow::Result<()> {
    let password_hash = password::hash("purple-monkey-dinosaur")
        .map_err(|e| anyhow::anyhow!("hashing demo password: {e}"))?;

    let user = users
        .register("user@example.com", &password_hash)
        .await
        .ok_or_else(|| anyhow::anyhow!("demo user is already registered"))?;

    for (code, long_url) in [
        ("b2xVn2", "http://www.lighthouselabs.ca"),
        ("9sm5xK", "http://www.google.com"),
    ] {
        links.insert(Link {
            short_code: code.to_owned(),
            long_url: long_url.to_owned(),
            owner_id: user.id.clone(),
            created_at: chrono::Utc::now().naive_utc(),
        });
    }

    tracing::info!(
        "Seeded demo user {} with {} link(s)",
        user.email,
        links.len()
    );
    Ok(())
}
