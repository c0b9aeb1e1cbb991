use chrono::NaiveDateTime;

/// A shortened link. `owner_id` is recorded at creation and never changes;
/// it is not validated against the user directory, so a dangling owner is
/// tolerated (the ownership queries simply never match it).
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub short_code: String,
    pub long_url: String,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
}

/// A registered user. Created once at registration, never mutated or deleted.
/// `password_hash` is a PHC-format Argon2id string; plaintext is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}
