use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::ids;
use crate::models::User;

/// Which user field `find_by` compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Email,
}

/// In-memory user directory mapping user id -> User.
///
/// A single RwLock guards the map so that the duplicate-email check in
/// `register` and the subsequent insert form one critical section — two
/// racing registrations of the same email cannot both succeed.
pub struct UserDirectory {
    inner: RwLock<HashMap<String, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Find a user by exact, case-sensitive match on the given field.
    ///
    /// Linear scan over the directory. An empty `value` short-circuits to
    /// `None` — registration relies on this so a blank email never "matches"
    /// anything.
    pub async fn find_by(&self, field: UserField, value: &str) -> Option<User> {
        if value.is_empty() {
            return None;
        }
        let users = self.inner.read().await;
        users
            .values()
            .find(|u| match field {
                UserField::Id => u.id == value,
                UserField::Email => u.email == value,
            })
            .cloned()
    }

    /// Register a new user with an already-hashed credential.
    ///
    /// Returns `None` when the email is empty or already taken. The id is
    /// minted from the short-code generator, regenerating on the (unlikely)
    /// collision with an existing user id.
    pub async fn register(&self, email: &str, password_hash: &str) -> Option<User> {
        if email.is_empty() {
            return None;
        }

        let mut users = self.inner.write().await;
        if users.values().any(|u| u.email == email) {
            return None;
        }

        let id = loop {
            let candidate = ids::generate();
            if !users.contains_key(&candidate) {
                break candidate;
            }
        };

        let user = User {
            id: id.clone(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
        };
        users.insert(id, user.clone());
        Some(user)
    }

    /// Insert a pre-built user record (fixtures and tests).
    pub async fn insert(&self, user: User) {
        let mut users = self.inner.write().await;
        users.insert(user.id.clone(), user);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> UserDirectory {
        let dir = UserDirectory::new();
        dir.insert(User {
            id: "userRandomID".into(),
            email: "user@example.com".into(),
            password_hash: "x".into(),
        })
        .await;
        dir.insert(User {
            id: "user2RandomID".into(),
            email: "user2@example.com".into(),
            password_hash: "y".into(),
        })
        .await;
        dir
    }

    #[tokio::test]
    async fn find_by_email_returns_the_matching_user() {
        let dir = seeded().await;
        let user = dir.find_by(UserField::Email, "user@example.com").await;
        assert_eq!(user.unwrap().id, "userRandomID");
    }

    #[tokio::test]
    async fn find_by_email_misses_unknown_address() {
        let dir = seeded().await;
        assert!(dir
            .find_by(UserField::Email, "missing@example.com")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn find_by_is_case_sensitive_and_rejects_empty_value() {
        let dir = seeded().await;
        assert!(dir
            .find_by(UserField::Email, "USER@example.com")
            .await
            .is_none());
        assert!(dir.find_by(UserField::Email, "").await.is_none());
        assert!(dir.find_by(UserField::Id, "").await.is_none());
    }

    #[tokio::test]
    async fn find_by_id_returns_the_matching_user() {
        let dir = seeded().await;
        let user = dir.find_by(UserField::Id, "user2RandomID").await;
        assert_eq!(user.unwrap().email, "user2@example.com");
    }

    #[tokio::test]
    async fn register_then_find_round_trips() {
        let dir = UserDirectory::new();
        let user = dir
            .register("new@example.com", "hash")
            .await
            .expect("fresh email should register");

        let found = dir.find_by(UserField::Email, "new@example.com").await;
        assert_eq!(found.as_ref().map(|u| u.id.as_str()), Some(user.id.as_str()));
        assert_eq!(user.id.len(), crate::ids::CODE_LEN);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_and_empty_email() {
        let dir = seeded().await;
        assert!(dir.register("user@example.com", "hash").await.is_none());
        assert!(dir.register("", "hash").await.is_none());
        assert_eq!(dir.len().await, 2);
    }
}
