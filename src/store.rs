use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::ids;
use crate::models::Link;

/// Outcome of an owner-checked mutation. The existence and ownership checks
/// happen under the same entry guard as the mutation itself, so no other
/// writer can slip in between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedOp {
    Done,
    NotFound,
    NotOwner,
}

/// Thread-safe in-memory store mapping short_code -> Link.
///
/// Backed by a DashMap so reads are concurrent and lock-free for most cases.
/// Each of create/update/delete is a single entry operation on one key, so
/// no mutation can interleave with another writer's existence check on the
/// same code. Nothing is persisted; the store lives and dies with the
/// process.
#[derive(Clone, Debug)]
pub struct LinkStore {
    inner: Arc<DashMap<String, Link>>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Create a link owned by `owner_id` and return its short code.
    ///
    /// The code comes from `ids::generate`; if the draw is already taken the
    /// code is regenerated rather than overwriting the existing link. The
    /// check and the insert happen under the same entry guard, so two
    /// concurrent creates can never claim the same code.
    pub fn create(&self, long_url: impl Into<String>, owner_id: impl Into<String>) -> String {
        let long_url = long_url.into();
        let owner_id = owner_id.into();

        loop {
            match self.inner.entry(ids::generate()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    let code = slot.key().clone();
                    slot.insert(Link {
                        short_code: code.clone(),
                        long_url: long_url.clone(),
                        owner_id: owner_id.clone(),
                        created_at: chrono::Utc::now().naive_utc(),
                    });
                    return code;
                }
            }
        }
    }

    /// Insert a link under a caller-chosen code (fixtures and tests).
    pub fn insert(&self, link: Link) {
        self.inner.insert(link.short_code.clone(), link);
    }

    /// Look up a short code. Returns a clone of the record if present.
    pub fn get(&self, code: &str) -> Option<Link> {
        self.inner.get(code).map(|l| l.clone())
    }

    /// Replace the destination of an existing link.
    ///
    /// Returns `false` when the code is unknown. An empty `new_long_url` is
    /// deliberately a no-op rather than a clear-out: a form re-submitted with
    /// a blank field must never blank out the stored destination.
    pub fn update(&self, code: &str, new_long_url: &str) -> bool {
        match self.inner.get_mut(code) {
            Some(mut link) => {
                if !new_long_url.is_empty() {
                    link.long_url = new_long_url.to_owned();
                }
                true
            }
            None => false,
        }
    }

    /// Remove a link. Returns `false` when the code is unknown.
    pub fn delete(&self, code: &str) -> bool {
        self.inner.remove(code).is_some()
    }

    /// `update`, but only when `owner_id` owns the link. One entry guard
    /// covers the existence check, the ownership check, and the write.
    /// The empty-value no-op rule applies here too.
    pub fn update_owned(&self, owner_id: &str, code: &str, new_long_url: &str) -> OwnedOp {
        match self.inner.get_mut(code) {
            None => OwnedOp::NotFound,
            Some(mut link) => {
                if link.owner_id != owner_id {
                    return OwnedOp::NotOwner;
                }
                if !new_long_url.is_empty() {
                    link.long_url = new_long_url.to_owned();
                }
                OwnedOp::Done
            }
        }
    }

    /// `delete`, but only when `owner_id` owns the link, checked and removed
    /// under one entry guard.
    pub fn delete_owned(&self, owner_id: &str, code: &str) -> OwnedOp {
        match self.inner.entry(code.to_owned()) {
            Entry::Vacant(_) => OwnedOp::NotFound,
            Entry::Occupied(slot) => {
                if slot.get().owner_id != owner_id {
                    return OwnedOp::NotOwner;
                }
                slot.remove();
                OwnedOp::Done
            }
        }
    }

    /// All links owned by `owner_id`, keyed by short code.
    ///
    /// Always yields a map: unknown owners and the empty string both produce
    /// an empty one. Callers never have to distinguish "no such user" from
    /// "user with no links".
    pub fn links_for_user(&self, owner_id: &str) -> HashMap<String, Link> {
        if owner_id.is_empty() {
            return HashMap::new();
        }
        self.inner
            .iter()
            .filter(|entry| entry.value().owner_id == owner_id)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Whether `code` exists and is owned by `owner_id`.
    /// Unknown codes short-circuit to `false`.
    pub fn is_owner(&self, owner_id: &str, code: &str) -> bool {
        self.inner
            .get(code)
            .map(|link| link.owner_id == owner_id)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for LinkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(code: &str, url: &str, owner: &str) -> Link {
        Link {
            short_code: code.to_owned(),
            long_url: url.to_owned(),
            owner_id: owner.to_owned(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn create_then_get_round_trips() {
        let store = LinkStore::new();
        let code = store.create("http://a.example", "u1");

        let found = store.get(&code).expect("created link should be present");
        assert_eq!(found.long_url, "http://a.example");
        assert_eq!(found.owner_id, "u1");
        assert_eq!(found.short_code, code);
    }

    #[test]
    fn get_update_delete_miss_on_unknown_code() {
        let store = LinkStore::new();
        store.insert(link("b2xVn2", "http://a.example", "u1"));

        assert!(store.get("nosuch").is_none());
        assert!(!store.update("nosuch", "http://b.example"));
        assert!(!store.delete("nosuch"));

        // misses leave the store untouched
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b2xVn2").unwrap().long_url, "http://a.example");
    }

    #[test]
    fn update_replaces_destination() {
        let store = LinkStore::new();
        let code = store.create("http://old.example", "u1");

        assert!(store.update(&code, "http://new.example"));
        assert_eq!(store.get(&code).unwrap().long_url, "http://new.example");
        // owner never changes
        assert_eq!(store.get(&code).unwrap().owner_id, "u1");
    }

    #[test]
    fn update_with_empty_value_is_a_no_op() {
        let store = LinkStore::new();
        let code = store.create("http://keep.example", "u1");

        assert!(store.update(&code, ""));
        assert_eq!(store.get(&code).unwrap().long_url, "http://keep.example");
    }

    #[test]
    fn delete_then_get_is_gone() {
        let store = LinkStore::new();
        let code = store.create("http://a.example", "u1");

        assert!(store.delete(&code));
        assert!(store.get(&code).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn links_for_user_filters_by_owner() {
        let store = LinkStore::new();
        store.insert(link("b2xVn2", "http://a.example", "u1"));
        store.insert(link("9sm5xK", "http://b.example", "u1"));
        store.insert(link("aaaaaa", "http://c.example", "u2"));

        let mine = store.links_for_user("u1");
        assert_eq!(mine.len(), 2);
        assert!(mine.contains_key("b2xVn2"));
        assert!(mine.contains_key("9sm5xK"));
        assert_eq!(mine["b2xVn2"].long_url, "http://a.example");
    }

    #[test]
    fn links_for_unknown_or_empty_owner_is_empty() {
        let store = LinkStore::new();
        store.insert(link("b2xVn2", "http://a.example", "u1"));

        assert!(store.links_for_user("ghost").is_empty());
        assert!(store.links_for_user("").is_empty());
    }

    #[test]
    fn is_owner_matches_only_the_recorded_owner() {
        let store = LinkStore::new();
        store.insert(link("b2xVn2", "http://a.example", "u1"));

        assert!(store.is_owner("u1", "b2xVn2"));
        assert!(!store.is_owner("u2", "b2xVn2"));
        assert!(!store.is_owner("u1", "nosuch"));
    }

    #[test]
    fn update_owned_distinguishes_missing_foreign_and_owned() {
        let store = LinkStore::new();
        store.insert(link("b2xVn2", "http://a.example", "u1"));

        assert_eq!(store.update_owned("u1", "nosuch", "http://b.example"), OwnedOp::NotFound);
        assert_eq!(store.update_owned("u2", "b2xVn2", "http://b.example"), OwnedOp::NotOwner);
        // a rejected writer changes nothing
        assert_eq!(store.get("b2xVn2").unwrap().long_url, "http://a.example");

        assert_eq!(store.update_owned("u1", "b2xVn2", "http://b.example"), OwnedOp::Done);
        assert_eq!(store.get("b2xVn2").unwrap().long_url, "http://b.example");
        // empty replacement stays a no-op through the owned path
        assert_eq!(store.update_owned("u1", "b2xVn2", ""), OwnedOp::Done);
        assert_eq!(store.get("b2xVn2").unwrap().long_url, "http://b.example");
    }

    #[test]
    fn delete_owned_only_removes_the_owners_link() {
        let store = LinkStore::new();
        store.insert(link("b2xVn2", "http://a.example", "u1"));

        assert_eq!(store.delete_owned("u1", "nosuch"), OwnedOp::NotFound);
        assert_eq!(store.delete_owned("u2", "b2xVn2"), OwnedOp::NotOwner);
        assert!(store.get("b2xVn2").is_some());

        assert_eq!(store.delete_owned("u1", "b2xVn2"), OwnedOp::Done);
        assert!(store.get("b2xVn2").is_none());
    }

    #[test]
    fn full_lifecycle_round_trip() {
        let store = LinkStore::new();
        let code = store.create("http://one.example", "u1");

        assert_eq!(store.get(&code).unwrap().long_url, "http://one.example");
        assert!(store.update(&code, "http://two.example"));
        assert_eq!(store.get(&code).unwrap().long_url, "http://two.example");
        assert!(store.delete(&code));
        assert!(store.get(&code).is_none());
    }
}
