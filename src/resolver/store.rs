//! Resolver backed by the persistent redirect store.

use std::sync::Arc;

use axum::http::StatusCode;
use redb::Database;

use crate::observability::metrics;
use crate::resolver::{Redirect, Resolver, STORE_REDIRECT_STATUS};
use crate::source::store;

/// Resolves paths with a read-only lookup in a redb store.
///
/// The database handle is opened and owned by the caller; this resolver
/// only holds a shared reference.
pub struct StoreResolver {
    name: String,
    db: Arc<Database>,
    status: StatusCode,
}

impl StoreResolver {
    /// Create a resolver redirecting with `308 Permanent Redirect`.
    pub fn new(name: impl Into<String>, db: Arc<Database>) -> Self {
        Self {
            name: name.into(),
            db,
            status: STORE_REDIRECT_STATUS,
        }
    }

    /// Override the redirect status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl std::fmt::Debug for StoreResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreResolver")
            .field("name", &self.name)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Resolver for StoreResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, path: &str) -> Option<Redirect> {
        match store::lookup(&self.db, path) {
            Ok(url) => url.map(|url| Redirect::new(url, self.status)),
            Err(e) => {
                // Lookup failures fall through like a miss.
                tracing::warn!(source = %self.name, path = %path, error = %e, "Store lookup failed");
                metrics::record_lookup_error(&self.name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PathRecord;

    #[test]
    fn test_store_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let db = store::create(&dir.path().join("paths.db")).unwrap();
        store::import(
            &db,
            &[
                PathRecord::new("/bolt-godoc", "https://example.com/godoc"),
                PathRecord::new("/blank", ""),
            ],
        )
        .unwrap();

        let resolver = StoreResolver::new("store", Arc::new(db));
        assert_eq!(
            resolver.resolve("/bolt-godoc"),
            Some(Redirect::new("https://example.com/godoc", StatusCode::PERMANENT_REDIRECT))
        );
        assert_eq!(resolver.resolve("/blank"), None);
        assert_eq!(resolver.resolve("/unknown"), None);
    }

    #[test]
    fn test_lookup_failure_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = store::create(&dir.path().join("paths.db")).unwrap();
        store::import(&db, &[PathRecord::new("/good", "https://example.com/good")]).unwrap();
        let txn = db.begin_write().unwrap();
        {
            let mut table = txn.open_table(store::PATHS_TABLE).unwrap();
            table.insert(b"/bad".as_slice(), &[0xffu8, 0xfe][..]).unwrap();
        }
        txn.commit().unwrap();

        let resolver = StoreResolver::new("store", Arc::new(db));
        assert_eq!(resolver.resolve("/bad"), None);
        // The failure does not affect later lookups.
        assert_eq!(resolver.resolve("/good").unwrap().location, "https://example.com/good");
    }

    #[test]
    fn test_store_without_table_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let db = store::create(&dir.path().join("empty.db")).unwrap();
        let resolver = StoreResolver::new("store", Arc::new(db)).with_status(StatusCode::FOUND);
        assert_eq!(resolver.resolve("/bolt-godoc"), None);
    }
}
