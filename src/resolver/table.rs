//! Resolver over an in-memory mapping table.

use axum::http::StatusCode;

use crate::resolver::{Redirect, Resolver, TABLE_REDIRECT_STATUS};
use crate::source::{MappingTable, PathRecord};

/// Exact-match resolver over a table built at construction time.
#[derive(Debug)]
pub struct TableResolver {
    name: String,
    table: MappingTable,
    status: StatusCode,
}

impl TableResolver {
    /// Build a resolver from rules, redirecting with `302 Found`.
    pub fn new(name: impl Into<String>, records: impl IntoIterator<Item = PathRecord>) -> Self {
        Self {
            name: name.into(),
            table: MappingTable::build(records),
            status: TABLE_REDIRECT_STATUS,
        }
    }

    /// Override the redirect status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Resolver for TableResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, path: &str) -> Option<Redirect> {
        self.table
            .get(path)
            .map(|url| Redirect::new(url, self.status))
    }
}
