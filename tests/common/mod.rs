//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::Router;
use tower::ServiceExt;

use urlshort::source::store;
use urlshort::PathRecord;

pub const FALLBACK_BODY: &str = "fallback: no redirect\n";

/// Terminal handler that identifies itself in the body.
pub fn fallback() -> Router {
    Router::new().fallback(|| async { (StatusCode::NOT_FOUND, FALLBACK_BODY) })
}

/// Write a rules file into `dir` and return its path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Create a store in `dir` holding `records` and return its path.
pub fn seed_store(dir: &Path, name: &str, records: &[PathRecord]) -> PathBuf {
    let path = dir.join(name);
    let db = store::create(&path).unwrap();
    store::import(&db, records).unwrap();
    path
}

/// Write one raw key/value pair into the store at `path`, bypassing UTF-8 checks.
pub fn seed_raw(path: &Path, key: &[u8], value: &[u8]) {
    let db = store::create(path).unwrap();
    let txn = db.begin_write().unwrap();
    {
        let mut table = txn.open_table(store::PATHS_TABLE).unwrap();
        table.insert(key, value).unwrap();
    }
    txn.commit().unwrap();
}

/// Outcome of one request through a router.
#[derive(Debug)]
pub struct Outcome {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// Send a GET for `path` through `router` without a socket.
pub async fn get(router: &Router, path: &str) -> Outcome {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();

    Outcome {
        status,
        location,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}
