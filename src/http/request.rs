//! Request metadata capture.
//!
//! # Responsibilities
//! - Snapshot every inbound header at request time
//! - Serialize the snapshot as the access event detail
//!
//! # Design Decisions
//! - Header names are lower-case (as `http` stores them)
//! - Repeated headers are joined with ", " in arrival order
//! - Non-UTF-8 header bytes are replaced, never rejected

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use axum::http::HeaderMap;
use serde::Serialize;

/// Immutable snapshot of one request's headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestMetadata {
    headers: BTreeMap<String, String>,
}

impl RequestMetadata {
    /// Capture all headers of a request.
    pub fn capture(headers: &HeaderMap) -> Self {
        let mut captured: BTreeMap<String, String> = BTreeMap::new();

        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            match captured.entry(name.as_str().to_string()) {
                Entry::Occupied(mut existing) => {
                    let joined = existing.get_mut();
                    joined.push_str(", ");
                    joined.push_str(&value);
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }

        Self { headers: captured }
    }

    /// Value of a header by (lower-case) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// JSON object of header name to value.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.headers)
    }
}
