//! Parsing of the `links` payload attached to a project save.
//!
//! The admin form submits links as a JSON-encoded string; API callers may
//! send the array directly. Either way the result fully replaces the
//! project's existing links.

use serde::{Deserialize, Serialize};

/// One link entry as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInput {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Parse a `links` payload into the rows that should replace the current links.
///
/// Accepts a JSON array of `{title, url, icon}` objects or a string holding
/// such an array. Anything else (empty string, malformed JSON, a non-array,
/// entries missing fields) yields no links.
pub fn parse_links(payload: &serde_json::Value) -> Vec<LinkInput> {
    let parsed = match payload {
        serde_json::Value::String(encoded) => serde_json::from_str::<Vec<LinkInput>>(encoded),
        serde_json::Value::Array(_) => serde_json::from_value::<Vec<LinkInput>>(payload.clone()),
        _ => return Vec::new(),
    };

    match parsed {
        Ok(links) => links,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding unparseable links payload");
            Vec::new()
        }
    }
}
