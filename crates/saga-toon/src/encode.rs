//! TOON encoding of requests sent to the generation service.
//!
//! The map endpoint takes a plain-text TOON body rather than JSON. Encoding
//! goes through the `toon-format` crate so quoting follows the TOON rules.
//!
//! TOON format: <https://github.com/toon-format/toon>

use serde::Serialize;
use toon_format::{EncodeOptions, encode};

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("TOON encoding failed: {0}")]
    Toon(String),
    #[error("repository URL is empty")]
    EmptyUrl,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapRequest<'a> {
    repo_url: &'a str,
}

/// Default encoding options: comma delimiter, 2-space indent.
fn encode_opts() -> EncodeOptions {
    EncodeOptions::default().with_indent(toon_format::Indent::Spaces(2))
}

/// Body for the map endpoint: `repoUrl: "<url>"`.
pub fn encode_map_request(repo_url: &str) -> Result<String, EncodeError> {
    let repo_url = repo_url.trim();
    if repo_url.is_empty() {
        return Err(EncodeError::EmptyUrl);
    }
    encode(&MapRequest { repo_url }, &encode_opts()).map_err(|e| EncodeError::Toon(e.to_string()))
}
