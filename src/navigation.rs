//! Document selection surface
//!
//! A document is selected by a URL-style query parameter
//! (`pdf=<percent-encoded filename>`). A missing or empty parameter is a
//! fatal input error: the caller redirects to the catalog and nothing is
//! retried.

use crate::source::DocumentId;

/// Query parameter naming the document to open
pub const DOCUMENT_PARAM: &str = "pdf";

/// Errors resolving a document from the navigation surface
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("no document specified")]
    MissingDocument,

    #[error("malformed query value: {0}")]
    Malformed(String),
}

/// Resolve the document identifier from a query string like
/// `pdf=guide.pdf&theme=dark`. A leading `?` is tolerated.
pub fn document_from_query(query: &str) -> Result<DocumentId, NavigationError> {
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != DOCUMENT_PARAM {
            continue;
        }
        let decoded = percent_decode(value)?;
        if decoded.is_empty() {
            return Err(NavigationError::MissingDocument);
        }
        return Ok(DocumentId::new(decoded));
    }

    Err(NavigationError::MissingDocument)
}

/// Decode %XX escapes in a query value
fn percent_decode(value: &str) -> Result<String, NavigationError> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| NavigationError::Malformed(value.to_string()))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| NavigationError::Malformed(value.to_string()))
}
