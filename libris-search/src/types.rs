//! Decoded response types for the Open Library search API.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// One catalog hit.
///
/// Every field is optional: the API omits keys it has no data for, and
/// decoding never fails because of a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Book title, rendered verbatim.
    #[serde(default)]
    pub title: Option<String>,
    /// Author names in API order. `Some(vec![])` and `None` are distinct
    /// states but format identically.
    #[serde(default, rename = "author_name")]
    pub authors: Option<Vec<String>>,
    /// Year of first publication.
    #[serde(default)]
    pub first_publish_year: Option<i32>,
}

impl Entry {
    /// An entry with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Builder-style author list override.
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = Some(authors.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style first publish year override.
    pub fn with_year(mut self, year: i32) -> Self {
        self.first_publish_year = Some(year);
        self
    }
}

/// Top-level search response.
///
/// `null` items inside `docs` decode to `None` and are dropped by the
/// orchestrator before formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default, rename = "docs")]
    entries: Option<Vec<Option<Entry>>>,
}

impl SearchEnvelope {
    /// Decode a response body. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedPayload`] if the body is not JSON or
    /// a known field has the wrong shape.
    pub fn decode(body: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(body).map_err(|e| ProtocolError::MalformedPayload(e.to_string()))
    }

    /// Consume the envelope, yielding its entries (empty when `docs` was
    /// absent or null).
    pub fn into_entries(self) -> Vec<Option<Entry>> {
        self.entries.unwrap_or_default()
    }
}

impl From<Vec<Option<Entry>>> for SearchEnvelope {
    fn from(entries: Vec<Option<Entry>>) -> Self {
        Self {
            entries: Some(entries),
        }
    }
}
