//! Page manifest model.
//!
//! The manifest is a small JSON document listing the page images of one
//! scanned document:
//!
//! ```json
//! { "title": "2023 Report Card", "originalPdf": "report.pdf", "pages": ["p/001.webp", "p/002.webp"] }
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{FlipbookError, Result};

/// Title used when the manifest has none.
pub const DEFAULT_TITLE: &str = "Flipbook";

/// Parsed page manifest. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, deserialize_with = "truthy_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "truthy_string")]
    original_pdf: Option<String>,
    #[serde(default, deserialize_with = "pages_as_strings")]
    pages: Vec<String>,
}

impl Manifest {
    /// Build a manifest directly from its parts.
    pub fn new(title: Option<String>, original_pdf: Option<String>, pages: Vec<String>) -> Self {
        Self {
            title,
            original_pdf,
            pages,
        }
    }

    /// Parse a manifest body fetched from `url` without checking that it has pages.
    pub fn from_json(url: &str, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|source| FlipbookError::ManifestParse {
            url: url.to_string(),
            source,
        })
    }

    /// Parse a manifest body fetched from `url` and reject one with an empty
    /// page list.
    pub fn parse(url: &str, body: &str) -> Result<Self> {
        let manifest = Self::from_json(url, body)?;
        if manifest.pages.is_empty() {
            return Err(FlipbookError::EmptyManifest);
        }
        Ok(manifest)
    }

    /// Title to display; falls back to [`DEFAULT_TITLE`] when missing or empty.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => DEFAULT_TITLE,
        }
    }

    /// Link to the original document, if one is given.
    pub fn original_pdf(&self) -> Option<&str> {
        self.original_pdf.as_deref().filter(|url| !url.is_empty())
    }

    /// Page image URLs in reading order.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Number of real document pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Text fields follow JS truthiness: `null`, `false`, `0` and `""` are absent,
/// other scalars are stringified, and arrays or objects are ignored.
fn truthy_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts any JSON scalars in `pages` and stringifies them the way a
/// browser's `String(value)` would. `null` for the whole field means no pages.
fn pages_as_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
