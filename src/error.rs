//! Error handling for viewer startup and best-effort operations.

use thiserror::Error;

/// Convenient result alias for flipbook operations.
pub type Result<T> = std::result::Result<T, FlipbookError>;

/// Status shown when startup fails for a reason the reader cannot act on.
pub const GENERIC_FAILURE_STATUS: &str =
    "Error: Flipbook failed to start. Open DevTools Console for details.";

/// Errors that may occur while starting the viewer.
///
/// Every variant is terminal for startup. Use [`FlipbookError::status_message`]
/// to get the text shown in the status element.
#[derive(Debug, Error)]
pub enum FlipbookError {
    /// The element the book is mounted into does not exist.
    #[error("missing #{id} element")]
    MissingMount {
        /// Element id that was looked up.
        id: String,
    },
    /// `St.PageFlip` is not available on the window.
    #[error("PageFlip library did not load")]
    LibraryMissing,
    /// The manifest request failed before a response arrived.
    #[error("could not fetch {url}: {reason}")]
    ManifestFetch {
        /// Manifest URL.
        url: String,
        /// Failure description from the host.
        reason: String,
    },
    /// The manifest request returned a non-success HTTP status.
    #[error("HTTP {status} while fetching {url}")]
    ManifestStatus {
        /// Manifest URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The manifest body is not valid JSON of the expected shape.
    #[error("could not parse {url}: {source}")]
    ManifestParse {
        /// Manifest URL.
        url: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The manifest lists no pages.
    #[error("no pages found in manifest")]
    EmptyManifest,
    /// The page-flip widget rejected a call.
    #[error("page-flip widget error: {0}")]
    Widget(String),
    /// A viewer configuration document is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[source] serde_json::Error),
    /// A DOM operation failed.
    #[error("DOM error: {0}")]
    Dom(String),
    /// The startup state machine was asked to move backwards or past a terminal state.
    #[error("invalid startup transition from {from} to {to}")]
    InvalidTransition {
        /// Phase the machine was in.
        from: &'static str,
        /// Phase that was requested.
        to: &'static str,
    },
}

impl FlipbookError {
    /// Text to place in the status element for this failure.
    pub fn status_message(&self) -> String {
        match self {
            FlipbookError::MissingMount { id } => format!("Error: Missing #{id} element."),
            FlipbookError::LibraryMissing => "Error: PageFlip library did not load.".to_string(),
            FlipbookError::ManifestFetch { url, .. }
            | FlipbookError::ManifestStatus { url, .. }
            | FlipbookError::ManifestParse { url, .. } => {
                format!("Error: Could not load {}.", manifest_file_name(url))
            }
            FlipbookError::EmptyManifest => "No pages found in manifest.".to_string(),
            FlipbookError::Widget(_)
            | FlipbookError::Config(_)
            | FlipbookError::Dom(_)
            | FlipbookError::InvalidTransition { .. } => GENERIC_FAILURE_STATUS.to_string(),
        }
    }

    /// Whether this is one of the anticipated fatal conditions, as opposed to
    /// an unexpected runtime failure that should also reveal the book container.
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            FlipbookError::Widget(_)
                | FlipbookError::Config(_)
                | FlipbookError::Dom(_)
                | FlipbookError::InvalidTransition { .. }
        )
    }
}

fn manifest_file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_failures_name_the_file() {
        let err = FlipbookError::ManifestStatus {
            url: "data/manifest.json?v=3".into(),
            status: 404,
        };
        assert_eq!(err.status_message(), "Error: Could not load manifest.json.");

        let err = FlipbookError::ManifestFetch {
            url: "book.json".into(),
            reason: "offline".into(),
        };
        assert_eq!(err.status_message(), "Error: Could not load book.json.");
    }

    #[test]
    fn unexpected_failures_use_generic_status() {
        let err = FlipbookError::Widget("no HTML loader".into());
        assert_eq!(err.status_message(), GENERIC_FAILURE_STATUS);
        assert!(!err.is_expected());
        assert!(FlipbookError::EmptyManifest.is_expected());
    }

    #[test]
    fn parse_errors_name_the_configured_manifest() {
        let err = FlipbookError::ManifestParse {
            url: "books/2024/contents.json".into(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert_eq!(err.status_message(), "Error: Could not load contents.json.");
        assert!(err.is_expected());
        assert!(std::error::Error::source(&err).is_some());
    }
}
