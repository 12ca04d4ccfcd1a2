use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the update pipeline.
/// Every fallible module returns `Result<T, UpdaterError>`.
#[derive(Debug, Error)]
pub enum UpdaterError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{registry} returned HTTP {status} for {url}")]
    RegistryStatus {
        registry: &'static str,
        url: String,
        status: u16,
    },

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("{0} API key is not configured")]
    MissingCredential(&'static str),

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {file}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        file: String,
        expected: String,
        actual: String,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type UpdaterResult<T> = Result<T, UpdaterError>;

impl From<std::io::Error> for UpdaterError {
    fn from(source: std::io::Error) -> Self {
        UpdaterError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// ── Serialization for UI transport ──────────────────────
// Front-ends receive errors as their display string.
impl serde::Serialize for UpdaterError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
