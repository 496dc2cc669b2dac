//! Error types for distfetch-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch: force=True is not allowed when digests are provided")]
    ForceWithDigests,

    #[error("malformed settings: {0}")]
    MalformedSettings(#[source] distfetch_settings::Error),

    #[error(transparent)]
    Settings(distfetch_settings::Error),

    /// Nothing needs to be fetched. Not a failure.
    #[error("fetching unnecessary")]
    FetchingUnnecessary,

    #[error("no known mirror by the name: {0}")]
    UnknownMirror(String),

    #[error("invalid mirror definition in SRC_URI: {0}")]
    InvalidMirrorUri(String),

    #[error("no digests available for {0}")]
    MissingDigests(String),

    #[error("transport failed for {uri}: {message}")]
    Transport { uri: String, message: String },

    #[error("unsupported URI: {0}")]
    UnsupportedUri(String),

    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("{algo} checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        algo:     String,
        expected: String,
        actual:   String,
    },

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// `false` only for the [`FetchingUnnecessary`](Error::FetchingUnnecessary)
    /// signal.
    pub fn is_failure(&self) -> bool { !matches!(self, Error::FetchingUnnecessary) }

    /// Verification failures that call for discarding the file.
    pub fn is_checksum_failure(&self) -> bool {
        matches!(self, Error::SizeMismatch { .. } | Error::ChecksumMismatch { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<distfetch_settings::Error> for Error {
    fn from(e: distfetch_settings::Error) -> Self {
        match e {
            distfetch_settings::Error::Malformed(_) => Error::MalformedSettings(e),
            other => Error::Settings(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_with_digests_message() {
        assert_eq!(
            Error::ForceWithDigests.to_string(),
            "fetch: force=True is not allowed when digests are provided"
        );
    }

    #[test]
    fn test_fetching_unnecessary_is_not_failure() {
        assert!(!Error::FetchingUnnecessary.is_failure());
        assert!(Error::UnknownMirror("x".into()).is_failure());
    }

    #[test]
    fn test_settings_error_conversion() {
        let e: Error = distfetch_settings::Error::Malformed("bad".into()).into();
        assert!(matches!(e, Error::MalformedSettings(_)));

        let e: Error = distfetch_settings::Error::MissingKey("DISTDIR".into()).into();
        assert!(matches!(e, Error::Settings(_)));
        assert_eq!(e.to_string(), "missing setting: DISTDIR");
    }
}
