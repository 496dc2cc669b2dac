//! Error types for settings access.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing setting: {0}")]
    MissingKey(String),

    #[error("malformed settings: {0}")]
    Malformed(String),

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self { Error::Malformed(e.to_string()) }
}
