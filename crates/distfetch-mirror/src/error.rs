//! Error types for mirror handling.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid layout.conf: {0}")]
    InvalidLayout(String),

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ini::ParseError> for Error {
    fn from(e: ini::ParseError) -> Self { Error::InvalidLayout(e.to_string()) }
}
