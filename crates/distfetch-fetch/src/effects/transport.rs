use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt, SeekFrom};

/// Moves the bytes of one URI into a destination file.
///
/// `resume_from` is the length of a partial file already at `dest`; an
/// implementation that resumes appends from that offset, one that cannot
/// must overwrite `dest`. Returns the final length of `dest`.
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + 'static;

    fn fetch(
        &self,
        uri: &str,
        dest: &Path,
        resume_from: u64,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}

/// Copies from `file://` URIs and absolute paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransport;

impl LocalTransport {
    fn source_path(uri: &str) -> Option<PathBuf> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        path.starts_with('/').then(|| PathBuf::from(path))
    }
}

impl Transport for LocalTransport {
    type Error = io::Error;

    async fn fetch(&self, uri: &str, dest: &Path, resume_from: u64) -> io::Result<u64> {
        let source = Self::source_path(uri).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("not a local URI: {uri}"))
        })?;

        let mut input = File::open(&source).await?;
        let mut output = if resume_from > 0 {
            input.seek(SeekFrom::Start(resume_from)).await?;
            OpenOptions::new().append(true).open(dest).await?
        } else {
            File::create(dest).await?
        };

        let copied = tokio::io::copy(&mut input, &mut output).await?;
        output.flush().await?;
        Ok(resume_from + copied)
    }
}
