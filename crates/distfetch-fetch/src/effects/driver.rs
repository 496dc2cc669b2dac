use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use distfetch_mirror::{LayoutCache, LayoutSource, MirrorUrl};
use distfetch_settings::{DistDigests, keys};
use tracing::{debug, info, warn};

use crate::core::retry_delay;
use crate::data::{DistfileName, FetchStatus};
use crate::effects::transport::Transport;
use crate::effects::verify::{DigestVerifier, Verifier};
use crate::error::{Error, Result};
use crate::params::FetchParams;
use crate::plan::{FetchPlan, FileCandidates};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// `listonly`: the locations that would be attempted.
    Listed(Vec<String>),
    /// Already in the distdir and valid.
    Present,
    /// Symlinked from a read-only distdir.
    Linked(PathBuf),
    /// Copied from a filesystem mirror.
    Copied(PathBuf),
    /// Downloaded from this location.
    Fetched(String),
    Failed(String),
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool { matches!(self, FileOutcome::Failed(_)) }
}

/// Per-file outcomes of a run, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    outcomes: Vec<(DistfileName, FileOutcome)>,
}

impl FetchReport {
    pub fn outcomes(&self) -> &[(DistfileName, FileOutcome)] { &self.outcomes }

    pub fn get(&self, name: &str) -> Option<&FileOutcome> {
        self.outcomes
            .iter()
            .find(|(file, _)| file.as_str() == name)
            .map(|(_, outcome)| outcome)
    }

    pub fn status(&self) -> FetchStatus {
        if self.outcomes.iter().any(|(_, o)| o.is_failure()) {
            FetchStatus::Error
        } else {
            FetchStatus::Ok
        }
    }
}

/// Walks each file's candidates until one yields a verified file.
///
/// Before every attempt a partial file smaller than the resume threshold
/// is discarded; a larger one is resumed. A transport failure moves on to
/// the next candidate after an exponential backoff. A checksum failure
/// discards the file, and the file is given up after the configured
/// number of checksum failures.
pub struct FetchDriver<'p, 's, T, V = DigestVerifier> {
    params:    &'p FetchParams<'s>,
    transport: T,
    verifier:  V,
    layouts:   Box<dyn LayoutSource + Send + Sync>,
    backoff:   Duration,
}

impl<'p, 's, T: Transport> FetchDriver<'p, 's, T> {
    pub fn new(params: &'p FetchParams<'s>, transport: T) -> Self {
        Self {
            params,
            transport,
            verifier: DigestVerifier,
            layouts: Box::new(LayoutCache::new()),
            backoff: Duration::from_secs(1),
        }
    }
}

impl<'p, 's, T: Transport, V: Verifier> FetchDriver<'p, 's, T, V> {
    pub fn with_verifier<W: Verifier>(self, verifier: W) -> FetchDriver<'p, 's, T, W> {
        FetchDriver {
            params: self.params,
            transport: self.transport,
            verifier,
            layouts: self.layouts,
            backoff: self.backoff,
        }
    }

    #[must_use]
    pub fn layouts(mut self, layouts: impl LayoutSource + Send + Sync + 'static) -> Self {
        self.layouts = Box::new(layouts);
        self
    }

    #[must_use]
    pub fn backoff(mut self, base: Duration) -> Self {
        self.backoff = base;
        self
    }

    pub async fn run(&self, plan: &FetchPlan) -> Result<FetchReport> {
        let distdir = PathBuf::from(self.params.settings().require(keys::DISTDIR)?);
        let mut outcomes = Vec::with_capacity(plan.len());

        for entry in plan.files() {
            let outcome = self.fetch_file(&distdir, entry).await?;
            match &outcome {
                FileOutcome::Failed(reason) => warn!(file = %entry.file(), reason, "fetch failed"),
                other => debug!(file = %entry.file(), outcome = ?other, "file done"),
            }
            outcomes.push((entry.file().clone(), outcome));
        }
        Ok(FetchReport { outcomes })
    }

    async fn fetch_file(&self, distdir: &Path, entry: &FileCandidates) -> Result<FileOutcome> {
        let name = entry.file().as_str();
        let layouts = self.layouts.as_ref();

        if self.params.listonly() {
            let uris = entry.ordered().iter().map(|c| c.resolve(layouts)).collect();
            return Ok(FileOutcome::Listed(uris));
        }

        let digests = match self.params.verifiable_digests(name) {
            Some(digests) => digests,
            None if self.params.allow_missing_digests() => DistDigests::default(),
            None => {
                let reason = Error::MissingDigests(name.to_string()).to_string();
                return Ok(FileOutcome::Failed(reason));
            }
        };
        let dest = distdir.join(name);

        if self.existing_is_valid(&dest, &digests).await? {
            return Ok(FileOutcome::Present);
        }
        if let Some(source) = self.link_from_ro_distdirs(name, &dest, &digests).await? {
            return Ok(FileOutcome::Linked(source));
        }
        if let Some(source) = self.copy_from_fsmirrors(name, &dest, &digests).await? {
            return Ok(FileOutcome::Copied(source));
        }

        let candidates = entry.ordered();
        if candidates.is_empty() {
            return Ok(FileOutcome::Failed(format!("no candidate locations for {name}")));
        }

        let max_checksum_failures = self.params.checksum_failure_max_tries();
        let mut transport_failures = 0u32;
        let mut checksum_failures = 0u32;
        let mut delay = None;

        for candidate in &candidates {
            if let Some(delay) = delay.take() {
                tokio::time::sleep(delay).await;
            }

            let uri = candidate.resolve(layouts);
            let resume_from = self.prepare_partial(&dest).await?;
            info!(file = name, uri = %uri, resume_from, "fetching");

            if let Err(e) = self.transport.fetch(&uri, &dest, resume_from).await {
                let e = Error::Transport {
                    uri:     uri.clone(),
                    message: e.to_string(),
                };
                warn!(error = %e, "candidate failed");
                delay = Some(retry_delay(transport_failures, self.backoff));
                transport_failures += 1;
                continue;
            }

            if digests.is_empty() {
                return Ok(FileOutcome::Fetched(uri));
            }
            match self.verifier.verify(&dest, &digests) {
                Ok(()) => return Ok(FileOutcome::Fetched(uri)),
                Err(Error::SizeMismatch { expected, actual }) if actual < expected => {
                    warn!(uri = %uri, expected, actual, "incomplete download");
                }
                Err(e) if e.is_checksum_failure() => {
                    warn!(uri = %uri, error = %e, "checksum failure");
                    remove_if_exists(&dest).await?;
                    checksum_failures += 1;
                    if checksum_failures >= max_checksum_failures {
                        return Ok(FileOutcome::Failed(format!(
                            "giving up on {name} after {checksum_failures} checksum failures"
                        )));
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Ok(FileOutcome::Failed(format!("could not fetch {name} from any location")))
    }

    /// `true` when `dest` already holds the complete, valid file. An
    /// invalid complete file is removed; a short one is kept for resuming.
    async fn existing_is_valid(&self, dest: &Path, digests: &DistDigests) -> Result<bool> {
        let metadata = match tokio::fs::metadata(dest).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(Error::io(dest, e)),
        };

        if self.params.force() {
            remove_if_exists(dest).await?;
            return Ok(false);
        }
        if digests.is_empty() {
            return Ok(metadata.len() > 0);
        }

        match self.verifier.verify(dest, digests) {
            Ok(()) => Ok(true),
            Err(Error::SizeMismatch { expected, actual }) if actual < expected => Ok(false),
            Err(e) if e.is_checksum_failure() => {
                warn!(path = %dest.display(), error = %e, "removing invalid distfile");
                remove_if_exists(dest).await?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn link_from_ro_distdirs(
        &self,
        name: &str,
        dest: &Path,
        digests: &DistDigests,
    ) -> Result<Option<PathBuf>> {
        if self.params.force() {
            return Ok(None);
        }
        for dir in self.params.ro_distdirs() {
            let source = dir.join(name);
            if !source.is_file() || !self.matches(&source, digests) {
                continue;
            }
            remove_if_exists(dest).await?;
            tokio::fs::symlink(&source, dest)
                .await
                .map_err(|e| Error::io(dest, e))?;
            return Ok(Some(source));
        }
        Ok(None)
    }

    async fn copy_from_fsmirrors(
        &self,
        name: &str,
        dest: &Path,
        digests: &DistDigests,
    ) -> Result<Option<PathBuf>> {
        if self.params.force() {
            return Ok(None);
        }
        for mirror in self.params.fsmirrors()? {
            let location = MirrorUrl::new(mirror.as_str(), name, None).resolve(self.layouts.as_ref());
            let source = PathBuf::from(location);
            if !source.is_file() {
                continue;
            }
            tokio::fs::copy(&source, dest)
                .await
                .map_err(|e| Error::io(dest, e))?;
            if self.matches(dest, digests) {
                return Ok(Some(source));
            }
            warn!(source = %source.display(), "filesystem mirror copy failed verification");
            remove_if_exists(dest).await?;
        }
        Ok(None)
    }

    fn matches(&self, path: &Path, digests: &DistDigests) -> bool {
        digests.is_empty() || self.verifier.verify(path, digests).is_ok()
    }

    /// Length to resume from. Partial files below the resume threshold are
    /// discarded.
    async fn prepare_partial(&self, dest: &Path) -> Result<u64> {
        let len = match tokio::fs::metadata(dest).await {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::io(dest, e)),
        };
        if len < self.params.fetch_resume_size() {
            if len > 0 {
                debug!(path = %dest.display(), len, "discarding small partial file");
            }
            remove_if_exists(dest).await?;
            return Ok(0);
        }
        Ok(len)
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}
