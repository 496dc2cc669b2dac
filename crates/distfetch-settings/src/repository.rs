//! Repository and manifest collaborators.
//!
//! Only the lookup contract lives here; manifest parsing belongs to the
//! repository layer that implements [`RepositoryLookup`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Declared size and hash digests for one distfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistDigests {
    pub size:   Option<u64>,
    #[serde(default)]
    pub hashes: BTreeMap<String, String>,
}

impl DistDigests {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn hash(mut self, name: impl Into<String>, hex: impl Into<String>) -> Self {
        self.hashes.insert(name.into(), hex.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> { self.hashes.get(name).map(String::as_str) }

    pub fn is_empty(&self) -> bool { self.size.is_none() && self.hashes.is_empty() }
}

/// Distfile name to digests, as recorded by a package manifest.
pub type DigestMap = BTreeMap<String, DistDigests>;

/// Lookup of the repository owning a package directory and of the
/// `DIST` entries in that package's manifest.
pub trait RepositoryLookup: Send + Sync {
    fn repo_for_location(&self, location: &Path) -> Option<PathBuf>;

    fn dist_digests(&self, repo: &Path, pkgdir: &Path) -> Option<DigestMap>;
}

/// In-memory repository table, keyed by package directory.
#[derive(Debug, Clone, Default)]
pub struct StaticRepository {
    location:  PathBuf,
    manifests: BTreeMap<PathBuf, DigestMap>,
}

impl StaticRepository {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location:  location.into(),
            manifests: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn manifest(mut self, pkgdir: impl Into<PathBuf>, digests: DigestMap) -> Self {
        self.manifests.insert(pkgdir.into(), digests);
        self
    }
}

impl RepositoryLookup for StaticRepository {
    fn repo_for_location(&self, location: &Path) -> Option<PathBuf> {
        (location == self.location).then(|| self.location.clone())
    }

    fn dist_digests(&self, repo: &Path, pkgdir: &Path) -> Option<DigestMap> {
        if repo != self.location {
            return None;
        }
        self.manifests.get(pkgdir).cloned()
    }
}
