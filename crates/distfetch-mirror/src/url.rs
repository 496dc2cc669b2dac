//! Deferred mirror URLs.
//!
//! A [`MirrorUrl`] binds a mirror base to a distfile without deciding the
//! final location yet: the mirror's layout is only consulted when the
//! candidate is actually attempted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::layout::{Layout, MirrorLayoutConfig};

/// Name of the per-distdir mirror layout cache.
pub const MIRROR_CACHE_FILE: &str = ".mirror-cache.json";

pub fn mirror_cache_path(distdir: impl AsRef<Path>) -> PathBuf {
    distdir.as_ref().join(MIRROR_CACHE_FILE)
}

/// Source of mirror layout descriptions.
pub trait LayoutSource {
    fn layout(&self, mirror: &str) -> Option<MirrorLayoutConfig>;
}

/// Treats every mirror as flat.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatLayouts;

impl LayoutSource for FlatLayouts {
    fn layout(&self, _mirror: &str) -> Option<MirrorLayoutConfig> { None }
}

/// Known layouts per mirror, plus `layout.conf` reads for filesystem
/// mirrors. Reads are memoized, failures included.
#[derive(Debug, Default)]
pub struct LayoutCache {
    seeded: HashMap<String, MirrorLayoutConfig>,
    read:   Mutex<HashMap<String, Option<MirrorLayoutConfig>>>,
}

impl LayoutCache {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_layout(mut self, mirror: impl Into<String>, config: MirrorLayoutConfig) -> Self {
        self.seeded.insert(mirror.into(), config);
        self
    }

    fn read_local(mirror: &str) -> Option<MirrorLayoutConfig> {
        let path = Path::new(mirror).join("layout.conf");
        match MirrorLayoutConfig::read_from_file(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no usable layout.conf");
                None
            }
        }
    }
}

impl LayoutSource for LayoutCache {
    fn layout(&self, mirror: &str) -> Option<MirrorLayoutConfig> {
        if let Some(config) = self.seeded.get(mirror) {
            return Some(config.clone());
        }
        if !mirror.starts_with('/') {
            return None;
        }

        let mut read = self.read.lock().unwrap_or_else(|e| e.into_inner());
        read.entry(mirror.to_string())
            .or_insert_with(|| Self::read_local(mirror))
            .clone()
    }
}

/// A mirror candidate for one distfile, resolved on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MirrorUrl {
    base:     String,
    filename: String,
    cache:    Option<PathBuf>,
}

impl MirrorUrl {
    pub fn new(base: impl Into<String>, filename: impl Into<String>, cache: Option<PathBuf>) -> Self {
        Self {
            base: base.into(),
            filename: filename.into(),
            cache,
        }
    }

    pub fn base(&self) -> &str { &self.base }

    pub fn filename(&self) -> &str { &self.filename }

    /// Layout cache file this candidate may consult, if the distdir is
    /// writable.
    pub fn cache_path(&self) -> Option<&Path> { self.cache.as_deref() }

    /// Final location: `<base>/<path>` for filesystem mirrors, otherwise
    /// `<base>/distfiles/<path>`. The layout path is percent-encoded for
    /// `http`, `https` and `ftp`.
    pub fn resolve(&self, layouts: &dyn LayoutSource) -> String {
        let layout = layouts
            .layout(&self.base)
            .map(|config| config.best_supported_layout())
            .unwrap_or(Layout::Flat);
        let mut path = layout.path_for(&self.filename);

        if matches!(scheme(&self.base).as_deref(), Some("http" | "https" | "ftp")) {
            path = quote_path(&path);
        }

        if self.base.starts_with('/') {
            Path::new(&self.base).join(path).to_string_lossy().into_owned()
        } else {
            format!("{}/distfiles/{}", self.base, path)
        }
    }
}

fn scheme(url: &str) -> Option<String> {
    url.split_once("://")
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
}

fn quote_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
