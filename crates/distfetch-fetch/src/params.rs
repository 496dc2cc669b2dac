//! Fetch configuration: call-site flags resolved against settings.
//!
//! [`FetchParams`] is validated once when built and immutable afterwards.
//! Derived attributes are computed on first access and memoized for the
//! lifetime of the instance, so a warning about a bad setting is emitted
//! at most once per instance however often the attribute is read.
//!
//! ```compile_fail
//! use distfetch_fetch::{FetchParams, FetchRequest};
//! use distfetch_settings::MapSettings;
//!
//! let settings = MapSettings::new();
//! let mut params = FetchParams::new(&settings, FetchRequest::new()).unwrap();
//! params.force = true;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use distfetch_mirror::{MirrorCatalog, mirror_cache_path};
use distfetch_settings::{
    DigestMap, DistDigests, FeatureSet, MirrorGroups, Settings, keys, load_custom_mirrors,
};
use nix::unistd::{AccessFlags, access};
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::core::{
    DEFAULT_RESUME_SIZE, DEFAULT_RESUME_SIZE_TEXT, HashFilter, apply_hash_filter,
    parse_resume_size,
};
use crate::data::FetchRequest;
use crate::effects::{ProcessIdentity, SecurityLevel, SystemIdentity};
use crate::error::{Error, Result};
use crate::report::{Reporter, TracingReporter};

/// Checksum failures tolerated before giving up on a file.
pub const DEFAULT_CHECKSUM_FAILURE_MAX_TRIES: u32 = 5;

/// Resolved configuration of one fetch invocation.
///
/// Borrows the settings; owns its digest mapping.
pub struct FetchParams<'s> {
    settings: &'s dyn Settings,
    request:  FetchRequest,
    reporter: Arc<dyn Reporter>,
    identity: Arc<dyn ProcessIdentity>,

    restrict:                   OnceCell<Vec<String>>,
    userfetch:                  OnceCell<bool>,
    checksum_failure_max_tries: OnceCell<u32>,
    fetch_resume_size:          OnceCell<u64>,
    custommirrors:              OnceCell<MirrorGroups>,
    distdir_writable:           OnceCell<bool>,
    catalog:                    OnceCell<MirrorCatalog>,
    hash_filter:                OnceCell<Option<HashFilter>>,
    digests:                    OnceCell<DigestMap>,
    ro_distdirs:                OnceCell<Vec<PathBuf>>,
}

impl fmt::Debug for FetchParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchParams")
            .field("request", &self.request)
            .field("settings", &"{ ... }")
            .field("reporter", &"{ ... }")
            .field("identity", &"{ ... }")
            .finish_non_exhaustive()
    }
}

pub struct FetchParamsBuilder<'s> {
    settings: &'s dyn Settings,
    request:  FetchRequest,
    reporter: Arc<dyn Reporter>,
    identity: Arc<dyn ProcessIdentity>,
}

impl<'s> FetchParamsBuilder<'s> {
    #[must_use]
    pub fn request(mut self, request: FetchRequest) -> Self {
        self.request = request;
        self
    }

    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    #[must_use]
    pub fn identity(mut self, identity: Arc<dyn ProcessIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`Error::ForceWithDigests`] when `force` is combined with non-empty
    /// digests, and [`Error::FetchingUnnecessary`] when mirror mode meets a
    /// mirror restriction without `lmirror`.
    pub fn build(self) -> Result<FetchParams<'s>> {
        if self.request.force && self.request.digests.as_ref().is_some_and(|d| !d.is_empty()) {
            return Err(Error::ForceWithDigests);
        }

        let params = FetchParams {
            settings: self.settings,
            request: self.request,
            reporter: self.reporter,
            identity: self.identity,
            restrict: OnceCell::new(),
            userfetch: OnceCell::new(),
            checksum_failure_max_tries: OnceCell::new(),
            fetch_resume_size: OnceCell::new(),
            custommirrors: OnceCell::new(),
            distdir_writable: OnceCell::new(),
            catalog: OnceCell::new(),
            hash_filter: OnceCell::new(),
            digests: OnceCell::new(),
            ro_distdirs: OnceCell::new(),
        };

        let features = params.features();
        if features.contains("mirror") && !features.contains("lmirror") && params.restrict_mirror()
        {
            info!(">>> \"mirror\" mode desired and \"mirror\" restriction found; skipping fetch.");
            return Err(Error::FetchingUnnecessary);
        }

        if params.use_locks() && params.fetch_to_ro() && !params.distdir_writable() {
            params.warn("!!! For fetching to a read-only filesystem, locking should be turned off.");
            params.warn(
                "!!! This can be done by adding -distlocks to FEATURES in /etc/portage/make.conf",
            );
        }

        Ok(params)
    }
}

impl<'s> FetchParams<'s> {
    pub fn builder(settings: &'s dyn Settings) -> FetchParamsBuilder<'s> {
        FetchParamsBuilder {
            settings,
            request: FetchRequest::default(),
            reporter: Arc::new(TracingReporter),
            identity: Arc::new(SystemIdentity),
        }
    }

    pub fn new(settings: &'s dyn Settings, request: FetchRequest) -> Result<Self> {
        Self::builder(settings).request(request).build()
    }

    pub fn settings(&self) -> &'s dyn Settings { self.settings }

    pub fn request(&self) -> &FetchRequest { &self.request }

    pub fn listonly(&self) -> bool { self.request.listonly }

    pub fn try_mirrors(&self) -> bool { self.request.try_mirrors }

    pub fn force(&self) -> bool { self.request.force }

    pub fn locks_in_subdir(&self) -> &str { &self.request.locks_in_subdir }

    pub fn distdir(&self) -> Option<&'s str> { self.settings.get(keys::DISTDIR) }

    fn warn(&self, message: &str) { self.reporter.warn(message) }

    pub fn features(&self) -> &'s FeatureSet { self.settings.features() }

    pub fn restrict(&self) -> &[String] {
        self.restrict.get_or_init(|| {
            self.settings
                .get_or(keys::PORTAGE_RESTRICT, "")
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
    }

    fn restricts(&self, token: &str) -> bool { self.restrict().iter().any(|t| t == token) }

    pub fn restrict_mirror(&self) -> bool { self.restricts("mirror") || self.restricts("nomirror") }

    pub fn restrict_fetch(&self) -> bool { self.restricts("fetch") }

    /// Fetch as the unprivileged fetch user. Only meaningful when running
    /// as superuser, since privileges are dropped for the download.
    pub fn userfetch(&self) -> bool {
        *self.userfetch.get_or_init(|| {
            self.features().contains("userfetch")
                && self.identity.security_level() == SecurityLevel::Superuser
        })
    }

    pub fn checksum_failure_max_tries(&self) -> u32 {
        *self.checksum_failure_max_tries.get_or_init(|| {
            let Some(raw) = self.settings.get(keys::PORTAGE_FETCH_CHECKSUM_TRY_MIRRORS) else {
                return DEFAULT_CHECKSUM_FAILURE_MAX_TRIES;
            };
            match raw.trim().parse::<i64>() {
                Ok(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
                _ => {
                    self.warn(&format!(
                        "!!! Invalid {}='{}'",
                        keys::PORTAGE_FETCH_CHECKSUM_TRY_MIRRORS,
                        raw
                    ));
                    self.warn(&format!(
                        "!!! Defaulting to {}",
                        DEFAULT_CHECKSUM_FAILURE_MAX_TRIES
                    ));
                    DEFAULT_CHECKSUM_FAILURE_MAX_TRIES
                }
            }
        })
    }

    /// Partial downloads smaller than this are discarded instead of
    /// resumed.
    pub fn fetch_resume_size(&self) -> u64 {
        *self.fetch_resume_size.get_or_init(|| {
            let Some(raw) = self.settings.get(keys::PORTAGE_FETCH_RESUME_MIN_SIZE) else {
                return DEFAULT_RESUME_SIZE;
            };
            parse_resume_size(raw).unwrap_or_else(|| {
                self.warn(&format!(
                    "!!! Variable {} contains an unrecognized format: '{}'",
                    keys::PORTAGE_FETCH_RESUME_MIN_SIZE,
                    raw
                ));
                self.warn(&format!(
                    "!!! Using {} default value: {}",
                    keys::PORTAGE_FETCH_RESUME_MIN_SIZE,
                    DEFAULT_RESUME_SIZE_TEXT
                ));
                DEFAULT_RESUME_SIZE
            })
        })
    }

    pub fn thirdpartymirrors(&self) -> &'s MirrorGroups { self.settings.thirdpartymirrors() }

    pub fn fetchonly(&self) -> bool { self.request.fetchonly || self.parallel_fetchonly() }

    pub fn parallel_fetchonly(&self) -> bool {
        self.settings.contains(keys::PORTAGE_PARALLEL_FETCHONLY)
    }

    /// Mirror groups from `etc/portage/mirrors` under `PORTAGE_CONFIGROOT`.
    pub fn custommirrors(&self) -> Result<&MirrorGroups> {
        self.custommirrors.get_or_try_init(|| {
            let root = self.settings.get_or(keys::PORTAGE_CONFIGROOT, "/");
            let groups = load_custom_mirrors(root)?;
            debug!(root, groups = groups.len(), "loaded custom mirrors");
            Ok(groups)
        })
    }

    pub fn use_locks(&self) -> bool {
        self.request.use_locks && !self.request.listonly && self.features().contains("distlocks")
    }

    pub fn distdir_writable(&self) -> bool {
        *self.distdir_writable.get_or_init(|| {
            self.distdir()
                .is_some_and(|dir| access(Path::new(dir), AccessFlags::W_OK).is_ok())
        })
    }

    pub fn fetch_to_ro(&self) -> bool { self.features().contains("skiprocheck") }

    /// The mirror catalog; empty when mirrors are not tried.
    pub fn mirror_catalog(&self) -> Result<&MirrorCatalog> {
        self.catalog.get_or_try_init(|| {
            if !self.try_mirrors() {
                return Ok(MirrorCatalog::empty());
            }
            Ok(MirrorCatalog::from_settings(
                self.settings,
                self.custommirrors()?,
                true,
            ))
        })
    }

    pub fn local_mirrors(&self) -> Result<&[String]> { Ok(self.mirror_catalog()?.local()) }

    pub fn public_mirrors(&self) -> Result<&[String]> { Ok(self.mirror_catalog()?.public()) }

    pub fn fsmirrors(&self) -> Result<&[String]> { Ok(self.mirror_catalog()?.fsmirrors()) }

    /// `None` when the filter would accept every hash.
    pub fn hash_filter(&self) -> Option<&HashFilter> {
        self.hash_filter
            .get_or_init(|| {
                let filter = HashFilter::new(self.settings.get_or(keys::PORTAGE_CHECKSUM_FILTER, ""));
                (!filter.is_transparent()).then_some(filter)
            })
            .as_ref()
    }

    pub fn skip_manifest(&self) -> bool {
        self.settings.get(keys::EBUILD_SKIP_MANIFEST) == Some("1")
    }

    pub fn allow_missing_digests(&self) -> bool {
        self.request.allow_missing_digests || self.skip_manifest()
    }

    /// Expected digests per distfile.
    ///
    /// Empty when the manifest is skipped. Otherwise the digests given by
    /// the caller, or the `DIST` entries of the package manifest found
    /// through the settings' repository lookup.
    pub fn digests(&self) -> &DigestMap {
        self.digests.get_or_init(|| {
            if self.skip_manifest() {
                return DigestMap::new();
            }
            match &self.request.digests {
                Some(digests) => digests.clone(),
                None => self.manifest_digests().unwrap_or_default(),
            }
        })
    }

    fn manifest_digests(&self) -> Option<DigestMap> {
        let pkgdir = Path::new(self.settings.get(keys::PKGDIR)?);
        let repositories = self.settings.repositories()?;
        let location = pkgdir.parent().and_then(Path::parent)?;
        let repo = repositories.repo_for_location(location)?;
        let digests = repositories.dist_digests(&repo, pkgdir);
        debug!(
            pkgdir = %pkgdir.display(),
            found = digests.as_ref().map_or(0, |d| d.len()),
            "loaded manifest digests"
        );
        digests
    }

    /// The file's digests with the checksum filter applied.
    pub fn verifiable_digests(&self, file: &str) -> Option<DistDigests> {
        let digests = self.digests().get(file)?;
        Some(match self.hash_filter() {
            Some(filter) => apply_hash_filter(digests, filter),
            None => digests.clone(),
        })
    }

    /// Existing directories listed in `PORTAGE_RO_DISTDIRS`.
    pub fn ro_distdirs(&self) -> &[PathBuf] {
        self.ro_distdirs.get_or_init(|| {
            self.settings
                .get_or(keys::PORTAGE_RO_DISTDIRS, "")
                .split_whitespace()
                .map(PathBuf::from)
                .filter(|dir| dir.is_dir())
                .collect()
        })
    }

    pub fn force_mirror(&self) -> bool {
        self.features().contains("force-mirror") && !self.restrict_mirror()
    }

    /// Mirror layout cache inside the distdir, if it can be written.
    pub fn mirror_cache(&self) -> Option<PathBuf> {
        if !self.distdir_writable() {
            return None;
        }
        self.distdir().map(mirror_cache_path)
    }

    /// Lock file guarding `file` in the distdir, if locking is in effect.
    pub fn lock_path(&self, file: &str) -> Option<PathBuf> {
        if !self.use_locks() {
            return None;
        }
        let distdir = Path::new(self.distdir()?);
        let subdir = self.locks_in_subdir();
        Some(if subdir.is_empty() {
            distdir.join(file)
        } else {
            distdir.join(subdir).join(file)
        })
    }
}
