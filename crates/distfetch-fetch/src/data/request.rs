use distfetch_settings::DigestMap;

/// Call-site flags of a fetch.
///
/// Every flag is set by name; defaults match a plain fetch with locking
/// and mirrors enabled.
///
/// ```
/// use distfetch_fetch::FetchRequest;
///
/// let request = FetchRequest::new().fetchonly(true).try_mirrors(false);
/// assert!(request.is_fetchonly());
/// assert!(request.uses_locks());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub(crate) listonly:              bool,
    pub(crate) fetchonly:             bool,
    pub(crate) locks_in_subdir:       String,
    pub(crate) use_locks:             bool,
    pub(crate) try_mirrors:           bool,
    pub(crate) digests:               Option<DigestMap>,
    pub(crate) allow_missing_digests: bool,
    pub(crate) force:                 bool,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            listonly:              false,
            fetchonly:             false,
            locks_in_subdir:       ".locks".to_string(),
            use_locks:             true,
            try_mirrors:           true,
            digests:               None,
            allow_missing_digests: true,
            force:                 false,
        }
    }
}

impl FetchRequest {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn listonly(mut self, listonly: bool) -> Self {
        self.listonly = listonly;
        self
    }

    #[must_use]
    pub fn fetchonly(mut self, fetchonly: bool) -> Self {
        self.fetchonly = fetchonly;
        self
    }

    #[must_use]
    pub fn locks_in_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.locks_in_subdir = subdir.into();
        self
    }

    #[must_use]
    pub fn use_locks(mut self, use_locks: bool) -> Self {
        self.use_locks = use_locks;
        self
    }

    #[must_use]
    pub fn try_mirrors(mut self, try_mirrors: bool) -> Self {
        self.try_mirrors = try_mirrors;
        self
    }

    #[must_use]
    pub fn digests(mut self, digests: DigestMap) -> Self {
        self.digests = Some(digests);
        self
    }

    #[must_use]
    pub fn allow_missing_digests(mut self, allow: bool) -> Self {
        self.allow_missing_digests = allow;
        self
    }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn is_listonly(&self) -> bool { self.listonly }

    pub fn is_fetchonly(&self) -> bool { self.fetchonly }

    pub fn uses_locks(&self) -> bool { self.use_locks }

    pub fn is_forced(&self) -> bool { self.force }
}
