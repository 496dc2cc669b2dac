//! Recognized setting names.

pub const PORTAGE_RESTRICT: &str = "PORTAGE_RESTRICT";
pub const PORTAGE_FETCH_CHECKSUM_TRY_MIRRORS: &str = "PORTAGE_FETCH_CHECKSUM_TRY_MIRRORS";
pub const PORTAGE_FETCH_RESUME_MIN_SIZE: &str = "PORTAGE_FETCH_RESUME_MIN_SIZE";
pub const PORTAGE_PARALLEL_FETCHONLY: &str = "PORTAGE_PARALLEL_FETCHONLY";
pub const PORTAGE_CONFIGROOT: &str = "PORTAGE_CONFIGROOT";
pub const DISTDIR: &str = "DISTDIR";
pub const GENTOO_MIRRORS: &str = "GENTOO_MIRRORS";
pub const PORTAGE_CHECKSUM_FILTER: &str = "PORTAGE_CHECKSUM_FILTER";
pub const EBUILD_SKIP_MANIFEST: &str = "EBUILD_SKIP_MANIFEST";
pub const PORTAGE_RO_DISTDIRS: &str = "PORTAGE_RO_DISTDIRS";
/// Directory of the package currently being fetched for.
pub const PKGDIR: &str = "O";
pub const FEATURES: &str = "FEATURES";

/// Every key a settings profile picks up from the process environment.
pub const ENVIRONMENT_KEYS: &[&str] = &[
    PORTAGE_RESTRICT,
    PORTAGE_FETCH_CHECKSUM_TRY_MIRRORS,
    PORTAGE_FETCH_RESUME_MIN_SIZE,
    PORTAGE_PARALLEL_FETCHONLY,
    PORTAGE_CONFIGROOT,
    DISTDIR,
    GENTOO_MIRRORS,
    PORTAGE_CHECKSUM_FILTER,
    EBUILD_SKIP_MANIFEST,
    PORTAGE_RO_DISTDIRS,
    PKGDIR,
    FEATURES,
];
