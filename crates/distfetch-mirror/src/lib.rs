//! Mirrors for distfile fetching.
//!
//! [`MirrorCatalog`] sorts the configured mirrors into filesystem, local,
//! public and third-party groups. A [`MirrorUrl`] is a candidate bound to
//! one mirror base and one file; it is turned into a location only when
//! attempted, using the mirror's [`Layout`] as described by its
//! `layout.conf`.

pub use self::catalog::{LOCAL_MIRROR_GROUP, MirrorCatalog, filesystem_path};
pub use self::error::{Error, Result};
pub use self::layout::{HashAlgo, Layout, MirrorLayoutConfig};
pub use self::url::{
    FlatLayouts, LayoutCache, LayoutSource, MIRROR_CACHE_FILE, MirrorUrl, mirror_cache_path,
};

mod catalog;
mod error;
mod layout;
mod url;
