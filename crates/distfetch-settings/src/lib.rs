//! Settings access for distfile fetching.
//!
//! The fetch core only consumes settings through the [`Settings`] trait:
//! string variables, the enabled [`FeatureSet`], third-party mirror groups
//! and an optional [`RepositoryLookup`] used to source manifest digests.
//!
//! [`MapSettings`] is the in-memory implementation; [`SettingsProfile`]
//! builds one from a TOML profile overlaid with the process environment.

pub use self::error::{Error, Result};
pub use self::features::FeatureSet;
pub use self::mirrors_file::{
    CUSTOM_MIRRORS_FILE, custom_mirrors_path, grab_dict, load_custom_mirrors, parse_dict,
};
pub use self::profile::SettingsProfile;
pub use self::repository::{DigestMap, DistDigests, RepositoryLookup, StaticRepository};
pub use self::settings::{MapSettings, MapSettingsBuilder, MirrorGroups, Settings};

pub mod keys;

mod error;
mod features;
mod mirrors_file;
mod profile;
mod repository;
mod settings;
