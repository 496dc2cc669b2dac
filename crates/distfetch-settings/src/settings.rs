//! The settings accessor contract and its in-memory implementation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::features::FeatureSet;
use crate::keys;
use crate::repository::RepositoryLookup;

/// Mirror group name to ordered base URLs.
pub type MirrorGroups = BTreeMap<String, Vec<String>>;

/// Read-only view of the environment-derived configuration that governs
/// fetching.
///
/// Implementations only have to provide [`features`](Settings::features),
/// [`get`](Settings::get) and [`thirdpartymirrors`](Settings::thirdpartymirrors);
/// item lookup and membership are derived from `get`.
pub trait Settings: Send + Sync {
    fn features(&self) -> &FeatureSet;

    fn get(&self, key: &str) -> Option<&str>;

    fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Item lookup: absence is an error.
    fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    fn contains(&self, key: &str) -> bool { self.get(key).is_some() }

    fn thirdpartymirrors(&self) -> &MirrorGroups;

    fn repositories(&self) -> Option<&dyn RepositoryLookup> { None }
}

/// Settings held in memory.
///
/// # Examples
///
/// ```
/// use distfetch_settings::{MapSettings, Settings};
///
/// let settings = MapSettings::builder()
///     .var("DISTDIR", "/var/cache/distfiles")
///     .features("distlocks -userfetch")
///     .thirdparty_mirror("gnu", ["https://ftp.gnu.org/gnu"])
///     .build();
///
/// assert_eq!(settings.get("DISTDIR"), Some("/var/cache/distfiles"));
/// assert!(settings.features().contains("distlocks"));
/// ```
#[derive(Clone, Default)]
pub struct MapSettings {
    vars:         HashMap<String, String>,
    features:     FeatureSet,
    thirdparty:   MirrorGroups,
    repositories: Option<Arc<dyn RepositoryLookup>>,
}

impl fmt::Debug for MapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSettings")
            .field("vars", &self.vars)
            .field("features", &self.features)
            .field("thirdparty", &self.thirdparty)
            .field("repositories", &self.repositories.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl MapSettings {
    pub fn new() -> Self { Self::default() }

    pub fn builder() -> MapSettingsBuilder { MapSettingsBuilder::default() }

    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Settings for MapSettings {
    fn features(&self) -> &FeatureSet { &self.features }

    fn get(&self, key: &str) -> Option<&str> { self.vars.get(key).map(String::as_str) }

    fn thirdpartymirrors(&self) -> &MirrorGroups { &self.thirdparty }

    fn repositories(&self) -> Option<&dyn RepositoryLookup> { self.repositories.as_deref() }
}

#[derive(Default)]
pub struct MapSettingsBuilder {
    vars:         HashMap<String, String>,
    features:     Vec<String>,
    thirdparty:   MirrorGroups,
    repositories: Option<Arc<dyn RepositoryLookup>>,
}

impl MapSettingsBuilder {
    #[must_use]
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn vars<K, V, I>(mut self, vars: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Apply `FEATURES`-style tokens on top of anything set so far.
    #[must_use]
    pub fn features(mut self, tokens: impl Into<String>) -> Self {
        self.features.push(tokens.into());
        self
    }

    #[must_use]
    pub fn thirdparty_mirror<S, I>(mut self, name: impl Into<String>, urls: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.thirdparty
            .insert(name.into(), urls.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn repositories(mut self, lookup: Arc<dyn RepositoryLookup>) -> Self {
        self.repositories = Some(lookup);
        self
    }

    /// A `FEATURES` var is applied first, then every
    /// [`features`](Self::features) call in order.
    pub fn build(self) -> MapSettings {
        let mut features = FeatureSet::new();
        if let Some(tokens) = self.vars.get(keys::FEATURES) {
            features.apply(tokens);
        }
        for tokens in &self.features {
            features.apply(tokens);
        }

        MapSettings {
            vars: self.vars,
            features,
            thirdparty: self.thirdparty,
            repositories: self.repositories,
        }
    }
}
