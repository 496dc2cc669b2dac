//! Classification of configured mirrors into filesystem, local, public and
//! third-party groups.

use distfetch_settings::{MirrorGroups, Settings, keys};
use tracing::debug;

/// Custom mirror group holding organization-internal mirrors.
pub const LOCAL_MIRROR_GROUP: &str = "local";

/// Mirrors available to a fetch, split by kind. Every collection keeps the
/// order of its source list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorCatalog {
    fsmirrors:  Vec<String>,
    local:      Vec<String>,
    public:     Vec<String>,
    thirdparty: MirrorGroups,
}

impl MirrorCatalog {
    pub fn empty() -> Self { Self::default() }

    /// Classify the `local` custom group and the whitespace separated global
    /// mirror list. Filesystem paths from either source become filesystem
    /// mirrors; the rest of `local` is local, the rest of the global list is
    /// public.
    pub fn build(custom: &MirrorGroups, global_mirrors: &str, thirdparty: &MirrorGroups) -> Self {
        let mut catalog = Self::empty();

        for entry in custom.get(LOCAL_MIRROR_GROUP).into_iter().flatten() {
            match filesystem_path(entry) {
                Some(path) => catalog.fsmirrors.push(path),
                None => catalog.local.push(strip_trailing_slashes(entry)),
            }
        }

        for entry in global_mirrors.split_whitespace() {
            match filesystem_path(entry) {
                Some(path) => catalog.fsmirrors.push(path),
                None => catalog.public.push(strip_trailing_slashes(entry)),
            }
        }

        catalog.thirdparty = thirdparty.clone();

        debug!(
            fsmirrors = catalog.fsmirrors.len(),
            local = catalog.local.len(),
            public = catalog.public.len(),
            thirdparty = catalog.thirdparty.len(),
            "built mirror catalog"
        );
        catalog
    }

    /// Build from settings, or an empty catalog when mirrors are not tried.
    pub fn from_settings<S>(settings: &S, custom: &MirrorGroups, try_mirrors: bool) -> Self
    where
        S: Settings + ?Sized,
    {
        if !try_mirrors {
            return Self::empty();
        }
        Self::build(
            custom,
            settings.get_or(keys::GENTOO_MIRRORS, ""),
            settings.thirdpartymirrors(),
        )
    }

    pub fn fsmirrors(&self) -> &[String] { &self.fsmirrors }

    pub fn local(&self) -> &[String] { &self.local }

    pub fn public(&self) -> &[String] { &self.public }

    pub fn thirdparty(&self) -> &MirrorGroups { &self.thirdparty }

    pub fn is_empty(&self) -> bool {
        self.fsmirrors.is_empty()
            && self.local.is_empty()
            && self.public.is_empty()
            && self.thirdparty.is_empty()
    }
}

/// `Some(path)` when `entry` names a directory rather than a URL.
pub fn filesystem_path(entry: &str) -> Option<String> {
    if let Some(path) = entry.strip_prefix("file://") {
        return Some(strip_trailing_slashes(path));
    }
    if entry.contains("://") {
        return None;
    }
    Some(strip_trailing_slashes(entry))
}

fn strip_trailing_slashes(entry: &str) -> String {
    let stripped = entry.trim_end_matches('/');
    if stripped.is_empty() && entry.starts_with('/') {
        "/".to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distfetch_settings::MapSettings;

    fn groups(entries: &[(&str, &[&str])]) -> MirrorGroups {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_filesystem_path_detection() {
        assert_eq!(filesystem_path("/srv/mirror/"), Some("/srv/mirror".into()));
        assert_eq!(filesystem_path("relative/dir"), Some("relative/dir".into()));
        assert_eq!(filesystem_path("file:///srv/m/"), Some("/srv/m".into()));
        assert_eq!(filesystem_path("https://a/"), None);
        assert_eq!(filesystem_path("/"), Some("/".into()));
    }

    #[test]
    fn test_build_classifies_entries() {
        let custom = groups(&[
            ("local", &["http://lan/distfiles/", "/srv/local/"]),
            ("gnu", &["https://gnu.example"]),
        ]);
        let catalog = MirrorCatalog::build(
            &custom,
            "https://a.example/  /mnt/distfiles https://b.example",
            &MirrorGroups::new(),
        );

        assert_eq!(catalog.local(), ["http://lan/distfiles"]);
        assert_eq!(catalog.fsmirrors(), ["/srv/local", "/mnt/distfiles"]);
        assert_eq!(catalog.public(), ["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_named_custom_groups_are_not_generic_mirrors() {
        let custom = groups(&[("gnu", &["https://gnu.example"])]);
        let catalog = MirrorCatalog::build(&custom, "", &MirrorGroups::new());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_settings_without_try_mirrors_is_empty() {
        let settings = MapSettings::builder()
            .var("GENTOO_MIRRORS", "https://a.example /mnt/d")
            .thirdparty_mirror("gnu", ["https://gnu.example"])
            .build();
        let custom = groups(&[("local", &["http://lan"])]);

        let catalog = MirrorCatalog::from_settings(&settings, &custom, false);
        assert!(catalog.fsmirrors().is_empty());
        assert!(catalog.local().is_empty());
        assert!(catalog.public().is_empty());
        assert!(catalog.thirdparty().is_empty());

        let catalog = MirrorCatalog::from_settings(&settings, &custom, true);
        assert_eq!(catalog.local(), ["http://lan"]);
        assert_eq!(catalog.public(), ["https://a.example"]);
        assert_eq!(catalog.fsmirrors(), ["/mnt/d"]);
        assert_eq!(catalog.thirdparty()["gnu"], vec!["https://gnu.example"]);
    }
}
