use distfetch_mirror::{LayoutSource, MirrorUrl};

/// One location to attempt for a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Candidate {
    /// A literal URI, used as is.
    Uri(String),
    /// A generic mirror, resolved against its layout when attempted.
    Mirror(MirrorUrl),
}

impl Candidate {
    pub fn resolve(&self, layouts: &dyn LayoutSource) -> String {
        match self {
            Candidate::Uri(uri) => uri.clone(),
            Candidate::Mirror(mirror) => mirror.resolve(layouts),
        }
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Candidate::Uri(uri) => Some(uri),
            Candidate::Mirror(_) => None,
        }
    }

    pub fn is_mirror(&self) -> bool { matches!(self, Candidate::Mirror(_)) }
}

impl From<String> for Candidate {
    fn from(uri: String) -> Self { Candidate::Uri(uri) }
}

impl From<MirrorUrl> for Candidate {
    fn from(mirror: MirrorUrl) -> Self { Candidate::Mirror(mirror) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distfetch_mirror::FlatLayouts;

    #[test]
    fn test_resolve() {
        let uri = Candidate::from("https://a/f".to_string());
        assert_eq!(uri.resolve(&FlatLayouts), "https://a/f");
        assert_eq!(uri.as_uri(), Some("https://a/f"));

        let mirror = Candidate::from(MirrorUrl::new("https://m", "f", None));
        assert!(mirror.is_mirror());
        assert_eq!(mirror.resolve(&FlatLayouts), "https://m/distfiles/f");
    }
}
