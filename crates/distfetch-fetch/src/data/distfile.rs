use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use distfetch_settings::DistDigests;

/// A file to fetch. Identity is the filename alone; the digests travel
/// with it for verification.
#[derive(Debug, Clone, Default)]
pub struct DistfileName {
    name:    String,
    digests: DistDigests,
}

impl DistfileName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            digests: DistDigests::default(),
        }
    }

    #[must_use]
    pub fn with_digests(mut self, digests: DistDigests) -> Self {
        self.digests = digests;
        self
    }

    pub fn as_str(&self) -> &str { &self.name }

    pub fn digests(&self) -> &DistDigests { &self.digests }
}

impl PartialEq for DistfileName {
    fn eq(&self, other: &Self) -> bool { self.name == other.name }
}

impl Eq for DistfileName {}

impl Hash for DistfileName {
    fn hash<H: Hasher>(&self, state: &mut H) { self.name.hash(state) }
}

impl Borrow<str> for DistfileName {
    fn borrow(&self) -> &str { &self.name }
}

impl fmt::Display for DistfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
}

impl From<&str> for DistfileName {
    fn from(name: &str) -> Self { Self::new(name) }
}

impl From<String> for DistfileName {
    fn from(name: String) -> Self { Self::new(name) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_digests() {
        let a = DistfileName::new("f.tar.gz");
        let b = DistfileName::new("f.tar.gz").with_digests(DistDigests::new().size(3));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
        assert!(set.contains("f.tar.gz"));
    }

    #[test]
    fn test_display() {
        assert_eq!(DistfileName::from("x.zip").to_string(), "x.zip");
    }
}
