use std::collections::BTreeSet;

/// The set of enabled `FEATURES` flags.
///
/// Tokens are applied incrementally: `name` enables a flag, `-name`
/// disables it and `-*` clears everything enabled so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet(BTreeSet<String>);

impl FeatureSet {
    pub fn new() -> Self { Self::default() }

    pub fn parse(tokens: &str) -> Self {
        let mut set = Self::new();
        set.apply(tokens);
        set
    }

    pub fn apply(&mut self, tokens: &str) {
        for token in tokens.split_whitespace() {
            match token.strip_prefix('-') {
                Some("*") => self.0.clear(),
                Some(name) => {
                    self.0.remove(name);
                }
                None => {
                    self.0.insert(token.to_string());
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool { self.0.contains(name) }

    pub fn insert(&mut self, name: impl Into<String>) -> bool { self.0.insert(name.into()) }

    pub fn remove(&mut self, name: &str) -> bool { self.0.remove(name) }

    pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enables_tokens() {
        let set = FeatureSet::parse("distlocks  userfetch\nmirror");
        assert_eq!(set.len(), 3);
        assert!(set.contains("distlocks"));
        assert!(set.contains("userfetch"));
        assert!(set.contains("mirror"));
    }

    #[test]
    fn test_minus_removes_earlier_token() {
        let set = FeatureSet::parse("distlocks mirror -distlocks");
        assert!(!set.contains("distlocks"));
        assert!(set.contains("mirror"));
    }

    #[test]
    fn test_minus_star_clears() {
        let mut set = FeatureSet::parse("distlocks mirror");
        set.apply("-* lmirror");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["lmirror"]);
    }

    #[test]
    fn test_removing_absent_token_is_noop() {
        let set = FeatureSet::parse("-force-mirror");
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let set: FeatureSet = ["mirror", "lmirror"].into_iter().collect();
        assert!(set.contains("lmirror"));
        assert!(!set.contains("distlocks"));
    }
}
