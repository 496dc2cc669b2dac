use distfetch_settings::DistDigests;

/// Hash names a manifest may carry.
pub const KNOWN_HASHES: &[&str] = &[
    "BLAKE2B",
    "BLAKE2S",
    "MD5",
    "RMD160",
    "SHA1",
    "SHA256",
    "SHA3_256",
    "SHA3_512",
    "SHA512",
    "STREEBOG256",
    "STREEBOG512",
    "WHIRLPOOL",
];

/// Which hashes to verify, from `PORTAGE_CHECKSUM_FILTER`.
///
/// Tokens are matched case-insensitively and evaluated from last to
/// first: `*` or a hash name accepts, `-*` or `-NAME` rejects. A hash no
/// token matches is rejected. An empty filter, or one whose last token is
/// `*`, accepts everything and is called transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFilter {
    tokens: Vec<String>,
}

impl HashFilter {
    pub fn new(filter: &str) -> Self {
        let mut tokens: Vec<String> = filter.split_whitespace().map(str::to_uppercase).collect();
        if tokens.last().is_some_and(|t| t == "*") {
            tokens.clear();
        }
        tokens.reverse();
        Self { tokens }
    }

    pub fn is_transparent(&self) -> bool { self.tokens.is_empty() }

    pub fn accepts(&self, hash_name: &str) -> bool {
        if self.is_transparent() {
            return true;
        }
        let matches = |token: &str| token == "*" || token == hash_name;
        for token in &self.tokens {
            if matches(token.as_str()) {
                return true;
            }
            if let Some(negated) = token.strip_prefix('-') {
                if matches(negated) {
                    return false;
                }
            }
        }
        false
    }
}

/// Drop hashes the filter rejects, as long as more than one verifiable
/// hash remains. The declared size is always kept.
pub fn apply_hash_filter(digests: &DistDigests, filter: &HashFilter) -> DistDigests {
    let mut verifiable: Vec<&str> = digests
        .hashes
        .keys()
        .map(String::as_str)
        .filter(|name| KNOWN_HASHES.contains(name))
        .collect();
    if verifiable.len() <= 1 {
        return digests.clone();
    }

    let mut modified = false;
    for name in verifiable.clone() {
        if !filter.accepts(name) {
            verifiable.retain(|kept| *kept != name);
            modified = true;
            if verifiable.len() == 1 {
                break;
            }
        }
    }
    if !modified {
        return digests.clone();
    }

    DistDigests {
        size:   digests.size,
        hashes: digests
            .hashes
            .iter()
            .filter(|(name, _)| verifiable.contains(&name.as_str()))
            .map(|(name, hex)| (name.clone(), hex.clone()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digests() -> DistDigests {
        DistDigests::new()
            .size(10)
            .hash("BLAKE2B", "b2")
            .hash("SHA512", "s5")
    }

    #[test]
    fn test_transparent_filters() {
        assert!(HashFilter::new("").is_transparent());
        assert!(HashFilter::new("   ").is_transparent());
        assert!(HashFilter::new("-sha512 *").is_transparent());
        assert!(HashFilter::new("").accepts("MD5"));
    }

    #[test]
    fn test_last_token_wins() {
        let filter = HashFilter::new("* -sha512");
        assert!(!filter.is_transparent());
        assert!(!filter.accepts("SHA512"));
        assert!(filter.accepts("BLAKE2B"));

        let filter = HashFilter::new("-* sha256");
        assert!(filter.accepts("SHA256"));
        assert!(!filter.accepts("SHA512"));
    }

    #[test]
    fn test_default_reject() {
        let filter = HashFilter::new("sha256");
        assert!(filter.accepts("SHA256"));
        assert!(!filter.accepts("BLAKE2B"));
    }

    #[test]
    fn test_apply_keeps_size_and_one_hash() {
        let filtered = apply_hash_filter(&digests(), &HashFilter::new("-*"));
        assert_eq!(filtered.size, Some(10));
        assert_eq!(filtered.hashes.len(), 1);
    }

    #[test]
    fn test_apply_drops_rejected() {
        let filtered = apply_hash_filter(&digests(), &HashFilter::new("sha512"));
        assert_eq!(filtered.size, Some(10));
        assert_eq!(filtered.get("SHA512"), Some("s5"));
        assert_eq!(filtered.get("BLAKE2B"), None);
    }

    #[test]
    fn test_apply_single_hash_untouched() {
        let single = DistDigests::new().size(1).hash("BLAKE2B", "b2");
        assert_eq!(apply_hash_filter(&single, &HashFilter::new("-*")), single);
    }
}
