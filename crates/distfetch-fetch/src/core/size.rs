use once_cell::sync::Lazy;
use regex::Regex;

/// Default minimum size of a partial download worth resuming.
pub const DEFAULT_RESUME_SIZE: u64 = 350 * 1024;

pub const DEFAULT_RESUME_SIZE_TEXT: &str = "350K";

static RESUME_SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*([KMG]?)$").unwrap());

/// Parse a byte count such as `20K`, `3 M` or `1G` (powers of 1024).
///
/// Whitespace is allowed around the value and between the count and the
/// unit. Unit letters must be uppercase. An all-whitespace value parses to
/// the default.
pub fn parse_resume_size(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(DEFAULT_RESUME_SIZE);
    }

    let caps = RESUME_SIZE_RE.captures(value)?;
    let count: u64 = caps[1].parse().ok()?;
    let shift = match &caps[2] {
        "K" => 10,
        "M" => 20,
        "G" => 30,
        _ => 0,
    };
    count.checked_mul(1 << shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_resume_size("20K"), Some(20480));
        assert_eq!(parse_resume_size("3 M"), Some(3145728));
        assert_eq!(parse_resume_size(" 20K\n"), Some(20480));
        assert_eq!(parse_resume_size("1G"), Some(1073741824));
        assert_eq!(parse_resume_size("512"), Some(512));
    }

    #[test]
    fn test_rejected_formats() {
        assert_eq!(parse_resume_size("20k"), None);
        assert_eq!(parse_resume_size("1.1G"), None);
        assert_eq!(parse_resume_size("K"), None);
        assert_eq!(parse_resume_size("-1"), None);
        assert_eq!(parse_resume_size("20KB"), None);
        assert_eq!(parse_resume_size("2 0K"), None);
        assert_eq!(parse_resume_size("1 0 0"), None);
    }

    #[test]
    fn test_blank_is_default() {
        assert_eq!(parse_resume_size(""), Some(DEFAULT_RESUME_SIZE));
        assert_eq!(parse_resume_size("  "), Some(DEFAULT_RESUME_SIZE));
        assert_eq!(parse_resume_size(DEFAULT_RESUME_SIZE_TEXT), Some(DEFAULT_RESUME_SIZE));
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(parse_resume_size("99999999999999999999"), None);
        assert_eq!(parse_resume_size("18446744073709551615G"), None);
    }

    proptest! {
        #[test]
        fn prop_units_scale_by_1024(n in 0u64..1_000_000, unit in prop::sample::select(vec!["", "K", "M", "G"])) {
            let factor = match unit {
                "K" => 1u64 << 10,
                "M" => 1 << 20,
                "G" => 1 << 30,
                _ => 1,
            };
            prop_assert_eq!(parse_resume_size(&format!("{}{}", n, unit)), Some(n * factor));
            prop_assert_eq!(parse_resume_size(&format!("{} {}", n, unit)), Some(n * factor));
        }

        #[test]
        fn prop_lowercase_units_rejected(n in 0u64..1_000_000, unit in prop::sample::select(vec!["k", "m", "g"])) {
            prop_assert_eq!(parse_resume_size(&format!("{}{}", n, unit)), None);
        }
    }
}
