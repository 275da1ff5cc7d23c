//! Version source and tolerant comparison

use semver::Version;

/// Version of the running binary, embedded at build time
pub fn current_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Parse a release tag or version string leniently
///
/// Accepts a leading `v`/`V` and short numeric forms (`1`, `1.2`), which are
/// zero-padded to a full `major.minor.patch` triple.
pub fn parse_lenient(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.is_empty()
        || parts.len() > 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    Version::parse(&padded).ok()
}

/// Whether `candidate` is strictly newer than `current`
///
/// Never fails: if either side cannot be parsed the candidate is treated as
/// not newer.
pub fn is_newer_version(current: &str, candidate: &str) -> bool {
    match (parse_lenient(current), parse_lenient(candidate)) {
        (Some(current), Some(candidate)) => candidate > current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_minor() {
        assert!(is_newer_version("1.2.0", "1.3.0"));
    }

    #[test]
    fn test_older_and_equal_are_not_newer() {
        assert!(!is_newer_version("1.3.0", "1.2.0"));
        assert!(!is_newer_version("1.2.0", "1.2.0"));
    }

    #[test]
    fn test_garbage_candidate_is_not_newer() {
        assert!(!is_newer_version("1.2.0", "abc"));
        assert!(!is_newer_version("1.2.0", ""));
        assert!(!is_newer_version("1.2.0", "1..2"));
    }

    #[test]
    fn test_unparseable_current_is_never_nagged() {
        assert!(!is_newer_version("dev", "9.9.9"));
    }

    #[test]
    fn test_tag_prefix_and_short_forms() {
        assert!(is_newer_version("v1.2.0", "v1.2.1"));
        assert!(is_newer_version("1.2.0", "V2"));
        assert!(!is_newer_version("1.2", "v1.2.0"));
        assert_eq!(parse_lenient("1.2"), Some(Version::new(1, 2, 0)));
    }

    #[test]
    fn test_prerelease_ordering() {
        assert!(is_newer_version("1.3.0-rc.1", "1.3.0"));
        assert!(!is_newer_version("1.3.0", "1.3.0-rc.1"));
    }

    #[test]
    fn test_current_version_parses() {
        assert!(parse_lenient(current_version()).is_some());
    }
}
