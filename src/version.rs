//! Version comparison for installed and catalog tools.

use semver::Version;

/// Parse a `MAJOR.MINOR.PATCH` string leniently.
///
/// Pre-release and build suffixes are ignored. Missing or non-numeric
/// segments count as zero, so `"1.2"` compares equal to `"1.2.0"`.
pub fn parse_version(raw: &str) -> Version {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    if let Ok(version) = Version::parse(trimmed) {
        return Version::new(version.major, version.minor, version.patch);
    }

    let core = trimmed.split(['-', '+']).next().unwrap_or_default();
    let mut segments = core.split('.').map(leading_number);
    let major = segments.next().unwrap_or(0);
    let minor = segments.next().unwrap_or(0);
    let patch = segments.next().unwrap_or(0);
    Version::new(major, minor, patch)
}

/// Return true when `candidate` is strictly newer than `current`.
pub fn is_newer(current: &str, candidate: &str) -> bool {
    parse_version(candidate) > parse_version(current)
}

/// Parse the leading digits of a segment, defaulting to zero.
fn leading_number(segment: &str) -> u64 {
    let digits: String = segment
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
