//! Version derivation
//!
//! Malformed version strings are returned unchanged under every strategy.
//! That is policy, not an error: a package with an exotic version scheme is
//! persisted as-is rather than blocked.

/// How the next version is derived when a configuration change is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionStrategy {
    /// `major.minor.patch` with the patch component incremented
    #[default]
    Patch,
    /// `major.minor.patch-beta.N` with the beta component incremented
    Beta,
}

impl VersionStrategy {
    /// Derive the next version string
    pub fn next(&self, version: &str) -> String {
        match self {
            VersionStrategy::Patch => bump_patch(version),
            VersionStrategy::Beta => bump_beta(version),
        }
    }
}

/// Canonical ASCII digits only; `u64::from_str` alone would admit `+3` or
/// `03`, silently normalizing the version on the way through
fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

/// Exactly three dot-separated non-negative integers, or `None`
fn parse_three(version: &str) -> Option<[u64; 3]> {
    let mut parts = version.split('.');
    let major = parse_component(parts.next()?)?;
    let minor = parse_component(parts.next()?)?;
    let patch = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some([major, minor, patch])
}

fn bump_patch(version: &str) -> String {
    match parse_three(version) {
        Some([major, minor, patch]) => format!("{}.{}.{}", major, minor, patch + 1),
        None => version.to_string(),
    }
}

fn bump_beta(version: &str) -> String {
    let Some((head, beta)) = version.rsplit_once("-beta.") else {
        return version.to_string();
    };
    match (parse_three(head), parse_component(beta)) {
        (Some(_), Some(n)) => format!("{}-beta.{}", head, n + 1),
        _ => version.to_string(),
    }
}
