use crate::version::error::ResolveError;

/// Parse the major version (text before the first '.') of a release identifier.
///
/// Examples:
/// - "120.0.2210.91" -> 120
/// - "99" -> 99
/// - "-1.0.0.0" -> -1
/// - "v120.0" -> error
pub fn parse_major(version: &str) -> Result<i64, ResolveError> {
    let major = version.split('.').next().unwrap_or_default();
    major
        .parse()
        .map_err(|_| ResolveError::InvalidVersion(version.to_string()))
}

/// Major versions to try below `major`, nearest first.
///
/// Yields `major - 1` down to `major - (count - 1)`, stopping before zero.
/// A major of zero or below yields nothing.
pub fn previous_majors(major: i64, count: usize) -> impl Iterator<Item = u64> {
    let major = u64::try_from(major).unwrap_or(0);
    let limit = usize::try_from(major).unwrap_or(usize::MAX).min(count);
    (1..limit).map(move |offset| major - offset as u64)
}
