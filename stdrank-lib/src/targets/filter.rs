use super::Target;
use std::collections::HashSet;

/// Path segment that marks a package as not importable from outside its tree.
pub const INTERNAL_SEGMENT: &str = "internal";

/// Returns `true` if any `/`-separated segment of `id` is exactly `internal`.
#[must_use]
pub fn is_internal(id: &str) -> bool {
    id.split('/').any(|segment| segment == INTERNAL_SEGMENT)
}

/// Turn raw identifiers into the list of targets worth querying.
///
/// Internal packages and empty identifiers are dropped. Everything else passes through unchanged,
/// once, in input order; a repeated identifier keeps its first position.
pub fn filter_targets<I, S>(raw: I) -> Vec<Target>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();

    raw.into_iter()
        .filter(|id| !is_internal(id.as_ref()))
        .filter_map(Target::new)
        .filter(|target| seen.insert(target.clone()))
        .collect()
}
