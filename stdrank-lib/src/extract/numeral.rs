use crate::Result;
use ohno::IntoAppError;

const THOUSANDS_SEPARATOR: char = ',';

/// Parse a displayed count such as `" 19,638\n"` into `19638`.
///
/// Surrounding whitespace and thousands separators are ignored. Anything else that is not a
/// non-negative base-10 integer is an error.
pub fn parse_count(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(|c| *c != THOUSANDS_SEPARATOR).collect();

    digits
        .parse::<u64>()
        .into_app_err_with(|| format!("'{trimmed}' is not a valid count"))
}
