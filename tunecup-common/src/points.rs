//! Permissive parsing of vote point values
//!
//! Points are persisted as raw text. Only plain non-negative integer
//! literals count towards scores; anything else (blank, free text,
//! signs, whitespace, overflow) is skipped without being an error.

/// Parse a raw `points_assigned` value.
///
/// Returns `None` for anything that is not a non-empty run of ASCII digits
/// fitting in a `u64`.
///
/// # Examples
/// ```
/// use tunecup_common::points::parse_points;
///
/// assert_eq!(parse_points("5"), Some(5));
/// assert_eq!(parse_points("007"), Some(7));
/// assert_eq!(parse_points("n/a"), None);
/// assert_eq!(parse_points(""), None);
/// assert_eq!(parse_points("-1"), None);
/// ```
pub fn parse_points(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Sum the numeric values among `raws`, skipping everything else
///
/// Saturates at `u64::MAX`.
pub fn sum_points<'a, I>(raws: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    raws.into_iter()
        .filter_map(parse_points)
        .fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        assert_eq!(parse_points("0"), Some(0));
        assert_eq!(parse_points("12"), Some(12));
    }

    #[test]
    fn test_parse_rejects_signs_and_whitespace() {
        assert_eq!(parse_points("+3"), None);
        assert_eq!(parse_points("-3"), None);
        assert_eq!(parse_points(" 3"), None);
        assert_eq!(parse_points("3 "), None);
        assert_eq!(parse_points("3.0"), None);
    }

    #[test]
    fn test_parse_rejects_non_ascii_digits() {
        // Superscript two is a Unicode digit but not a decimal literal
        assert_eq!(parse_points("\u{00B2}"), None);
        assert_eq!(parse_points("\u{0663}"), None);
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(parse_points("99999999999999999999999"), None);
    }

    #[test]
    fn test_sum_skips_non_numeric() {
        let total = sum_points(["5", "n/a", "", "3"]);
        assert_eq!(total, 8);
    }

    #[test]
    fn test_sum_saturates_at_max() {
        let total = sum_points(["18446744073709551615", "1", "7"]);
        assert_eq!(total, u64::MAX);
    }
}
