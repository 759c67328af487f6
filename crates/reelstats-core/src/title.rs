//! Release-year extraction from movie titles.
//!
//! Titles carry their year as a trailing parenthetical, e.g.
//! `"Heat (1995)"`. Only a four-digit group at the very end (trailing
//! whitespace allowed) counts; `"Movie Title (Director's Cut)"` has no year.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern matched against the end of a title. Shared with the SQL renderers
/// so in-store and in-process extraction agree.
pub const TITLE_YEAR_PATTERN: &str = r"\(([0-9]{4})\)\s*$";

static TITLE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(TITLE_YEAR_PATTERN).expect("title year pattern is valid"));

/// Extract the release year from a title, or `None` if it has no trailing
/// `(YYYY)`.
pub fn extract_year(title: &str) -> Option<i32> {
    TITLE_YEAR
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_year() {
        assert_eq!(extract_year("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year("Heat (1995) "), Some(1995));
    }

    #[test]
    fn test_last_parenthetical_wins() {
        assert_eq!(
            extract_year("City of Lost Children, The (Cité des enfants perdus, La) (1995)"),
            Some(1995)
        );
        assert_eq!(extract_year("2001: A Space Odyssey (1968)"), Some(1968));
    }

    #[test]
    fn test_no_year() {
        assert_eq!(extract_year("Movie Title (Director's Cut)"), None);
        assert_eq!(extract_year("Babylon 5"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn test_year_not_at_end() {
        assert_eq!(extract_year("Movie (1999) (Director's Cut)"), None);
        assert_eq!(extract_year("Big (1988) Remastered"), None);
    }

    #[test]
    fn test_wrong_digit_count() {
        assert_eq!(extract_year("Short (99)"), None);
        assert_eq!(extract_year("Long (19995)"), None);
        assert_eq!(extract_year("Range (2007-2013)"), None);
    }
}
