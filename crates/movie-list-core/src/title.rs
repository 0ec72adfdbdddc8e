//! Splitting a free-text movie title into title and release year.

use regex::Regex;
use std::sync::LazyLock;

static HAS_FOUR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("four digit regex should compile"));

// Only years from the 2nd and 3rd millennium are recognised.
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\(?([12]\d{3})?\)?$").expect("trailing year regex should compile")
});

/// Split a title such as `"Inception 2010"` or `"Inception (2010)"` into
/// `("Inception", Some(2010))`.
///
/// A title that is nothing but a year (`"2012"`) is kept as the title.
#[must_use]
pub fn split_title_year(input: &str) -> (String, Option<i32>) {
    if input.is_empty() {
        return (String::new(), None);
    }
    if !HAS_FOUR_DIGITS.is_match(input) {
        return (input.to_string(), None);
    }

    let Some(captures) = TRAILING_YEAR.captures(input) else {
        return (input.to_string(), None);
    };
    let title = captures.get(1).map_or("", |m| m.as_str()).trim();
    let year = captures.get(2).map(|m| m.as_str());

    match year {
        Some(year) if title.is_empty() => (year.to_string(), None),
        Some(year) => (title.to_string(), year.parse().ok()),
        None => (title.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_trailing_year() {
        assert_eq!(
            split_title_year("Inception 2010"),
            ("Inception".to_string(), Some(2010))
        );
    }

    #[test]
    fn test_split_parenthesised_year() {
        assert_eq!(
            split_title_year("The Matrix (1999)"),
            ("The Matrix".to_string(), Some(1999))
        );
    }

    #[test]
    fn test_split_without_year() {
        assert_eq!(split_title_year("Inception"), ("Inception".to_string(), None));
    }

    #[test]
    fn test_split_year_only_title() {
        assert_eq!(split_title_year("2012"), ("2012".to_string(), None));
    }

    #[test]
    fn test_split_year_in_the_middle_is_not_a_year() {
        assert_eq!(
            split_title_year("2001 A Space Odyssey"),
            ("2001 A Space Odyssey".to_string(), None)
        );
    }

    #[test]
    fn test_split_title_containing_year_and_trailing_year() {
        assert_eq!(
            split_title_year("Blade Runner 2049 2017"),
            ("Blade Runner 2049".to_string(), Some(2017))
        );
    }

    #[test]
    fn test_split_ignores_out_of_range_years() {
        assert_eq!(split_title_year("Movie 3000"), ("Movie 3000".to_string(), None));
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split_title_year(""), (String::new(), None));
    }
}
