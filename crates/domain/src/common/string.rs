//! String conversion utilities.

/// Returns `true` when the string is empty or contains only whitespace.
///
/// # Examples
///
/// ```
/// use filmhub_domain::common::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank("  \t"));
/// assert!(!is_blank(" a "));
/// ```
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns `value` unless it is missing or blank, in which case `fallback` is used.
///
/// # Examples
///
/// ```
/// use filmhub_domain::common::or_fallback;
///
/// assert_eq!(or_fallback(Some("Neo"), "neo1999"), "Neo");
/// assert_eq!(or_fallback(Some(" "), "neo1999"), "neo1999");
/// assert_eq!(or_fallback(None, "neo1999"), "neo1999");
/// ```
pub fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !is_blank(v) => v.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" "));
        assert!(is_blank("\n\t"));
        assert!(!is_blank("x"));
    }

    #[test]
    fn test_or_fallback() {
        assert_eq!(or_fallback(Some("Trinity"), "trin"), "Trinity");
        assert_eq!(or_fallback(Some(""), "trin"), "trin");
        assert_eq!(or_fallback(None, "trin"), "trin");
    }
}
