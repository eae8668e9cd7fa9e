//! ISBN selection and normalization

/// Strip everything but digits and a trailing check character `X`
///
/// `"0-8044-2957-x"` → `"080442957X"`. An `X` anywhere but the last
/// position is dropped.
pub fn normalize_isbn(raw: &str) -> String {
    let kept: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let last = kept.len().saturating_sub(1);
    kept.iter()
        .enumerate()
        .filter(|(i, c)| **c != 'X' || *i == last)
        .map(|(_, c)| *c)
        .collect()
}

/// Pick one ISBN from a mixed list: ISBN-13 first, then ISBN-10, then
/// whatever comes first
///
/// Lengths are judged after normalization, so hyphenated input counts.
pub fn select_isbn<S: AsRef<str>>(candidates: &[S]) -> Option<String> {
    let normalized: Vec<String> = candidates
        .iter()
        .map(|c| normalize_isbn(c.as_ref()))
        .filter(|c| !c.is_empty())
        .collect();

    let pick = normalized
        .iter()
        .find(|c| c.len() == 13)
        .or_else(|| normalized.iter().find(|c| c.len() == 10))
        .or_else(|| normalized.first())?;

    Some(pick.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphens_stripped() {
        assert_eq!(normalize_isbn("978-0-13-468599-1"), "9780134685991");
    }

    #[test]
    fn test_trailing_x_kept_uppercase() {
        assert_eq!(normalize_isbn("0-8044-2957-x"), "080442957X");
    }

    #[test]
    fn test_inner_x_dropped() {
        assert_eq!(normalize_isbn("12X45"), "1245");
    }

    #[test]
    fn test_prefers_isbn13() {
        let isbns = vec!["0441013597".to_string(), "978-0441013593".to_string()];
        assert_eq!(select_isbn(&isbns), Some("9780441013593".to_string()));
    }

    #[test]
    fn test_falls_back_to_isbn10() {
        assert_eq!(
            select_isbn(&["12345", "0-441-01359-7"]),
            Some("0441013597".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_first_entry() {
        assert_eq!(select_isbn(&["n/a", "12345", "678"]), Some("12345".to_string()));
    }

    #[test]
    fn test_empty_list() {
        let empty: [&str; 0] = [];
        assert_eq!(select_isbn(&empty), None);
        assert_eq!(select_isbn(&["--"]), None);
    }
}
