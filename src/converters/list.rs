//! Comma-separated list values.

/// Split a list value on unescaped commas.
///
/// `\,` produces a literal comma inside an element. Empty elements are dropped.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::converters::split_values;
///
/// assert_eq!(split_values("a,b\\,c,,d"), vec!["a", "b,c", "d"]);
/// ```
pub fn split_values(value: &str) -> Vec<String> {
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => {
                if !current.is_empty() {
                    elements.push(std::mem::take(&mut current));
                }
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        elements.push(current);
    }
    elements
}

/// Escape commas so that `element` survives [`split_values`] intact.
pub fn escape_element(element: &str) -> String {
    element.replace(',', "\\,")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain() {
        assert_eq!(split_values("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_skips_empty_elements() {
        assert_eq!(split_values(",a,,b,"), vec!["a", "b"]);
        assert!(split_values("").is_empty());
        assert!(split_values(",,").is_empty());
    }

    #[test]
    fn test_escaped_comma() {
        let escaped = escape_element("x,y");
        assert_eq!(escaped, "x\\,y");
        assert_eq!(split_values(&format!("{},z", escaped)), vec!["x,y", "z"]);
    }

    #[test]
    fn test_backslash_without_comma_is_kept() {
        assert_eq!(split_values("c:\\dir,d"), vec!["c:\\dir", "d"]);
    }
}
