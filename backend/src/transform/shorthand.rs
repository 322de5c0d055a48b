//! Shorthand codes for asset identifiers.

use serde_json::Value;

use crate::models::cell_text;

/// Code used for absent components.
pub const UNKNOWN: &str = "UNK";

/// Maximum code length in characters.
pub const CODE_LEN: usize = 3;

/// Encode a text fragment as an uppercase code of at most three characters.
///
/// Blank or missing text encodes as [`UNKNOWN`].
pub fn shorten(text: Option<&str>) -> String {
    let trimmed = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return UNKNOWN.to_string(),
    };

    trimmed
        .chars()
        .take(CODE_LEN)
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .collect()
}

/// [`shorten`] applied to a sheet cell.
pub fn shorten_cell(value: &Value) -> String {
    shorten(cell_text(value).as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncates_and_uppercases() {
        assert_eq!(shorten(Some("Tower North")), "TOW");
        assert_eq!(shorten(Some("  basement  ")), "BAS");
    }

    #[test]
    fn test_short_text_kept_whole() {
        assert_eq!(shorten(Some("b2")), "B2");
        assert_eq!(shorten(Some(" x ")), "X");
    }

    #[test]
    fn test_blank_is_unknown() {
        assert_eq!(shorten(None), "UNK");
        assert_eq!(shorten(Some("")), "UNK");
        assert_eq!(shorten(Some(" \t ")), "UNK");
    }

    #[test]
    fn test_never_longer_than_three() {
        for text in ["straße", "ßßß", "ﬁle", "日本語テキスト", "ab", "éclair"] {
            let code = shorten(Some(text));
            assert!(code.chars().count() <= CODE_LEN, "{} -> {}", text, code);
            assert!(code.chars().all(|c| c.to_uppercase().next() == Some(c)));
        }
    }

    #[test]
    fn test_cells() {
        assert_eq!(shorten_cell(&json!(101.0)), "101");
        assert_eq!(shorten_cell(&json!(12345)), "123");
        assert_eq!(shorten_cell(&Value::Null), "UNK");
        assert_eq!(shorten_cell(&json!("  ")), "UNK");
    }
}
