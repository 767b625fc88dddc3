//! String helpers for log output

/// Shorten text for a single log line.
///
/// Truncates on a character boundary (never inside a multi-byte UTF-8
/// sequence), collapses newlines to spaces and appends `...` when anything
/// was cut.
///
/// # Examples
/// ```
/// use gnosis_core::utils::string::preview;
///
/// assert_eq!(preview("Field: technology", 5), "Field...");
/// assert_eq!(preview("short", 10), "short");
/// assert_eq!(preview("α → β → γ", 3), "α →...");
/// ```
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.chars().count() <= max_chars {
        flat
    } else {
        let truncated: String = flat.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short() {
        assert_eq!(preview("begin", 10), "begin");
        assert_eq!(preview("", 5), "");
    }

    #[test]
    fn test_preview_exact() {
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn test_preview_multibyte() {
        // '→' is 3 bytes in UTF-8
        let text = "mass → energy → force";
        let result = preview(text, 6);
        assert_eq!(result, "mass →...");
    }

    #[test]
    fn test_preview_glyphs() {
        // Domain glyphs are 4 bytes each
        assert_eq!(preview("🚪📐💎👥", 2), "🚪📐...");
    }

    #[test]
    fn test_preview_flattens_lines() {
        assert_eq!(preview("line one\nline two", 100), "line one line two");
    }
}
