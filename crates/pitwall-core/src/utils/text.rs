use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_width` display columns, ending in `...`.
///
/// # Examples
/// ```
/// use pitwall_core::utils::text::truncate_text;
/// assert_eq!(truncate_text("Monaco Grand Prix", 9), "Monaco...");
/// assert_eq!(truncate_text("Monza", 9), "Monza");
/// ```
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    if max_width <= ELLIPSIS.len() {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ELLIPSIS.len();
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Pad with trailing spaces up to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - text_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_wide_characters() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_text("鈴鹿サーキット", 7), "鈴鹿...");
        assert_eq!(truncate_text("abc", 2), "..");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }
}
