//! Text shaping for terminal output and log previews
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Line-aware wrapping and UTF-8 safe previews

/// Default column width for transcript rendering
pub const DISPLAY_WIDTH: usize = 96;

/// Wrap text to lines of at most `width` characters (UTF-8 safe, word-aware)
///
/// Existing line breaks are kept. Words longer than `width` are split on
/// character boundaries.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if word_len > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                lines.extend(chunk_long_word(word, width));
                continue;
            }

            let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Split a single long word into chunks respecting UTF-8 boundaries
fn chunk_long_word(word: &str, width: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in word.chars() {
        if count == width {
            result.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// Single-line preview for log output, adding ellipsis if truncated
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let kept: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_line() {
        assert_eq!(wrap_text("hello world", 80), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_text(text, 10);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 10, "line too long: {line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_keeps_paragraph_breaks() {
        let lines = wrap_text("first\n\nsecond", 80);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_text(&"a".repeat(25), 10);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "aaaaa");
    }

    #[test]
    fn test_utf8_safety() {
        let text = "世界".repeat(20);
        for line in wrap_text(&text, 7) {
            assert!(line.chars().count() <= 7);
        }
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short\ntext", 20), "short text");
        let long = preview(&"word ".repeat(30), 20);
        assert_eq!(long.chars().count(), 20);
        assert!(long.ends_with("..."));
    }
}
