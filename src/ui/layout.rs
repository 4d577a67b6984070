use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Word-wraps `text` to `width` display columns.
///
/// Explicit line breaks are kept (blank lines included), runs of whitespace
/// collapse to one space, and words wider than the line are broken by
/// character. Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in raw_line.split_whitespace() {
            let word_width = word.width();
            if current_width > 0 && current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if current_width > 0 {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }
            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if current_width > 0 && current_width + char_width > width {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += char_width;
            }
        }
        out.push(current);
    }

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// First row to show so that `from_bottom` rows are hidden below the view,
/// clamped to the content. Also returns the clamped `from_bottom`.
pub fn scroll_top(total_lines: usize, height: usize, from_bottom: usize) -> (usize, usize) {
    let max_offset = total_lines.saturating_sub(height);
    let from_bottom = from_bottom.min(max_offset);
    (max_offset - from_bottom, from_bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(wrap_text("hello world foo", 11), ["hello world", "foo"]);
        assert_eq!(wrap_text("hello   world", 20), ["hello world"]);
    }

    #[test]
    fn breaks_words_longer_than_the_line() {
        assert_eq!(wrap_text("abcdefghij", 4), ["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("ok abcdefgh", 4), ["ok", "abcd", "efgh"]);
    }

    #[test]
    fn keeps_paragraph_breaks() {
        assert_eq!(wrap_text("a\n\nb", 10), ["a", "", "b"]);
        assert_eq!(wrap_text("", 10), [""]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_text("学校学校", 4), ["学校", "学校"]);
    }

    #[test]
    fn scroll_top_clamps_to_content() {
        assert_eq!(scroll_top(5, 10, 3), (0, 0));
        assert_eq!(scroll_top(30, 10, 0), (20, 0));
        assert_eq!(scroll_top(30, 10, 5), (15, 5));
        assert_eq!(scroll_top(30, 10, 99), (0, 20));
    }
}
