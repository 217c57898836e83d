//! Greedy word wrapping measured in terminal columns

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` into lines no wider than `width` columns
///
/// Whitespace runs, newlines included, collapse to single breaks. Words
/// wider than `width` start a new line and are split across lines from
/// there. Blank text yields no lines.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let rest_width = rest.width();
            let gap = usize::from(!current.is_empty());

            if current_width + gap + rest_width <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(rest);
                current_width += gap + rest_width;
                break;
            }

            // An overlong word starts on a fresh line rather than filling
            // the tail of the current one.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
                continue;
            }

            let (head, tail) = split_at_width(rest, width);
            lines.push(head.to_string());
            rest = tail;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split off the longest prefix that fits in `width` columns, always
/// taking at least one character
fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    let mut cut = 0;
    for (i, c) in word.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width && cut > 0 {
            break;
        }
        used += w;
        cut = i + c.len_utf8();
    }
    word.split_at(cut)
}
