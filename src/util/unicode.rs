use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of a string in terminal cells. Wide (CJK, emoji) graphemes
/// count as two cells, combining marks as zero.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Byte offset of the next grapheme boundary after `offset`, or None
/// at the end of the string.
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    let step = s[offset..].graphemes(true).next().map_or(1, str::len);
    Some(offset + step)
}

/// Byte offset of the grapheme boundary before `offset`, or None at
/// the start of the string.
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset].grapheme_indices(true).last().map(|(i, _)| i)
}

/// Start of the whitespace-delimited word left of `offset`.
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let before = s[..offset].trim_end();
    match before.rfind(char::is_whitespace) {
        Some(i) => i + before[i..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}

/// Start of the next word right of `offset`, or the end of the string.
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    if offset >= s.len() {
        return s.len();
    }
    let after = &s[offset..];
    let word = after.find(char::is_whitespace).unwrap_or(after.len());
    let rest = &after[word..];
    let ws = rest.len() - rest.trim_start().len();
    offset + word + ws
}
