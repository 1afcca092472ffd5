//! Byte-offset helpers for text node data.
//!
//! Offsets are UTF-8 byte indices. Word boundaries are delimited by the ASCII
//! space only, matching how highlights are expected to snap in the UI.

use memchr::{memchr, memrchr};

/// Clamp an arbitrary byte index to a valid UTF-8 character boundary.
///
/// Indices past the end clamp to `s.len()`; indices inside a multi-byte
/// character move back to the start of that character.
///
/// ```
/// use highlight_core::clamp_to_char_boundary;
///
/// let s = "a€b"; // '€' is 3 bytes
/// assert_eq!(clamp_to_char_boundary(s, 2), 1);
/// assert_eq!(clamp_to_char_boundary(s, 4), 4);
/// assert_eq!(clamp_to_char_boundary(s, 100), 5);
/// ```
#[inline]
pub fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Start of the word containing `offset`: one past the nearest space before
/// it, or 0.
pub fn word_start(text: &str, offset: usize) -> usize {
    let offset = clamp_to_char_boundary(text, offset);
    memrchr(b' ', &text.as_bytes()[..offset]).map_or(0, |i| i + 1)
}

/// End of the word containing `offset`: the nearest space at or after it, or
/// the end of the text.
pub fn word_end(text: &str, offset: usize) -> usize {
    let offset = clamp_to_char_boundary(text, offset);
    memchr(b' ', &text.as_bytes()[offset..]).map_or(text.len(), |i| offset + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_start_stops_after_space() {
        assert_eq!(word_start("hello brave world", 9), 6);
        assert_eq!(word_start("hello brave world", 6), 6);
        assert_eq!(word_start("hello", 3), 0);
    }

    #[test]
    fn word_end_stops_at_space() {
        assert_eq!(word_end("hello brave world", 8), 11);
        assert_eq!(word_end("hello brave world", 11), 11);
        assert_eq!(word_end("hello", 2), 5);
    }

    #[test]
    fn multibyte_text() {
        let s = "café au lait";
        assert_eq!(word_end(s, 1), 5);
        assert_eq!(word_start(s, 8), 6);
    }
}
