//! # Input Line
//!
//! The not-yet-submitted command. Editing is append-only at the end plus
//! delete-last; there is no cursor movement.

use crate::styling::CURSOR_GLYPH;
use log::debug;

/// Mutable input line
///
/// Unbounded by default. With a cap, characters beyond the cap are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: String,
    max_len: Option<usize>,
}

impl InputLine {
    /// Creates an empty, unbounded input line
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty input line holding at most `max_len` characters
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            text: String::new(),
            max_len: Some(max_len),
        }
    }

    /// Returns the character cap, if any
    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Appends text to the end of the line
    pub fn append(&mut self, s: &str) {
        match self.max_len {
            None => self.text.push_str(s),
            Some(max) => {
                let room = max.saturating_sub(self.len());
                let incoming = s.chars().count();
                if incoming > room {
                    debug!(
                        "input line full, dropping {} character(s)",
                        incoming - room
                    );
                }
                self.text.extend(s.chars().take(room));
            }
        }
    }

    /// Removes the last character
    ///
    /// Returns the removed character, or `None` if the line was empty.
    pub fn backspace(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Takes the current contents, leaving the line empty
    pub fn clear(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Current contents
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Contents followed by the cursor glyph
    pub fn render(&self) -> String {
        let mut view = String::with_capacity(self.text.len() + 1);
        view.push_str(&self.text);
        view.push(CURSOR_GLYPH);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append() {
        let mut line = InputLine::new();
        line.append("1");
        line.append("+1");
        assert_eq!(line.as_str(), "1+1");
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_split_append_matches_single_append() {
        for (a, b) in [("", ""), ("x", ""), ("", "y"), ("pri", "nt(1)"), ("é", "ü")] {
            let mut split = InputLine::new();
            split.append(a);
            split.append(b);

            let mut single = InputLine::new();
            single.append(&format!("{}{}", a, b));

            assert_eq!(split, single);
        }
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let mut line = InputLine::new();
        line.append("abé");
        assert_eq!(line.backspace(), Some('é'));
        assert_eq!(line.as_str(), "ab");
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut line = InputLine::new();
        assert_eq!(line.backspace(), None);
        assert_eq!(line.backspace(), None);
        assert!(line.is_empty());
    }

    #[test]
    fn test_clear_returns_contents() {
        let mut line = InputLine::new();
        line.append("x = 5");
        assert_eq!(line.clear(), "x = 5");
        assert!(line.is_empty());
        assert_eq!(line.clear(), "");
    }

    #[test]
    fn test_render_appends_cursor() {
        let mut line = InputLine::new();
        assert_eq!(line.render(), "_");
        line.append("ab");
        assert_eq!(line.render(), "ab_");
    }

    #[test]
    fn test_cap_truncates() {
        let mut line = InputLine::with_max_len(4);
        line.append("abc");
        line.append("def");
        assert_eq!(line.as_str(), "abcd");
        line.backspace();
        line.append("  ");
        assert_eq!(line.as_str(), "abc ");
    }

    #[test]
    fn test_cap_preserves_append_split_property() {
        let mut split = InputLine::with_max_len(5);
        split.append("abc");
        split.append("defg");

        let mut single = InputLine::with_max_len(5);
        single.append("abcdefg");

        assert_eq!(split.as_str(), single.as_str());
    }
}
