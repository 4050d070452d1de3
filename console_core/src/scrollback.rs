//! # Scrollback Buffer
//!
//! This module provides the bounded transcript shown above the input line.
//!
//! ## Design
//!
//! - Fixed-width lines (`cols` characters at most)
//! - Hard wrap on overflow, no word-boundary awareness
//! - Drop-oldest eviction once `max_lines` is exceeded
//! - One style for the whole block, taken from the most recent push
//! - No ANSI codes, just plain text

use crate::styling::Style;
use log::trace;
use std::collections::VecDeque;

/// Splits text into display lines of at most `cols` characters
///
/// Text is first split on `\n`; every resulting segment longer than `cols`
/// is cut into consecutive chunks of exactly `cols` characters, the last
/// chunk holding the remainder. Empty segments become empty lines.
pub fn wrap_lines(text: &str, cols: usize) -> Vec<String> {
    let cols = cols.max(1);
    let mut out = Vec::new();

    for segment in text.split('\n') {
        let chars: Vec<char> = segment.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(cols) {
            out.push(chunk.iter().collect());
        }
    }

    out
}

/// Scrollback buffer for transcript text
///
/// Holds at most `max_lines` lines of at most `cols` characters each.
#[derive(Debug, Clone)]
pub struct ScrollbackBuffer {
    /// Width in columns
    cols: usize,
    /// Maximum lines retained (older lines are dropped)
    max_lines: usize,
    /// Retained lines, oldest first
    lines: VecDeque<String>,
    /// Render style of the whole block
    style: Style,
}

impl ScrollbackBuffer {
    /// Create a new scrollback buffer
    ///
    /// # Arguments
    /// * `cols` - Width in columns (a width of 0 is treated as 1)
    /// * `max_lines` - Maximum lines to keep
    pub fn new(cols: usize, max_lines: usize) -> Self {
        Self {
            cols: cols.max(1),
            max_lines,
            lines: VecDeque::with_capacity(max_lines),
            style: Style::Normal,
        }
    }

    /// Get the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the line bound
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Get the number of retained lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the buffer holds no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Current render style of the whole block
    pub fn style(&self) -> Style {
        self.style
    }

    /// Iterate over retained lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// Push text, wrapping and evicting as needed
    ///
    /// Returns the number of display lines the text produced (some of
    /// which may already have been evicted if the text alone exceeds the
    /// bound).
    pub fn push(&mut self, text: &str, style: Style) -> usize {
        let wrapped = wrap_lines(text, self.cols);
        let produced = wrapped.len();
        self.lines.extend(wrapped);

        let mut evicted = 0;
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            trace!("scrollback evicted {} line(s)", evicted);
        }

        self.style = style;
        produced
    }

    /// Join the retained lines with line breaks
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line);
        }
        out
    }

    /// Clear all content
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(buffer: &ScrollbackBuffer) -> Vec<String> {
        buffer.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_scrollback_creation() {
        let buffer = ScrollbackBuffer::new(40, 9);
        assert_eq!(buffer.cols(), 40);
        assert_eq!(buffer.max_lines(), 9);
        assert!(buffer.is_empty());
        assert_eq!(buffer.render(), "");
    }

    #[test]
    fn test_short_text_adds_one_line() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        assert_eq!(buffer.push("hello", Style::Normal), 1);
        assert_eq!(collect(&buffer), vec!["hello"]);
    }

    #[test]
    fn test_exact_width_is_not_wrapped() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        let text = "x".repeat(40);
        assert_eq!(buffer.push(&text, Style::Normal), 1);
        assert_eq!(collect(&buffer), vec![text]);
    }

    #[test]
    fn test_hard_wrap_into_full_chunks_and_remainder() {
        let mut buffer = ScrollbackBuffer::new(10, 9);
        let text = "abcdefghij".repeat(2) + "xyz";
        assert_eq!(buffer.push(&text, Style::Normal), 3);
        assert_eq!(collect(&buffer), vec!["abcdefghij", "abcdefghij", "xyz"]);
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        let lines = wrap_lines(&"é".repeat(45), 40);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().count(), 40);
        assert_eq!(lines[1].chars().count(), 5);
    }

    #[test]
    fn test_embedded_newlines_split_segments() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        assert_eq!(buffer.push("one\ntwo\nthree", Style::Normal), 3);
        assert_eq!(collect(&buffer), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_empty_segments_are_kept() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        assert_eq!(buffer.push("", Style::Normal), 1);
        assert_eq!(buffer.push("a\n", Style::Normal), 2);
        assert_eq!(collect(&buffer), vec!["", "a", ""]);
    }

    #[test]
    fn test_eviction_keeps_most_recent_in_order() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        for i in 1..=12 {
            buffer.push(&i.to_string(), Style::Normal);
        }

        assert_eq!(buffer.len(), 9);
        let expected: Vec<String> = (4..=12).map(|i| i.to_string()).collect();
        assert_eq!(collect(&buffer), expected);
    }

    #[test]
    fn test_single_push_larger_than_bound() {
        let mut buffer = ScrollbackBuffer::new(2, 3);
        buffer.push("aabbccdd", Style::Normal);
        assert_eq!(collect(&buffer), vec!["bb", "cc", "dd"]);
    }

    #[test]
    fn test_bound_holds_for_mixed_pushes() {
        let mut buffer = ScrollbackBuffer::new(5, 4);
        let mut pushed = Vec::new();
        for text in ["a", "bbbbbbb", "c\nd", "", "eeeeeeeeeeee", "f"] {
            pushed.extend(wrap_lines(text, 5));
            buffer.push(text, Style::Normal);
            assert!(buffer.len() <= 4);
            let tail = pushed[pushed.len().saturating_sub(4)..].to_vec();
            assert_eq!(collect(&buffer), tail);
        }
    }

    #[test]
    fn test_style_tracks_latest_push() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        buffer.push("> 1/0", Style::Dim);
        assert_eq!(buffer.style(), Style::Dim);
        buffer.push("Err: division by zero", Style::Error);
        assert_eq!(buffer.style(), Style::Error);
    }

    #[test]
    fn test_render_joins_lines() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        buffer.push("> 1+1", Style::Dim);
        buffer.push("2", Style::Normal);
        assert_eq!(buffer.render(), "> 1+1\n2");
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let mut buffer = ScrollbackBuffer::new(0, 9);
        assert_eq!(buffer.cols(), 1);
        assert_eq!(buffer.push("ab", Style::Normal), 2);
    }

    #[test]
    fn test_clear() {
        let mut buffer = ScrollbackBuffer::new(40, 9);
        buffer.push("Line 1", Style::Normal);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
