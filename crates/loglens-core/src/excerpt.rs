//! line cap applied to uploaded logs before they reach the model

use std::borrow::Cow;
use std::str::Utf8Error;

/// Default number of lines forwarded to the model
pub const MAX_LINES: usize = 500;

/// The part of an uploaded log that is actually sent out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExcerpt<'a> {
    text: Cow<'a, str>,
    total_lines: usize,
    kept_lines: usize,
}

impl<'a> LogExcerpt<'a> {
    /// Decode raw upload bytes, then cap them to `max_lines`.
    pub fn from_bytes(bytes: &'a [u8], max_lines: usize) -> Result<Self, Utf8Error> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text, max_lines))
    }

    /// Keep at most `max_lines` lines of `text`.
    ///
    /// Under the cap the text is borrowed as-is (trailing newline and `\r\n`
    /// endings included). Over the cap the first `max_lines` lines are
    /// joined with `\n` and the rest is dropped.
    pub fn new(text: &'a str, max_lines: usize) -> Self {
        let total_lines = text.lines().count();

        if total_lines <= max_lines {
            return Self {
                text: Cow::Borrowed(text),
                total_lines,
                kept_lines: total_lines,
            };
        }

        let kept = text.lines().take(max_lines).collect::<Vec<_>>().join("\n");
        Self {
            text: Cow::Owned(kept),
            total_lines,
            kept_lines: max_lines,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn kept_lines(&self) -> usize {
        self.kept_lines
    }

    pub fn is_truncated(&self) -> bool {
        self.kept_lines < self.total_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_short_text_untouched() {
        let text = "a\r\nb\n\nc\n";
        let excerpt = LogExcerpt::new(text, MAX_LINES);
        assert_eq!(excerpt.text(), text);
        assert!(!excerpt.is_truncated());
        assert!(matches!(excerpt.text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_exactly_at_cap_untouched() {
        let text = numbered(MAX_LINES) + "\n";
        let excerpt = LogExcerpt::new(&text, MAX_LINES);
        assert_eq!(excerpt.text(), text);
        assert_eq!(excerpt.total_lines(), MAX_LINES);
    }

    #[test]
    fn test_over_cap_keeps_first_lines() {
        let text = numbered(MAX_LINES + 20);
        let excerpt = LogExcerpt::new(&text, MAX_LINES);

        assert!(excerpt.is_truncated());
        assert_eq!(excerpt.total_lines(), 520);
        assert_eq!(excerpt.kept_lines(), 500);
        assert_eq!(excerpt.text(), numbered(MAX_LINES));
        assert!(!excerpt.text().contains("line 501"));
    }

    #[test]
    fn test_crlf_lines_rejoined_with_lf() {
        let excerpt = LogExcerpt::new("a\r\nb\r\nc\r\n", 2);
        assert_eq!(excerpt.text(), "a\nb");
    }

    #[test]
    fn test_empty_input() {
        let excerpt = LogExcerpt::new("", MAX_LINES);
        assert_eq!(excerpt.text(), "");
        assert_eq!(excerpt.total_lines(), 0);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(LogExcerpt::from_bytes(&[0x66, 0x6f, 0xff, 0xfe], MAX_LINES).is_err());
    }
}
