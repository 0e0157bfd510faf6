/// Line ceiling applied when none is configured.
pub const DEFAULT_LINE_LIMIT: usize = 10_000;

/// Counts `'\n'`-separated segments. An empty text is one line, and a
/// trailing newline opens a final empty segment.
pub fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}

/// Counts maximal runs of non-whitespace characters. Whitespace is the
/// Unicode `White_Space` set, so U+0085 separates words and U+FEFF does not.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn exceeds_line_limit(text: &str, limit: usize) -> bool {
    count_lines(text) > limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines_follows_split_semantics() {
        assert_eq!(count_lines(""), 1);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("one\n"), 2);
        assert_eq!(count_lines("foo\nbar\nbaz"), 3);
        assert_eq!(count_lines("\n\n"), 3);
    }

    #[test]
    fn test_count_lines_does_not_split_on_carriage_return() {
        assert_eq!(count_lines("a\r\nb"), 2);
        assert_eq!(count_lines("a\rb"), 1);
    }

    #[test]
    fn test_count_words_ignores_whitespace_runs() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("  leading and trailing  "), 3);
        assert_eq!(count_words("tabs\tand\n\nnewlines\r\nmixed"), 4);
    }

    #[test]
    fn test_count_words_uses_unicode_white_space() {
        assert_eq!(count_words("a\u{85}b"), 2);
        assert_eq!(count_words("a\u{a0}b\u{3000}c"), 3);
        assert_eq!(count_words("\u{feff}a b"), 2);
        assert_eq!(count_words("a\u{feff}b"), 1);
    }

    #[test]
    fn test_exceeds_line_limit_is_strict() {
        let six_lines = "1\n2\n3\n4\n5\n6";
        assert!(exceeds_line_limit(six_lines, 5));
        assert!(!exceeds_line_limit(six_lines, 6));
        assert!(exceeds_line_limit("", 0));
        assert!(!exceeds_line_limit("", DEFAULT_LINE_LIMIT));
    }
}
