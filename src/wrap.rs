use unicode_width::UnicodeWidthStr;

pub const MAX_TEST_WIDTH: usize = 60;
pub const MIN_TEST_WIDTH: usize = 10;

/// Width of the test text for a terminal `width` columns wide
pub fn test_width(width: usize) -> usize {
    width.clamp(MIN_TEST_WIDTH, MAX_TEST_WIDTH)
}

/// Greedy word wrap of space separated `raw` text.
///
/// Lines never exceed `width` columns unless a single word is wider, in
/// which case that word gets a line of its own.
pub fn raw_lines(raw: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = vec![];
    let mut line_width = 0;

    for word in raw.split(' ') {
        let word_width = word.width();
        match lines.last_mut() {
            Some(line) if line_width + 1 + word_width <= width => {
                line.push(' ');
                line.push_str(word);
                line_width += 1 + word_width;
            }
            _ => {
                lines.push(word.to_string());
                line_width = word_width;
            }
        }
    }

    lines
}

/// Re-flows `decorated` words onto the lines that wrapping `raw` produces.
///
/// Only the raw text is measured, so styling never changes where lines
/// break. `decorated` holds one entry per space separated word of `raw`;
/// surplus entries land on the last line.
pub fn wrap<T>(raw: &str, decorated: impl IntoIterator<Item = T>, width: usize) -> Vec<Vec<T>> {
    let mut decorated = decorated.into_iter();

    let mut lines: Vec<Vec<T>> = raw_lines(raw, width)
        .iter()
        .map(|line| decorated.by_ref().take(line.split(' ').count()).collect())
        .collect();

    let rest: Vec<T> = decorated.collect();
    if !rest.is_empty() {
        log::warn!("decorated text has {} more words than raw text", rest.len());
        match lines.last_mut() {
            Some(last) => last.extend(rest),
            None => lines.push(rest),
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(raw_lines("abc def ghi", 7), vec!["abc def", "ghi"]);
    }

    #[test]
    fn decorated_words_follow_raw_lines() {
        let decorated = vec!["[abc]", "[def]", "[ghi]"];
        let lines = wrap("abc def ghi", decorated, 7);
        assert_eq!(lines, vec![vec!["[abc]", "[def]"], vec!["[ghi]"]]);
    }

    #[test]
    fn decoration_length_is_ignored() {
        // decorated words are far wider than the raw ones
        let decorated = vec!["\x1b[31mab\x1b[0m"; 4];
        let lines = wrap("ab ab ab ab", decorated, 5);
        assert_eq!(lines.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2]);
    }

    #[test]
    fn long_word_gets_its_own_line() {
        assert_eq!(
            raw_lines("a abcdefghijkl b", 5),
            vec!["a", "abcdefghijkl", "b"]
        );
        assert_eq!(raw_lines("abcdefghijkl", 3), vec!["abcdefghijkl"]);
    }

    #[test]
    fn exact_fit_and_zero_width() {
        assert_eq!(raw_lines("ab cd", 5), vec!["ab cd"]);
        assert_eq!(raw_lines("ab cd", 0), vec!["ab", "cd"]);
    }

    #[test]
    fn wide_chars_measured_by_display_width() {
        // each CJK char is two columns wide
        assert_eq!(raw_lines("日本 語", 5), vec!["日本", "語"]);
    }

    #[test]
    fn clamps_test_width() {
        assert_eq!(test_width(3), MIN_TEST_WIDTH);
        assert_eq!(test_width(40), 40);
        assert_eq!(test_width(200), MAX_TEST_WIDTH);
    }
}
