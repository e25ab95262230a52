//! Marking query words inside display text.
//!
//! Matching is case-insensitive against the original text, without accent
//! folding, because the spans must point into the text as displayed.
//! Overlapping words resolve leftmost-longest: scanning left to right, the
//! longest query word starting at the earliest position wins and matching
//! resumes after it, so marks never nest or overlap.

use std::ops::Range;

use regex::RegexBuilder;

/// Default opening marker.
pub const MARK_OPEN: &str = "<mark>";
/// Default closing marker.
pub const MARK_CLOSE: &str = "</mark>";

/// Byte ranges of `text` matched by any whitespace-separated word of `query`.
pub fn highlight_spans(text: &str, query: &str) -> Vec<Range<usize>> {
    let mut words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() || text.is_empty() {
        return Vec::new();
    }

    // Longest first so alternation prefers the longest word at a position.
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    words.dedup();

    let pattern = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.find_iter(text).map(|m| m.range()).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Highlight pattern rejected, text left unmarked");
            Vec::new()
        }
    }
}

/// Wrap every query word occurrence in `<mark>`/`</mark>`.
pub fn highlight(text: &str, query: &str) -> String {
    highlight_with(text, query, MARK_OPEN, MARK_CLOSE)
}

/// Wrap every query word occurrence in custom markers.
pub fn highlight_with(text: &str, query: &str, open: &str, close: &str) -> String {
    let spans = highlight_spans(text, query);
    if spans.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + spans.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for span in spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str(open);
        out.push_str(&text[span.clone()]);
        out.push_str(close);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word() {
        assert_eq!(
            highlight("Cuscinetto a sfera", "sfera"),
            "Cuscinetto a <mark>sfera</mark>"
        );
    }

    #[test]
    fn test_empty_query_unchanged() {
        assert_eq!(highlight("text", ""), "text");
        assert_eq!(highlight("text", "   "), "text");
    }

    #[test]
    fn test_case_insensitive_keeps_original_case() {
        assert_eq!(
            highlight("Cuscinetto a SFERA", "sfera"),
            "Cuscinetto a <mark>SFERA</mark>"
        );
    }

    #[test]
    fn test_every_occurrence() {
        assert_eq!(
            highlight("vite e vite", "vite"),
            "<mark>vite</mark> e <mark>vite</mark>"
        );
    }

    #[test]
    fn test_multiple_words() {
        assert_eq!(
            highlight("Cuscinetto a sfera", "a sfera"),
            "Cuscinetto <mark>a</mark> <mark>sfera</mark>"
        );
    }

    #[test]
    fn test_overlap_prefers_longest() {
        assert_eq!(highlight("sfera", "sfer sfera"), "<mark>sfera</mark>");
        assert_eq!(highlight("sfera", "sfera sfer"), "<mark>sfera</mark>");
    }

    #[test]
    fn test_overlap_never_nests() {
        // "era" starts inside "sfera" and is not marked separately
        assert_eq!(highlight("sfera", "sfe era"), "<mark>sfe</mark>ra");
    }

    #[test]
    fn test_metacharacters_literal() {
        assert_eq!(highlight("M8 (zincato)", "(zincato)"), "M8 <mark>(zincato)</mark>");
    }

    #[test]
    fn test_accents_not_folded() {
        assert_eq!(highlight("pèrno", "perno"), "pèrno");
    }

    #[test]
    fn test_custom_markers() {
        assert_eq!(highlight_with("filtro olio", "olio", "[", "]"), "filtro [olio]");
    }

    #[test]
    fn test_spans() {
        assert_eq!(highlight_spans("ab ab", "ab"), vec![0..2, 3..5]);
    }
}
