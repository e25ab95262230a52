//! Text normalization and query tokenization.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize text for comparison.
///
/// Decomposes to NFKD, drops combining marks, lowercases and trims, so
/// `"  Pèrno "`, `"PERNO"` and `"perno"` all become `"perno"`.
/// Trimming happens last: compatibility decomposition can turn a spacing
/// accent into a plain space, which must not survive at the edges.
pub fn normalize(raw: &str) -> String {
    let folded: String = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    let trimmed = folded.trim();
    if trimmed.len() == folded.len() {
        folded
    } else {
        trimmed.to_string()
    }
}

/// Normalize a possibly absent value; absent becomes the empty string.
pub fn normalize_optional(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Split a query into normalized, non-empty word tokens, left to right.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Character-level fold used for allocation-free comparisons.
pub(crate) fn fold_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_case_and_accents() {
        assert_eq!(normalize("Perno"), "perno");
        assert_eq!(normalize("PERNO"), "perno");
        assert_eq!(normalize("pèrno"), "perno");
        assert_eq!(normalize("Perno"), normalize("pèrno"));
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize("  Guarnizione \t"), "guarnizione");
    }

    #[test]
    fn test_normalize_decomposed_input() {
        // e + combining acute
        assert_eq!(normalize("cafe\u{0301}"), "cafe");
        assert_eq!(normalize("CAFÉ"), "cafe");
    }

    #[test]
    fn test_normalize_spacing_accent_at_edge() {
        assert_eq!(normalize("a\u{00A8}"), "a");
    }

    #[test]
    fn test_normalize_optional_absent() {
        assert_eq!(normalize_optional(None), "");
        assert_eq!(normalize_optional(Some(" Ò ")), "o");
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  Sfera   608 "), vec!["sfera", "608"]);
        assert_eq!(tokenize("Cuscinétto"), vec!["cuscinetto"]);
    }

    #[test]
    fn test_tokenize_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }

    #[test]
    fn test_fold_chars_matches_normalize() {
        let folded: String = fold_chars(" Àncora ").collect();
        assert_eq!(folded, normalize(" Àncora "));
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in "[ \ta-zA-Z0-9àèéìòùÀÈÉÌÒÙçÇñÑäöüÄÖÜß¨'./-]{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_tokens_are_non_empty(s in "[ a-zA-Zàè]{0,40}") {
            for token in tokenize(&s) {
                prop_assert!(!token.is_empty());
                prop_assert!(!token.contains(' '));
            }
        }
    }
}
