//! Lexical similarity ratio
//!
//! A normalized [0,1] score over the characters of two strings, 1.0 for
//! identical sequences, computed from matching blocks (difflib-style:
//! `2 * matches / (len_a + len_b)`).

use similar::TextDiff;

pub fn similarity_ratio(left: &str, right: &str) -> f64 {
    TextDiff::from_chars(left, right).ratio() as f64
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity_ratio("Main.java", "Main.java"), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn near_identical_paths_score_high() {
        // 9 matched chars out of 9 + 10
        let ratio = similarity_ratio("Util.java", "Utils.java");
        assert!(ratio > 0.8, "ratio was {ratio}");
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = similarity_ratio("report-final.docx", "report-v1.docx");
        let b = similarity_ratio("report-v1.docx", "report-final.docx");
        assert!((a - b).abs() < 1e-9);
    }
}
