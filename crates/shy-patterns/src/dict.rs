//! Language dictionaries: patterns plus exception words.

use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::Hyphenator;
use crate::pattern::{HyphenationPattern, PatternTrie, compile_pattern, fold_case, is_pattern_letter};

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// Minimum characters kept before the first break.
pub const LEFT_HYPHEN_MIN: usize = 2;
/// Minimum characters kept after the last break.
pub const RIGHT_HYPHEN_MIN: usize = 3;

/// Hyphenation rules for one language.
#[derive(Debug, Clone)]
pub struct HyphenationDict {
    language: String,
    trie: PatternTrie,
    /// Case-folded word → break offsets.
    exceptions: FxHashMap<String, Vec<usize>>,
    left_min: usize,
    right_min: usize,
}

impl HyphenationDict {
    /// Build a dictionary from TeX pattern strings and hyphen-marked exceptions
    /// (`"as-so-ciate"`).
    ///
    /// Pattern strings that do not compile are skipped. Use
    /// [`crate::PatternLoader`] for strict, line-aware validation.
    #[must_use]
    pub fn new(language: &str, patterns: &[&str], exceptions: &[&str]) -> Self {
        let compiled: Vec<HyphenationPattern> =
            patterns.iter().filter_map(|p| compile_pattern(p)).collect();
        let exceptions = exceptions.iter().map(|e| parse_exception(e)).collect();
        Self::from_parts(language, PatternTrie::new(&compiled), exceptions)
    }

    pub(crate) fn from_parts(
        language: &str,
        trie: PatternTrie,
        exceptions: FxHashMap<String, Vec<usize>>,
    ) -> Self {
        Self {
            language: language.to_string(),
            trie,
            exceptions,
            left_min: LEFT_HYPHEN_MIN,
            right_min: RIGHT_HYPHEN_MIN,
        }
    }

    /// Override the edge margins. Both are clamped to at least 1 so a word is
    /// never broken at its own edges.
    #[must_use]
    pub fn with_margins(mut self, left: usize, right: usize) -> Self {
        self.left_min = left.max(1);
        self.right_min = right.max(1);
        self
    }

    /// BCP 47 tag the dictionary was loaded for.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// `(left, right)` edge margins in characters.
    #[must_use]
    pub fn margins(&self) -> (usize, usize) {
        (self.left_min, self.right_min)
    }

    /// Number of distinct patterns in the trie.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.trie.len()
    }

    /// Number of exception words.
    #[must_use]
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Character offsets at which a single word may break, ascending. A break
    /// falls before the character at its offset.
    ///
    /// Exceptions take precedence over patterns. Matching is case-insensitive.
    #[must_use]
    pub fn hyphenate(&self, word: &str) -> Vec<usize> {
        let folded: Vec<char> = word.chars().map(fold_case).collect();
        let n = folded.len();
        if n < self.left_min + self.right_min {
            return Vec::new();
        }
        let last = n - self.right_min;

        let key: String = folded.iter().collect();
        if let Some(offsets) = self.exceptions.get(&key) {
            return offsets
                .iter()
                .copied()
                .filter(|&offset| offset >= self.left_min && offset <= last)
                .collect();
        }

        let mut delimited = Vec::with_capacity(n + 2);
        delimited.push('.');
        delimited.extend_from_slice(&folded);
        delimited.push('.');
        let levels = self.trie.levels(&delimited);

        // Gap before folded[j] is gap j + 1 of the delimited word.
        (self.left_min..=last)
            .filter(|&j| levels[j + 1] % 2 == 1)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Run-level breaks
// ---------------------------------------------------------------------------

impl Hyphenator for HyphenationDict {
    /// Hyphenates every word of `text`; punctuation, digits and whitespace
    /// never receive breaks.
    fn break_positions(&self, text: &str) -> Vec<usize> {
        let mut positions = Vec::new();
        let mut chars_before = 0usize;
        for segment in text.split_word_bounds() {
            if segment.chars().all(is_pattern_letter) {
                positions.extend(
                    self.hyphenate(segment)
                        .into_iter()
                        .map(|offset| chars_before + offset),
                );
            }
            chars_before += segment.chars().count();
        }
        positions
    }
}

// ---------------------------------------------------------------------------
// Exceptions
// ---------------------------------------------------------------------------

/// Split `"hy-phen-ation"` into `("hyphenation", [2, 6])`.
pub(crate) fn parse_exception(exception: &str) -> (String, Vec<usize>) {
    let mut word = String::with_capacity(exception.len());
    let mut breaks = Vec::new();
    let mut count = 0usize;
    for ch in exception.chars() {
        if ch == '-' {
            if breaks.last() != Some(&count) {
                breaks.push(count);
            }
        } else {
            word.push(fold_case(ch));
            count += 1;
        }
    }
    (word, breaks)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exception_marks_offsets() {
        assert_eq!(
            parse_exception("hy-phen-ation"),
            ("hyphenation".to_string(), vec![2, 6])
        );
        assert_eq!(parse_exception("present"), ("present".to_string(), vec![]));
        assert_eq!(parse_exception("Ta--ble"), ("table".to_string(), vec![2]));
    }

    #[test]
    fn exception_overrides_patterns() {
        let dict = HyphenationDict::new("en", &["1a1b1c1d1e1f"], &["abc-def"]);
        assert_eq!(dict.hyphenate("abcdef"), vec![3]);
    }

    #[test]
    fn exception_respects_margins() {
        let dict = HyphenationDict::new("en", &[], &["a-b-c-d-e-f"]);
        assert_eq!(dict.hyphenate("abcdef"), vec![2, 3]);
    }

    #[test]
    fn short_words_never_break() {
        let dict = HyphenationDict::new("en", &["1a1b1c1d"], &[]);
        assert!(dict.hyphenate("abcd").is_empty());
        assert!(dict.hyphenate("").is_empty());
    }

    #[test]
    fn only_odd_levels_break() {
        let dict = HyphenationDict::new("test", &["a1b2c3d"], &[]).with_margins(1, 1);
        assert_eq!(dict.hyphenate("abcd"), vec![1, 3]);
    }

    #[test]
    fn even_level_suppresses_odd() {
        let dict = HyphenationDict::new("test", &["a1b", "a2b"], &[]).with_margins(1, 1);
        assert!(!dict.hyphenate("abab").contains(&1));
    }

    #[test]
    fn margins_bound_breaks() {
        let dict = HyphenationDict::new("en", &["1a1b1c1d1e1f1g1h"], &[]).with_margins(3, 4);
        assert_eq!(dict.hyphenate("abcdefgh"), vec![3, 4]);
    }

    #[test]
    fn margins_clamp_to_one() {
        let dict = HyphenationDict::new("en", &["1a1b1c"], &[]).with_margins(0, 0);
        assert_eq!(dict.margins(), (1, 1));
        assert_eq!(dict.hyphenate("abc"), vec![1, 2]);
    }

    #[test]
    fn word_edge_patterns() {
        let dict = HyphenationDict::new("en", &[".ex1", "1ing."], &[]);
        assert_eq!(dict.hyphenate("exacting"), vec![2, 5]);
    }

    #[test]
    fn matching_ignores_case() {
        let dict = HyphenationDict::new("en", &["hy3p"], &["ta-ble"]);
        assert_eq!(dict.hyphenate("hyper"), dict.hyphenate("HYPER"));
        assert_eq!(dict.hyphenate("TABLE"), vec![2]);
    }

    #[test]
    fn break_positions_are_run_relative() {
        let dict = HyphenationDict::new("en", &[], &["ta-ble", "hy-phen-ation"]);
        // "a " = 2 chars, "table" starts at 2; " " then "hyphenation" at 8.
        assert_eq!(dict.break_positions("a table hyphenation!"), vec![4, 10, 14]);
    }

    #[test]
    fn break_positions_skip_non_words() {
        let dict = HyphenationDict::new("en", &["1a1b1c1d1e1f"], &[]).with_margins(1, 1);
        assert!(dict.break_positions("123456 ... ab1cde").is_empty());
    }

    #[test]
    fn break_positions_count_chars_not_bytes() {
        let dict = HyphenationDict::new("de", &[], &["tü-ren"]);
        assert_eq!(dict.break_positions("größere türen"), vec![10]);
    }

    #[test]
    fn deterministic_output() {
        let dict = HyphenationDict::new("en", &["1na", "1tio", "n2at", "hy3ph"], &[]);
        assert_eq!(
            dict.break_positions("hyphenation nation"),
            dict.break_positions("hyphenation nation")
        );
    }

    #[test]
    fn counts() {
        let dict = HyphenationDict::new("en", &["a1b", "bad-", "c1d"], &["ta-ble"]);
        assert_eq!(dict.language(), "en");
        assert_eq!(dict.pattern_count(), 2);
        assert_eq!(dict.exception_count(), 1);
    }
}
