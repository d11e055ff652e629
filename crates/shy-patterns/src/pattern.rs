//! Pattern compilation and trie lookup.

use rustc_hash::FxHashMap;

/// A compiled hyphenation pattern.
///
/// TeX patterns interleave inter-letter levels with letters: `"hy3p"` puts
/// level 3 between `y` and `p`. Odd levels allow a break, even levels forbid
/// one, and the highest level seen at a position wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyphenationPattern {
    /// Letters of the pattern, lowercased. `.` marks a word edge.
    pub chars: Vec<char>,
    /// One level per gap, so `levels.len() == chars.len() + 1`.
    pub levels: Vec<u8>,
}

/// Whether `ch` may appear as a letter inside a pattern or exception.
pub(crate) fn is_pattern_letter(ch: char) -> bool {
    ch.is_alphabetic() || ch == '\'' || ch == '\u{2019}'
}

pub(crate) fn fold_case(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

/// Compile a TeX pattern such as `".ex5am"` or `"2ph"`.
///
/// Returns `None` when the token has no letters, contains a character that is
/// neither a letter, a digit nor `.`, or stacks two digits in one gap.
#[must_use]
pub fn compile_pattern(pattern: &str) -> Option<HyphenationPattern> {
    let mut chars = Vec::new();
    let mut levels = Vec::new();
    let mut gap: Option<u8> = None;

    for ch in pattern.chars() {
        if let Some(digit) = ch.to_digit(10) {
            if gap.is_some() {
                return None;
            }
            gap = Some(digit as u8);
        } else if ch == '.' || is_pattern_letter(ch) {
            levels.push(gap.take().unwrap_or(0));
            chars.push(fold_case(ch));
        } else {
            return None;
        }
    }
    levels.push(gap.unwrap_or(0));

    if chars.iter().all(|&c| c == '.') {
        return None;
    }
    Some(HyphenationPattern { chars, levels })
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: FxHashMap<char, u32>,
    levels: Option<Box<[u8]>>,
}

/// Prefix trie over compiled patterns.
///
/// Lookup is order independent: matches are merged by element-wise maximum.
#[derive(Debug, Clone)]
pub struct PatternTrie {
    nodes: Vec<TrieNode>,
    len: usize,
}

impl Default for PatternTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            len: 0,
        }
    }
}

impl PatternTrie {
    /// Build a trie holding `patterns`.
    #[must_use]
    pub fn new(patterns: &[HyphenationPattern]) -> Self {
        let mut trie = Self::default();
        for pattern in patterns {
            trie.insert(pattern);
        }
        trie
    }

    /// Number of distinct patterns stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a pattern. Re-inserting the same letters replaces the levels.
    pub fn insert(&mut self, pattern: &HyphenationPattern) {
        let mut at = 0usize;
        for &ch in &pattern.chars {
            at = match self.nodes[at].children.get(&ch) {
                Some(&next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[at].children.insert(ch, next as u32);
                    next
                }
            };
        }
        if self.nodes[at].levels.is_none() {
            self.len += 1;
        }
        self.nodes[at].levels = Some(pattern.levels.clone().into_boxed_slice());
    }

    /// Raise `levels` with every pattern that matches `word[start..]` as a prefix.
    pub(crate) fn apply_at(&self, word: &[char], start: usize, levels: &mut [u8]) {
        let mut at = 0usize;
        for &ch in &word[start..] {
            let Some(&next) = self.nodes[at].children.get(&ch) else {
                return;
            };
            at = next as usize;
            if let Some(found) = &self.nodes[at].levels {
                for (slot, &level) in levels[start..].iter_mut().zip(found.iter()) {
                    *slot = (*slot).max(level);
                }
            }
        }
    }

    /// Level of every gap in `word` (including both edges), all patterns applied.
    #[must_use]
    pub fn levels(&self, word: &[char]) -> Vec<u8> {
        let mut levels = vec![0u8; word.len() + 1];
        for start in 0..word.len() {
            self.apply_at(word, start, &mut levels);
        }
        levels
    }
}
