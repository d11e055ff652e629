#![forbid(unsafe_code)]

//! Hyphenation pattern dictionaries.
//!
//! Compiles TeX-style hyphenation patterns (Liang's algorithm) into a trie,
//! loads them from pattern files, and answers "where may this text break?"
//! through the [`Hyphenator`] trait.
//!
//! # Architecture
//!
//! ```text
//! pattern file → PatternLoader → HyphenationDict (trie + exceptions)
//! text run → word segments → hyphenate(word) → run-relative char offsets
//! ```

pub mod dict;
pub mod error;
pub mod loader;
pub mod pattern;

pub use dict::{HyphenationDict, LEFT_HYPHEN_MIN, RIGHT_HYPHEN_MIN};
pub use error::PatternError;
pub use loader::PatternLoader;
pub use pattern::{HyphenationPattern, PatternTrie, compile_pattern};

/// Source of break positions for a text run.
///
/// Implementations must be read-only once constructed: a single instance is
/// shared across render passes (and threads) without locking.
pub trait Hyphenator: Send + Sync {
    /// Character offsets at which `text` may break, strictly increasing.
    ///
    /// Each offset `n` means "a break is allowed immediately before the
    /// `n`-th character". Offsets lie in `0..=text.chars().count()`.
    fn break_positions(&self, text: &str) -> Vec<usize>;
}

impl<H: Hyphenator + ?Sized> Hyphenator for std::sync::Arc<H> {
    fn break_positions(&self, text: &str) -> Vec<usize> {
        (**self).break_positions(text)
    }
}
