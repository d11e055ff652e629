//! Reading TeX hyphenation pattern files.
//!
//! Accepts both the classic `hyph-*.tex` layout and bare pattern lists:
//!
//! ```text
//! % comment
//! \patterns{
//! .ach4 .ad4der 2b1d
//! }
//! \hyphenation{
//! as-so-ciate ta-ble
//! }
//! ```
//!
//! Tokens outside any group are patterns. Groups other than `\patterns` and
//! `\hyphenation` (`\message{..}` and friends) are skipped, as is the rest of
//! a line after any other control word. `\endinput` stops reading.

use std::io::Read;

use rustc_hash::FxHashMap;

use crate::dict::{HyphenationDict, parse_exception};
use crate::error::{PatternError, Result};
use crate::pattern::{PatternTrie, compile_pattern, is_pattern_letter};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Control(&'a str),
    Open,
    Close,
    Word(&'a str),
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let line = line.split('%').next().unwrap_or_default();
    let mut tokens = Vec::new();
    let mut rest = line;
    while let Some(ch) = rest.chars().next() {
        if ch.is_whitespace() {
            rest = &rest[ch.len_utf8()..];
        } else if ch == '{' {
            tokens.push(Token::Open);
            rest = &rest[1..];
        } else if ch == '}' {
            tokens.push(Token::Close);
            rest = &rest[1..];
        } else if ch == '\\' {
            let name_len = rest[1..]
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len() - 1);
            tokens.push(Token::Control(&rest[1..=name_len]));
            rest = &rest[1 + name_len..];
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || matches!(c, '{' | '}' | '\\'))
                .unwrap_or(rest.len());
            tokens.push(Token::Word(&rest[..end]));
            rest = &rest[end..];
        }
    }
    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Patterns,
    Exceptions,
    Ignored,
}

#[derive(Debug)]
struct OpenGroup {
    kind: GroupKind,
    name: String,
    line: usize,
    depth: usize,
}

/// Builds a [`HyphenationDict`] from a pattern source.
#[derive(Debug, Clone)]
pub struct PatternLoader {
    language: String,
    margins: Option<(usize, usize)>,
}

impl Default for PatternLoader {
    fn default() -> Self {
        Self::new("und")
    }
}

impl PatternLoader {
    /// `language` is a BCP 47 tag recorded on the resulting dictionary.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            margins: None,
        }
    }

    /// Edge margins applied to the loaded dictionary.
    #[must_use]
    pub fn margins(mut self, left: usize, right: usize) -> Self {
        self.margins = Some((left, right));
        self
    }

    /// Read and compile a whole pattern source.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the source cannot be read, is not UTF-8,
    /// contains a malformed token or group, or defines nothing at all.
    pub fn load<R: Read>(&self, mut reader: R) -> Result<HyphenationDict> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let source = String::from_utf8(bytes)?;
        self.load_str(&source)
    }

    /// Compile patterns from an in-memory source.
    ///
    /// # Errors
    ///
    /// Same as [`PatternLoader::load`], minus I/O and encoding failures.
    pub fn load_str(&self, source: &str) -> Result<HyphenationDict> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut trie = PatternTrie::default();
        let mut exceptions: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut group: Option<OpenGroup> = None;
        // Control word awaiting its `{`, possibly on the next line.
        let mut pending: Option<&str> = None;

        'lines: for (index, line) in source.lines().enumerate() {
            let line_no = index + 1;
            let mut tokens = tokenize(line).into_iter().peekable();
            while let Some(token) = tokens.next() {
                if let Some(open) = group.as_mut() {
                    match token {
                        Token::Open => open.depth += 1,
                        Token::Close => {
                            open.depth -= 1;
                            if open.depth == 0 {
                                group = None;
                            }
                        }
                        Token::Word(word) => match open.kind {
                            GroupKind::Patterns => {
                                let pattern = compile_pattern(word).ok_or_else(|| {
                                    PatternError::InvalidPattern {
                                        token: word.to_string(),
                                        line: line_no,
                                    }
                                })?;
                                trie.insert(&pattern);
                            }
                            GroupKind::Exceptions => {
                                if !is_exception(word) {
                                    return Err(PatternError::InvalidException {
                                        token: word.to_string(),
                                        line: line_no,
                                    });
                                }
                                let (key, breaks) = parse_exception(word);
                                exceptions.insert(key, breaks);
                            }
                            GroupKind::Ignored => {}
                        },
                        Token::Control(_) => {}
                    }
                    continue;
                }

                if token != Token::Open {
                    pending = None;
                }
                match token {
                    Token::Open => {
                        let (name, kind) = match pending.take() {
                            Some("patterns") => ("patterns", GroupKind::Patterns),
                            Some("hyphenation") => ("hyphenation", GroupKind::Exceptions),
                            Some(name) => (name, GroupKind::Ignored),
                            None => ("", GroupKind::Ignored),
                        };
                        group = Some(OpenGroup {
                            kind,
                            name: name.to_string(),
                            line: line_no,
                            depth: 1,
                        });
                    }
                    Token::Control("endinput") => break 'lines,
                    Token::Control(name) => {
                        // Control word without a group: ignore its arguments.
                        if tokens.peek().is_some_and(|next| *next != Token::Open) {
                            break;
                        }
                        pending = Some(name);
                    }
                    Token::Close => {
                        return Err(PatternError::InvalidPattern {
                            token: "}".to_string(),
                            line: line_no,
                        });
                    }
                    Token::Word(word) => {
                        let pattern =
                            compile_pattern(word).ok_or_else(|| PatternError::InvalidPattern {
                                token: word.to_string(),
                                line: line_no,
                            })?;
                        trie.insert(&pattern);
                    }
                }
            }
        }

        if let Some(open) = group {
            return Err(PatternError::UnterminatedGroup {
                group: open.name,
                line: open.line,
            });
        }
        if trie.is_empty() && exceptions.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut dict = HyphenationDict::from_parts(&self.language, trie, exceptions);
        if let Some((left, right)) = self.margins {
            dict = dict.with_margins(left, right);
        }
        tracing::debug!(
            language = dict.language(),
            patterns = dict.pattern_count(),
            exceptions = dict.exception_count(),
            "hyphenation patterns loaded"
        );
        Ok(dict)
    }
}

fn is_exception(word: &str) -> bool {
    word.chars().any(is_pattern_letter) && word.chars().all(|c| c == '-' || is_pattern_letter(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn tokenize_splits_braces_and_controls() {
        assert_eq!(
            tokenize(r"\patterns{ .ab1c d2e} % trailing comment"),
            vec![
                Token::Control("patterns"),
                Token::Open,
                Token::Word(".ab1c"),
                Token::Word("d2e"),
                Token::Close,
            ]
        );
    }

    #[test]
    fn tokenize_multibyte_words() {
        assert_eq!(
            tokenize("ü1b  ä2\\x"),
            vec![Token::Word("ü1b"), Token::Word("ä2"), Token::Control("x")]
        );
    }

    #[test]
    fn loads_tex_layout() {
        let source = "% English sample\n\\patterns{\n1a1b1c1d1e1f\n}\n\\hyphenation{\nta-ble\n}\n";
        let dict = PatternLoader::new("en").load_str(source).unwrap();
        assert_eq!(dict.language(), "en");
        assert_eq!(dict.pattern_count(), 1);
        assert_eq!(dict.exception_count(), 1);
        assert_eq!(dict.hyphenate("table"), vec![2]);
        assert_eq!(dict.hyphenate("abcdef"), vec![2, 3]);
    }

    #[test]
    fn loads_bare_pattern_list() {
        let dict = PatternLoader::default()
            .margins(1, 1)
            .load_str("a1b\nc1d\n")
            .unwrap();
        assert_eq!(dict.pattern_count(), 2);
        assert_eq!(dict.hyphenate("abcd"), vec![1, 3]);
    }

    #[test]
    fn group_may_open_on_next_line() {
        let dict = PatternLoader::default().load_str("\\patterns\n{ a1b }").unwrap();
        assert_eq!(dict.pattern_count(), 1);
    }

    #[test]
    fn skips_foreign_groups_and_control_lines() {
        let source = "\\message{Loading {nested} patterns}\n\\lefthyphenmin=2 ignored\n\\patterns{a1b}\n";
        let dict = PatternLoader::default().load_str(source).unwrap();
        assert_eq!(dict.pattern_count(), 1);
    }

    #[test]
    fn endinput_stops_reading() {
        let dict = PatternLoader::default()
            .load_str("a1b\n\\endinput\n{{{ not read")
            .unwrap();
        assert_eq!(dict.pattern_count(), 1);
    }

    #[test]
    fn rejects_invalid_pattern_with_line() {
        let err = PatternLoader::default()
            .load_str("\\patterns{\na1b\nx-y\n}")
            .unwrap_err();
        assert!(matches!(
            err,
            PatternError::InvalidPattern { ref token, line: 3 } if token == "x-y"
        ));
    }

    #[test]
    fn rejects_invalid_exception() {
        let err = PatternLoader::default()
            .load_str("\\hyphenation{ ta-b1e }")
            .unwrap_err();
        assert!(matches!(err, PatternError::InvalidException { line: 1, .. }));
    }

    #[test]
    fn rejects_unterminated_group() {
        let err = PatternLoader::default()
            .load_str("a1b\n\\patterns{\nc1d\n")
            .unwrap_err();
        assert!(matches!(
            err,
            PatternError::UnterminatedGroup { ref group, line: 2 } if group == "patterns"
        ));
    }

    #[test]
    fn rejects_stray_close() {
        let err = PatternLoader::default().load_str("a1b }").unwrap_err();
        assert!(matches!(err, PatternError::InvalidPattern { line: 1, .. }));
    }

    #[test]
    fn rejects_empty_source() {
        let err = PatternLoader::default()
            .load_str("% nothing here\n\\patterns{ }\n")
            .unwrap_err();
        assert!(matches!(err, PatternError::Empty));
    }

    #[test]
    fn rejects_non_utf8() {
        let err = PatternLoader::default()
            .load(&[0x61, 0xff, 0x31][..])
            .unwrap_err();
        assert!(matches!(err, PatternError::Encoding(_)));
    }

    #[test]
    fn strips_byte_order_mark() {
        let dict = PatternLoader::default().load_str("\u{feff}a1b").unwrap();
        assert_eq!(dict.pattern_count(), 1);
    }

    #[traced_test]
    #[test]
    fn load_logs_counts() {
        PatternLoader::new("de")
            .load_str("a1b\n\\hyphenation{ tü-ren }")
            .unwrap();
        assert!(logs_contain("hyphenation patterns loaded"));
        assert!(logs_contain("exceptions=1"));
    }
}
