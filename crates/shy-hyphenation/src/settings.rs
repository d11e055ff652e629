//! Hyphenation settings read from JSON.
//!
//! ```json
//! { "patterns": "hyph-en-us.tex", "language": "en-us", "left_min": 2, "right_min": 3 }
//! ```
//!
//! Only `patterns` is required. A relative `patterns` path read through
//! [`HyphenationSettings::from_json_file`] is resolved against the directory
//! of the settings file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shy_patterns::{HyphenationDict, LEFT_HYPHEN_MIN, PatternLoader, RIGHT_HYPHEN_MIN};

use crate::error::{ConfigError, Result};
use crate::hyphenation::{HyphenationOption, with_hyphenator};

/// Where to find the pattern file and how to apply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HyphenationSettings {
    /// TeX pattern file.
    pub patterns: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_min: Option<usize>,
}

impl HyphenationSettings {
    /// Settings for `patterns` with the default language and margins.
    #[must_use]
    pub fn new(patterns: impl Into<PathBuf>) -> Self {
        Self {
            patterns: patterns.into(),
            language: None,
            left_min: None,
            right_min: None,
        }
    }

    /// # Errors
    ///
    /// [`ConfigError::Settings`] for malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// [`ConfigError::Open`] when the file cannot be read, otherwise as
    /// [`HyphenationSettings::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| ConfigError::open(path, err))?;
        let mut settings = Self::from_json_str(&json)?;
        if settings.patterns.is_relative()
            && let Some(dir) = path.parent()
        {
            settings.patterns = dir.join(&settings.patterns);
        }
        Ok(settings)
    }

    /// Effective `(left, right)` margins.
    #[must_use]
    pub fn margins(&self) -> (usize, usize) {
        (
            self.left_min.unwrap_or(LEFT_HYPHEN_MIN),
            self.right_min.unwrap_or(RIGHT_HYPHEN_MIN),
        )
    }

    /// Open and compile the pattern file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Open`] or [`ConfigError::PatternLoad`].
    pub fn load(&self) -> Result<HyphenationDict> {
        let (left, right) = self.margins();
        let loader = PatternLoader::new(self.language.as_deref().unwrap_or("und")).margins(left, right);
        let file = File::open(&self.patterns).map_err(|err| ConfigError::open(&self.patterns, err))?;
        Ok(loader.load(file)?)
    }

    /// Load the dictionary and wrap it as an option for
    /// [`crate::Hyphenation::new`].
    ///
    /// # Errors
    ///
    /// See [`HyphenationSettings::load`].
    pub fn into_option(self) -> Result<HyphenationOption> {
        Ok(with_hyphenator(Arc::new(self.load()?)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use shy_patterns::Hyphenator;

    use super::*;

    const PATTERNS: &str = "\\patterns{ 1na }\n\\hyphenation{ hy-phen-ation }\n";

    fn pattern_file(dir: &Path) -> PathBuf {
        let path = dir.join("hyph.tex");
        let mut file = File::create(&path).unwrap();
        file.write_all(PATTERNS.as_bytes()).unwrap();
        path
    }

    #[test]
    fn minimal_json() {
        let settings = HyphenationSettings::from_json_str(r#"{"patterns": "hyph.tex"}"#).unwrap();
        assert_eq!(settings, HyphenationSettings::new("hyph.tex"));
        assert_eq!(settings.margins(), (LEFT_HYPHEN_MIN, RIGHT_HYPHEN_MIN));
    }

    #[test]
    fn full_json() {
        let settings = HyphenationSettings::from_json_str(
            r#"{"patterns": "p.tex", "language": "de", "left_min": 1, "right_min": 4}"#,
        )
        .unwrap();
        assert_eq!(settings.language.as_deref(), Some("de"));
        assert_eq!(settings.margins(), (1, 4));
    }

    #[test]
    fn unknown_fields_rejected() {
        let err = HyphenationSettings::from_json_str(r#"{"patterns": "p.tex", "marker": "-"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn patterns_required() {
        assert!(matches!(
            HyphenationSettings::from_json_str("{}"),
            Err(ConfigError::Settings(_))
        ));
    }

    #[test]
    fn serializes_only_set_fields() {
        let json = serde_json::to_string(&HyphenationSettings::new("p.tex")).unwrap();
        assert_eq!(json, r#"{"patterns":"p.tex"}"#);
    }

    #[test]
    fn relative_patterns_resolved_against_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("hyphenation.json");
        fs::write(&settings_path, r#"{"patterns": "hyph.tex"}"#).unwrap();

        let settings = HyphenationSettings::from_json_file(&settings_path).unwrap();
        assert_eq!(settings.patterns, dir.path().join("hyph.tex"));
    }

    #[test]
    fn missing_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        match HyphenationSettings::from_json_file(&missing) {
            Err(ConfigError::Open { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[test]
    fn load_applies_language_and_margins() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = HyphenationSettings::new(pattern_file(dir.path()));
        settings.language = Some("en".into());
        settings.right_min = Some(6);

        let dict = settings.load().unwrap();
        assert_eq!(dict.language(), "en");
        assert_eq!(dict.margins(), (2, 6));
        assert_eq!(dict.hyphenate("hyphenation"), vec![2]);
    }

    #[test]
    fn load_missing_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let settings = HyphenationSettings::new(dir.path().join("absent.tex"));
        assert!(matches!(settings.load(), Err(ConfigError::Open { .. })));
        assert!(matches!(settings.into_option(), Err(ConfigError::Open { .. })));
    }

    #[test]
    fn into_option_carries_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let option = HyphenationSettings::new(pattern_file(dir.path()))
            .into_option()
            .unwrap();
        let hyphenation = crate::Hyphenation::new([option]).unwrap();
        let hyphenator = hyphenation.hyphenator().unwrap();
        assert_eq!(hyphenator.break_positions("hyphenation"), vec![2, 6]);
    }
}
