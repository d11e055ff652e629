#![forbid(unsafe_code)]

//! Soft-hyphen insertion for markdown rendered to HTML.
//!
//! [`Hyphenation`] is an [`Extender`](shy_markdown::Extender): it replaces the
//! default handler for text nodes with [`HyphenationHtmlRenderer`], which asks
//! a [`Hyphenator`](shy_patterns::Hyphenator) where each text run may break
//! and writes the run with [`SOFT_HYPHEN`] spliced in at every position.
//!
//! ```no_run
//! use shy_hyphenation::{Hyphenation, with_pattern_file};
//! use shy_markdown::Markdown;
//!
//! let hyphenation = Hyphenation::new([with_pattern_file("hyph-en-us.tex")])?;
//! let markdown = Markdown::builder().extension(&hyphenation).build();
//! let html = markdown.to_html("Extraordinary hyphenation")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod hyphenation;
pub mod settings;
pub mod splice;

pub use error::ConfigError;
pub use hyphenation::{
    HYPHENATION_PRIORITY, Hyphenation, HyphenationHtmlRenderer, HyphenationOption,
    with_hyphenator, with_pattern_file, with_pattern_source,
};
pub use settings::HyphenationSettings;
pub use splice::{SOFT_HYPHEN, Segment, SpliceError, splice, splice_segments};
