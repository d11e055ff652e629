//! The hyphenation extension and its text renderer.

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use shy_markdown::html::write_escaped;
use shy_markdown::{Extender, MarkdownBuilder, Node, NodeKind, NodeRenderer, RenderError, WalkStatus};
use shy_patterns::{Hyphenator, PatternLoader};

use crate::error::{ConfigError, Result};
use crate::splice::{SOFT_HYPHEN, Segment, SpliceError, splice_segments};

/// Registration priority of [`HyphenationHtmlRenderer`], ahead of the
/// built-in text handler at [`shy_markdown::html::DEFAULT_HTML_PRIORITY`].
pub const HYPHENATION_PRIORITY: i32 = 500;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

enum Source {
    Reader(Box<dyn Read>),
    Path(PathBuf),
    Hyphenator(Arc<dyn Hyphenator>),
}

/// A configuration step for [`Hyphenation::new`].
pub struct HyphenationOption(Source);

impl std::fmt::Debug for HyphenationOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Source::Reader(_) => f.write_str("HyphenationOption::PatternSource"),
            Source::Path(path) => write!(f, "HyphenationOption::PatternFile({})", path.display()),
            Source::Hyphenator(_) => f.write_str("HyphenationOption::Hyphenator"),
        }
    }
}

/// Load patterns from a byte source (TeX pattern file syntax).
#[must_use]
pub fn with_pattern_source(reader: impl Read + 'static) -> HyphenationOption {
    HyphenationOption(Source::Reader(Box::new(reader)))
}

/// Load patterns from a file.
#[must_use]
pub fn with_pattern_file(path: impl Into<PathBuf>) -> HyphenationOption {
    HyphenationOption(Source::Path(path.into()))
}

/// Use an already loaded dictionary.
#[must_use]
pub fn with_hyphenator(hyphenator: Arc<dyn Hyphenator>) -> HyphenationOption {
    HyphenationOption(Source::Hyphenator(hyphenator))
}

impl HyphenationOption {
    fn apply(self, target: &mut Hyphenation) -> Result<()> {
        let hyphenator: Arc<dyn Hyphenator> = match self.0 {
            Source::Reader(reader) => Arc::new(PatternLoader::default().load(reader)?),
            Source::Path(path) => {
                tracing::debug!(path = %path.display(), "loading hyphenation patterns");
                let file = File::open(&path).map_err(|err| ConfigError::open(&path, err))?;
                Arc::new(PatternLoader::default().load(file)?)
            }
            Source::Hyphenator(hyphenator) => hyphenator,
        };
        if target.hyphenator.is_some() {
            tracing::debug!("replacing previously configured hyphenation dictionary");
        }
        target.hyphenator = Some(hyphenator);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Extension
// ---------------------------------------------------------------------------

/// Hyphenation configuration: the shared dictionary, fixed at construction.
#[derive(Clone, Default)]
pub struct Hyphenation {
    hyphenator: Option<Arc<dyn Hyphenator>>,
}

impl std::fmt::Debug for Hyphenation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hyphenation")
            .field("has_hyphenator", &self.hyphenator.is_some())
            .finish()
    }
}

impl Hyphenation {
    /// Apply `options` in order. A later dictionary replaces an earlier one;
    /// with no options the dictionary stays unset.
    ///
    /// # Errors
    ///
    /// The first option that fails to open or load its patterns aborts
    /// construction.
    pub fn new(options: impl IntoIterator<Item = HyphenationOption>) -> Result<Self> {
        let mut hyphenation = Self::default();
        for option in options {
            option.apply(&mut hyphenation)?;
        }
        Ok(hyphenation)
    }

    /// The configured dictionary, or `None` when text passes through.
    #[must_use]
    pub fn hyphenator(&self) -> Option<&Arc<dyn Hyphenator>> {
        self.hyphenator.as_ref()
    }

    /// A text renderer sharing this configuration's dictionary.
    #[must_use]
    pub fn renderer(&self) -> HyphenationHtmlRenderer {
        HyphenationHtmlRenderer::new(self.hyphenator.clone())
    }
}

impl Extender for Hyphenation {
    fn extend(&self, builder: &mut MarkdownBuilder) {
        if self.hyphenator.is_none() {
            tracing::warn!("hyphenation registered without a pattern dictionary; text passes through");
        }
        builder.add_node_renderer(Arc::new(self.renderer()), HYPHENATION_PRIORITY);
    }
}

// ---------------------------------------------------------------------------
// Text renderer
// ---------------------------------------------------------------------------

/// Renders text nodes with a soft hyphen at every allowed break.
///
/// Without a dictionary, text is written exactly as the default handler
/// writes it. Text between markers is HTML-escaped; markers are written raw.
#[derive(Clone)]
pub struct HyphenationHtmlRenderer {
    hyphenator: Option<Arc<dyn Hyphenator>>,
}

impl std::fmt::Debug for HyphenationHtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyphenationHtmlRenderer")
            .field("has_hyphenator", &self.hyphenator.is_some())
            .finish()
    }
}

impl HyphenationHtmlRenderer {
    /// Wrap `hyphenator`; with `None` the renderer only escapes text.
    #[must_use]
    pub fn new(hyphenator: Option<Arc<dyn Hyphenator>>) -> Self {
        Self { hyphenator }
    }
}

impl NodeRenderer for HyphenationHtmlRenderer {
    fn kinds(&self) -> &[NodeKind] {
        &[NodeKind::Text]
    }

    fn render(
        &self,
        w: &mut dyn Write,
        node: &Node,
        entering: bool,
    ) -> std::result::Result<WalkStatus, RenderError> {
        if !entering {
            return Ok(WalkStatus::Continue);
        }
        let Some(text) = node.text() else {
            return Ok(WalkStatus::Continue);
        };
        let Some(hyphenator) = &self.hyphenator else {
            write_escaped(w, text)?;
            return Ok(WalkStatus::SkipChildren);
        };

        let breaks = hyphenator.break_positions(text);
        splice_segments(text, &breaks, |segment| {
            match segment {
                Segment::Text(slice) => write_escaped(w, slice)?,
                Segment::Marker => w.write_all(SOFT_HYPHEN.as_bytes())?,
            }
            Ok::<(), SpliceFailure>(())
        })
        .map_err(|failure| match failure {
            SpliceFailure::Io(err) => RenderError::Io(err),
            SpliceFailure::Malformed(err) => {
                tracing::error!(range = ?node.range, error = %err, "dictionary returned malformed break positions");
                RenderError::renderer(NodeKind::Text, err)
            }
        })?;
        tracing::trace!(markers = breaks.len(), range = ?node.range, "text run hyphenated");
        Ok(WalkStatus::SkipChildren)
    }
}

#[derive(Debug)]
enum SpliceFailure {
    Io(std::io::Error),
    Malformed(SpliceError),
}

impl From<std::io::Error> for SpliceFailure {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SpliceError> for SpliceFailure {
    fn from(err: SpliceError) -> Self {
        Self::Malformed(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
