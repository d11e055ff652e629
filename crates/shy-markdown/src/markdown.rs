//! The parse-and-render pipeline and its extension point.

use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use pulldown_cmark::Options;

use crate::ast::{self, Node};
use crate::error::Result;
use crate::html::{DEFAULT_HTML_PRIORITY, HtmlNodeRenderer};
use crate::renderer::{HtmlRenderer, NodeRenderer, Prioritized};

/// Something that plugs node renderers into a pipeline.
pub trait Extender {
    fn extend(&self, builder: &mut MarkdownBuilder);
}

/// Collects parser options and node renderers before the dispatch table is
/// frozen by [`MarkdownBuilder::build`].
pub struct MarkdownBuilder {
    options: Options,
    renderers: Vec<Prioritized<Arc<dyn NodeRenderer>>>,
}

impl std::fmt::Debug for MarkdownBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let priorities: Vec<i32> = self.renderers.iter().map(|r| r.priority).collect();
        f.debug_struct("MarkdownBuilder")
            .field("options", &self.options)
            .field("renderer_priorities", &priorities)
            .finish()
    }
}

impl Default for MarkdownBuilder {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_STRIKETHROUGH,
            renderers: vec![Prioritized::new(
                Arc::new(HtmlNodeRenderer) as Arc<dyn NodeRenderer>,
                DEFAULT_HTML_PRIORITY,
            )],
        }
    }
}

impl MarkdownBuilder {
    /// Replace the parser options.
    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Renderers registered so far, in registration order.
    #[must_use]
    pub fn renderers(&self) -> &[Prioritized<Arc<dyn NodeRenderer>>] {
        &self.renderers
    }

    /// Register `renderer` for its kinds at `priority`.
    pub fn add_node_renderer(&mut self, renderer: Arc<dyn NodeRenderer>, priority: i32) -> &mut Self {
        self.renderers.push(Prioritized::new(renderer, priority));
        self
    }

    /// Let `extension` register its renderers.
    #[must_use]
    pub fn extension(mut self, extension: &dyn Extender) -> Self {
        extension.extend(&mut self);
        self
    }

    /// Freeze the dispatch table.
    #[must_use]
    pub fn build(self) -> Markdown {
        tracing::debug!(
            renderers = self.renderers.len(),
            "markdown pipeline built"
        );
        Markdown {
            options: self.options,
            renderer: HtmlRenderer::new(self.renderers),
        }
    }
}

/// Markdown → HTML converter. Immutable once built; safe to share between
/// threads rendering different documents.
#[derive(Debug, Clone)]
pub struct Markdown {
    options: Options,
    renderer: HtmlRenderer,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Markdown {
    /// A pipeline with only the built-in HTML renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the default options and the built-in HTML renderer.
    #[must_use]
    pub fn builder() -> MarkdownBuilder {
        MarkdownBuilder::default()
    }

    /// The frozen dispatch table.
    #[must_use]
    pub fn renderer(&self) -> &HtmlRenderer {
        &self.renderer
    }

    /// Parse `source` with this pipeline's options.
    #[must_use]
    pub fn parse(&self, source: &str) -> Node {
        ast::parse(source, self.options)
    }

    /// Parse `source` and write its HTML to `w`.
    ///
    /// # Errors
    ///
    /// Returns the first renderer or write failure; output written before the
    /// failure is not rolled back.
    pub fn convert(&self, source: &str, w: &mut dyn Write) -> Result<()> {
        let span = tracing::debug_span!("markdown.render", source_len = source.len());
        let _guard = span.enter();

        let root = self.parse(source);
        let mut out = BufWriter::new(w);
        self.renderer.render(&mut out, &root)?;
        out.flush()?;
        Ok(())
    }

    /// Convert to an owned HTML string.
    ///
    /// # Errors
    ///
    /// Returns renderer failures.
    pub fn to_html(&self, source: &str) -> Result<String> {
        let mut out = Vec::with_capacity(source.len() + source.len() / 2);
        self.convert(source, &mut out)?;
        String::from_utf8(out)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
    }
}
