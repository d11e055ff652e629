use thiserror::Error;

use crate::ast::NodeKind;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Failure during a render pass. The pass is abandoned; nothing retries.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind:?} renderer failed: {source}")]
    Renderer {
        kind: NodeKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RenderError {
    /// A failure raised by the renderer for `kind`.
    #[must_use]
    pub fn renderer(
        kind: NodeKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Renderer {
            kind,
            source: source.into(),
        }
    }
}
