#![forbid(unsafe_code)]

//! Markdown to HTML with pluggable, prioritized node renderers.
//!
//! Source is parsed with `pulldown-cmark` into an owned [`ast::Node`] tree.
//! [`renderer::HtmlRenderer`] walks the tree depth-first and hands each node
//! to the registered [`renderer::NodeRenderer`] for its [`ast::NodeKind`].
//! When several renderers claim a kind, the lowest priority value wins, so an
//! [`markdown::Extender`] registered below [`html::DEFAULT_HTML_PRIORITY`]
//! replaces the built-in handler.

pub mod ast;
pub mod error;
pub mod html;
pub mod markdown;
pub mod renderer;

pub use ast::{Node, NodeKind, NodeValue};
pub use error::RenderError;
pub use markdown::{Extender, Markdown, MarkdownBuilder};
pub use pulldown_cmark::Options;
pub use renderer::{HtmlRenderer, NodeRenderer, Prioritized, WalkStatus};
