//! Built-in HTML output for every node kind.

use std::io::Write;

use v_htmlescape::escape;

use crate::ast::{Node, NodeKind, NodeValue};
use crate::error::Result;
use crate::renderer::{NodeRenderer, WalkStatus};

/// Priority of [`HtmlNodeRenderer`]. Extensions register below this to
/// replace individual kinds.
pub const DEFAULT_HTML_PRIORITY: i32 = 1000;

const KINDS: &[NodeKind] = &[
    NodeKind::Document,
    NodeKind::Paragraph,
    NodeKind::Heading,
    NodeKind::BlockQuote,
    NodeKind::CodeBlock,
    NodeKind::HtmlBlock,
    NodeKind::List,
    NodeKind::Item,
    NodeKind::ThematicBreak,
    NodeKind::Emphasis,
    NodeKind::Strong,
    NodeKind::Strikethrough,
    NodeKind::CodeSpan,
    NodeKind::Link,
    NodeKind::Image,
    NodeKind::RawHtml,
    NodeKind::Text,
    NodeKind::SoftBreak,
    NodeKind::HardBreak,
];

/// Write `text` with HTML special characters escaped.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_escaped(w: &mut dyn Write, text: &str) -> std::io::Result<()> {
    write!(w, "{}", escape(text))
}

fn tag(w: &mut dyn Write, entering: bool, name: &str) -> std::io::Result<()> {
    if entering {
        write!(w, "<{name}>")
    } else {
        write!(w, "</{name}>")
    }
}

fn block(w: &mut dyn Write, entering: bool, name: &str) -> std::io::Result<()> {
    tag(w, entering, name)?;
    if !entering {
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// CommonMark-style HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlNodeRenderer;

impl NodeRenderer for HtmlNodeRenderer {
    fn kinds(&self) -> &[NodeKind] {
        KINDS
    }

    fn render(&self, w: &mut dyn Write, node: &Node, entering: bool) -> Result<WalkStatus> {
        match &node.value {
            NodeValue::Document | NodeValue::Container => {}
            NodeValue::Paragraph => block(w, entering, "p")?,
            NodeValue::Heading { level } => block(w, entering, &format!("h{level}"))?,
            NodeValue::BlockQuote => {
                tag(w, entering, "blockquote")?;
                w.write_all(b"\n")?;
            }
            NodeValue::CodeBlock { info, literal } => {
                if entering {
                    match info.split_whitespace().next() {
                        Some(lang) => write!(w, "<pre><code class=\"language-{}\">", escape(lang))?,
                        None => w.write_all(b"<pre><code>")?,
                    }
                    write_escaped(w, literal)?;
                    w.write_all(b"</code></pre>\n")?;
                }
                return Ok(WalkStatus::SkipChildren);
            }
            NodeValue::HtmlBlock(literal) | NodeValue::RawHtml(literal) => {
                if entering {
                    w.write_all(literal.as_bytes())?;
                }
                return Ok(WalkStatus::SkipChildren);
            }
            NodeValue::List { start } => {
                let name = if start.is_some() { "ol" } else { "ul" };
                match (entering, start) {
                    (true, Some(n)) if *n != 1 => write!(w, "<ol start=\"{n}\">")?,
                    _ => tag(w, entering, name)?,
                }
                w.write_all(b"\n")?;
            }
            NodeValue::Item => block(w, entering, "li")?,
            NodeValue::ThematicBreak => {
                if entering {
                    w.write_all(b"<hr />\n")?;
                }
            }
            NodeValue::Emphasis => tag(w, entering, "em")?,
            NodeValue::Strong => tag(w, entering, "strong")?,
            NodeValue::Strikethrough => tag(w, entering, "del")?,
            NodeValue::CodeSpan(code) => {
                if entering {
                    w.write_all(b"<code>")?;
                    write_escaped(w, code)?;
                    w.write_all(b"</code>")?;
                }
                return Ok(WalkStatus::SkipChildren);
            }
            NodeValue::Link { dest, title } => {
                if entering {
                    write!(w, "<a href=\"{}\"", escape(dest))?;
                    if !title.is_empty() {
                        write!(w, " title=\"{}\"", escape(title))?;
                    }
                    w.write_all(b">")?;
                } else {
                    w.write_all(b"</a>")?;
                }
            }
            NodeValue::Image { dest, title } => {
                // Alt text is rendered here from the children, so they are
                // never visited by other renderers.
                if entering {
                    write!(
                        w,
                        "<img src=\"{}\" alt=\"{}\"",
                        escape(dest),
                        escape(&node.plain_text())
                    )?;
                    if !title.is_empty() {
                        write!(w, " title=\"{}\"", escape(title))?;
                    }
                    w.write_all(b" />")?;
                }
                return Ok(WalkStatus::SkipChildren);
            }
            NodeValue::Text(text) => {
                if entering {
                    write_escaped(w, text)?;
                }
            }
            NodeValue::SoftBreak => {
                if entering {
                    w.write_all(b"\n")?;
                }
            }
            NodeValue::HardBreak => {
                if entering {
                    w.write_all(b"<br />\n")?;
                }
            }
        }
        Ok(WalkStatus::Continue)
    }
}
