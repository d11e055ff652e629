//! Owned document tree built from `pulldown-cmark` events.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

/// Tag of a node, used as the dispatch key for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading,
    BlockQuote,
    CodeBlock,
    HtmlBlock,
    List,
    Item,
    ThematicBreak,
    Emphasis,
    Strong,
    Strikethrough,
    CodeSpan,
    Link,
    Image,
    RawHtml,
    Text,
    SoftBreak,
    HardBreak,
    /// Structure without a dedicated kind (tables, footnotes, ...). Rendered
    /// transparently unless a renderer claims it.
    Container,
}

/// Node payload.
///
/// Literal content (code, raw HTML) is stored inline rather than as `Text`
/// children, so only prose ever reaches the `Text` handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    Document,
    Paragraph,
    Heading { level: u8 },
    BlockQuote,
    CodeBlock { info: String, literal: String },
    HtmlBlock(String),
    List { start: Option<u64> },
    Item,
    ThematicBreak,
    Emphasis,
    Strong,
    Strikethrough,
    CodeSpan(String),
    Link { dest: String, title: String },
    Image { dest: String, title: String },
    RawHtml(String),
    Text(String),
    SoftBreak,
    HardBreak,
    Container,
}

impl NodeValue {
    /// Dispatch tag of this payload.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Document => NodeKind::Document,
            Self::Paragraph => NodeKind::Paragraph,
            Self::Heading { .. } => NodeKind::Heading,
            Self::BlockQuote => NodeKind::BlockQuote,
            Self::CodeBlock { .. } => NodeKind::CodeBlock,
            Self::HtmlBlock(_) => NodeKind::HtmlBlock,
            Self::List { .. } => NodeKind::List,
            Self::Item => NodeKind::Item,
            Self::ThematicBreak => NodeKind::ThematicBreak,
            Self::Emphasis => NodeKind::Emphasis,
            Self::Strong => NodeKind::Strong,
            Self::Strikethrough => NodeKind::Strikethrough,
            Self::CodeSpan(_) => NodeKind::CodeSpan,
            Self::Link { .. } => NodeKind::Link,
            Self::Image { .. } => NodeKind::Image,
            Self::RawHtml(_) => NodeKind::RawHtml,
            Self::Text(_) => NodeKind::Text,
            Self::SoftBreak => NodeKind::SoftBreak,
            Self::HardBreak => NodeKind::HardBreak,
            Self::Container => NodeKind::Container,
        }
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub value: NodeValue,
    /// Byte range of the node in the parsed source.
    pub range: Range<usize>,
    pub children: Vec<Node>,
}

impl Node {
    /// A childless node.
    #[must_use]
    pub fn new(value: NodeValue, range: Range<usize>) -> Self {
        Self {
            value,
            range,
            children: Vec::new(),
        }
    }

    /// Shorthand for `self.value.kind()`.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.value.kind()
    }

    /// Content of a `Text` node.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of all descendants, code spans included.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in self.descendants() {
            match &node.value {
                NodeValue::Text(text) | NodeValue::CodeSpan(text) => out.push_str(text),
                NodeValue::SoftBreak | NodeValue::HardBreak => out.push(' '),
                _ => {}
            }
        }
        out
    }

    /// Depth-first iterator over this node and its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Append text, merging with a directly preceding `Text` child so a run of
    /// prose is never split across nodes.
    fn push_text(&mut self, text: &str, range: Range<usize>) {
        if let Some(last) = self.children.last_mut()
            && let NodeValue::Text(existing) = &mut last.value
        {
            existing.push_str(text);
            last.range.end = last.range.end.max(range.end);
            return;
        }
        self.children
            .push(Node::new(NodeValue::Text(text.to_string()), range));
    }
}

impl Drop for Node {
    // Flatten the subtree so dropping a deeply nested document does not
    // recurse once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

fn value_for(tag: Tag<'_>) -> NodeValue {
    match tag {
        Tag::Paragraph => NodeValue::Paragraph,
        Tag::Heading { level, .. } => NodeValue::Heading { level: level as u8 },
        Tag::BlockQuote(_) => NodeValue::BlockQuote,
        Tag::CodeBlock(kind) => NodeValue::CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => info.to_string(),
                CodeBlockKind::Indented => String::new(),
            },
            literal: String::new(),
        },
        Tag::HtmlBlock => NodeValue::HtmlBlock(String::new()),
        Tag::List(start) => NodeValue::List { start },
        Tag::Item => NodeValue::Item,
        Tag::Emphasis => NodeValue::Emphasis,
        Tag::Strong => NodeValue::Strong,
        Tag::Strikethrough => NodeValue::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => NodeValue::Link {
            dest: dest_url.to_string(),
            title: title.to_string(),
        },
        Tag::Image {
            dest_url, title, ..
        } => NodeValue::Image {
            dest: dest_url.to_string(),
            title: title.to_string(),
        },
        _ => NodeValue::Container,
    }
}

fn close_top(stack: &mut Vec<Node>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(node) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.children.push(node);
    }
}

/// Parse `source` into a tree rooted at a `Document` node.
#[must_use]
pub fn parse(source: &str, options: Options) -> Node {
    let mut stack = vec![Node::new(NodeValue::Document, 0..source.len())];

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        match event {
            Event::Start(tag) => stack.push(Node::new(value_for(tag), range)),
            Event::End(_) => close_top(&mut stack),
            Event::Text(text) => {
                let Some(top) = stack.last_mut() else { continue };
                match &mut top.value {
                    NodeValue::CodeBlock { literal, .. } | NodeValue::HtmlBlock(literal) => {
                        literal.push_str(&text);
                    }
                    _ => top.push_text(&text, range),
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let Some(top) = stack.last_mut() else { continue };
                if let NodeValue::HtmlBlock(literal) = &mut top.value {
                    literal.push_str(&html);
                } else {
                    top.children
                        .push(Node::new(NodeValue::RawHtml(html.to_string()), range));
                }
            }
            Event::Code(code) => leaf(&mut stack, NodeValue::CodeSpan(code.to_string()), range),
            Event::SoftBreak => leaf(&mut stack, NodeValue::SoftBreak, range),
            Event::HardBreak => leaf(&mut stack, NodeValue::HardBreak, range),
            Event::Rule => leaf(&mut stack, NodeValue::ThematicBreak, range),
            _ => {}
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack
        .pop()
        .unwrap_or_else(|| Node::new(NodeValue::Document, 0..source.len()))
}

fn leaf(stack: &mut [Node], value: NodeValue, range: Range<usize>) {
    if let Some(top) = stack.last_mut() {
        top.children.push(Node::new(value, range));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(node: &Node) -> Vec<NodeKind> {
        node.descendants().map(Node::kind).collect()
    }

    #[test]
    fn paragraph_with_emphasis() {
        let doc = parse("Some *long* words", Options::empty());
        assert_eq!(
            kinds(&doc),
            vec![
                NodeKind::Document,
                NodeKind::Paragraph,
                NodeKind::Text,
                NodeKind::Emphasis,
                NodeKind::Text,
                NodeKind::Text,
            ]
        );
        let texts: Vec<&str> = doc.descendants().filter_map(Node::text).collect();
        assert_eq!(texts, vec!["Some ", "long", " words"]);
    }

    #[test]
    fn text_keeps_source_range() {
        let source = "# Title\n\nbody text\n";
        let doc = parse(source, Options::empty());
        let body = doc
            .descendants()
            .find(|n| n.text() == Some("body text"))
            .unwrap();
        assert_eq!(&source[body.range.clone()], "body text");
    }

    #[test]
    fn adjacent_text_events_merge() {
        let doc = parse("caf\\*e and more", Options::empty());
        let texts: Vec<&str> = doc.descendants().filter_map(Node::text).collect();
        assert_eq!(texts, vec!["caf*e and more"]);
    }

    #[test]
    fn code_never_becomes_text() {
        let doc = parse("`inline code`\n\n```rust\nfn main() {}\n```\n", Options::empty());
        assert!(doc.descendants().all(|n| n.kind() != NodeKind::Text));
        let block = doc
            .descendants()
            .find(|n| n.kind() == NodeKind::CodeBlock)
            .unwrap();
        assert_eq!(
            block.value,
            NodeValue::CodeBlock {
                info: "rust".to_string(),
                literal: "fn main() {}\n".to_string(),
            }
        );
    }

    #[test]
    fn html_block_collects_literal() {
        let doc = parse("<div>\nraw\n</div>\n", Options::empty());
        let block = doc
            .descendants()
            .find(|n| n.kind() == NodeKind::HtmlBlock)
            .unwrap();
        assert_eq!(block.value, NodeValue::HtmlBlock("<div>\nraw\n</div>\n".to_string()));
        assert!(block.children.is_empty());
    }

    #[test]
    fn breaks_are_separate_nodes() {
        let doc = parse("one\ntwo  \nthree", Options::empty());
        let para = &doc.children[0];
        let kinds: Vec<NodeKind> = para.children.iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Text,
                NodeKind::SoftBreak,
                NodeKind::Text,
                NodeKind::HardBreak,
                NodeKind::Text,
            ]
        );
    }

    #[test]
    fn plain_text_of_image_alt() {
        let doc = parse("![an *alt* `text`](pic.png)", Options::empty());
        let image = doc
            .descendants()
            .find(|n| n.kind() == NodeKind::Image)
            .unwrap();
        assert_eq!(image.plain_text(), "an alt text");
    }

    #[test]
    fn strikethrough_needs_option() {
        let plain = parse("~~gone~~", Options::empty());
        assert!(plain.descendants().all(|n| n.kind() != NodeKind::Strikethrough));
        let extended = parse("~~gone~~", Options::ENABLE_STRIKETHROUGH);
        assert!(extended.descendants().any(|n| n.kind() == NodeKind::Strikethrough));
    }

    #[test]
    fn deep_tree_drops_iteratively() {
        let mut root = Node::new(NodeValue::Text("leaf".into()), 0..4);
        for _ in 0..100_000 {
            let mut parent = Node::new(NodeValue::BlockQuote, 0..4);
            parent.children.push(root);
            root = parent;
        }
        assert_eq!(root.descendants().count(), 100_001);
        assert_eq!(root.plain_text(), "leaf");
        drop(root);
    }

    #[test]
    fn deeply_nested_emphasis_parses() {
        let source = format!("{}word{}", "*".repeat(30_000), "*".repeat(30_000));
        let doc = parse(&source, Options::empty());
        assert!(doc.descendants().count() > 10_000);
        assert_eq!(doc.plain_text(), "word");
    }

    #[test]
    fn empty_source() {
        let doc = parse("", Options::empty());
        assert_eq!(doc.kind(), NodeKind::Document);
        assert!(doc.children.is_empty());
    }
}
