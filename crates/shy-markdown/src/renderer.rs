//! Node renderer registry and the tree walk.

use std::io::Write;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ast::{Node, NodeKind};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Renderer contract
// ---------------------------------------------------------------------------

/// What the walk does after a renderer has seen a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Descend into children, then call the renderer again on exit.
    Continue,
    /// Do not descend; the exit call still happens.
    SkipChildren,
    /// Abandon the rest of the walk.
    Stop,
}

/// Renders the nodes of the kinds it declares.
///
/// Each node is offered twice: with `entering == true` before its children
/// and with `entering == false` after them.
pub trait NodeRenderer: Send + Sync {
    /// Kinds this renderer handles.
    fn kinds(&self) -> &[NodeKind];

    /// # Errors
    ///
    /// Write failures and renderer-specific failures abort the pass.
    fn render(&self, w: &mut dyn Write, node: &Node, entering: bool) -> Result<WalkStatus>;
}

/// A value paired with a priority. Lower values take precedence.
#[derive(Debug, Clone)]
pub struct Prioritized<T> {
    pub value: T,
    pub priority: i32,
}

impl<T> Prioritized<T> {
    #[must_use]
    pub fn new(value: T, priority: i32) -> Self {
        Self { value, priority }
    }
}

// ---------------------------------------------------------------------------
// Dispatch and walk
// ---------------------------------------------------------------------------

/// Dispatch table from node kind to renderer, fixed at construction.
#[derive(Clone, Default)]
pub struct HtmlRenderer {
    handlers: FxHashMap<NodeKind, Arc<dyn NodeRenderer>>,
}

impl std::fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("HtmlRenderer").field("kinds", &kinds).finish()
    }
}

impl HtmlRenderer {
    /// Build the table. For every kind, the renderer with the lowest priority
    /// value claiming it wins; ties go to the earlier entry.
    #[must_use]
    pub fn new(mut renderers: Vec<Prioritized<Arc<dyn NodeRenderer>>>) -> Self {
        renderers.sort_by_key(|r| r.priority);
        let mut handlers: FxHashMap<NodeKind, Arc<dyn NodeRenderer>> = FxHashMap::default();
        for entry in &renderers {
            for &kind in entry.value.kinds() {
                handlers
                    .entry(kind)
                    .or_insert_with(|| Arc::clone(&entry.value));
            }
        }
        Self { handlers }
    }

    /// Renderer selected for `kind`, if any.
    #[must_use]
    pub fn handler(&self, kind: NodeKind) -> Option<&Arc<dyn NodeRenderer>> {
        self.handlers.get(&kind)
    }

    /// Render `root` and its subtree into `w`.
    ///
    /// The walk keeps its own stack, so nesting depth is bounded by memory
    /// rather than by the thread's stack.
    ///
    /// # Errors
    ///
    /// The first renderer error ends the walk and is returned as is.
    pub fn render(&self, w: &mut dyn Write, root: &Node) -> Result<()> {
        let mut stack = Vec::new();
        if self.enter(w, root, &mut stack)? == WalkStatus::Stop {
            return Ok(());
        }
        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if let Some(child) = node.children.get(frame.next_child) {
                frame.next_child += 1;
                if self.enter(w, child, &mut stack)? == WalkStatus::Stop {
                    return Ok(());
                }
                continue;
            }
            if let Some(frame) = stack.pop()
                && let Some(handler) = frame.handler
                && handler.render(w, frame.node, false)? == WalkStatus::Stop
            {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Offer `node` to its handler and push the frame that schedules its
    /// children and its exit call.
    fn enter<'a>(
        &'a self,
        w: &mut dyn Write,
        node: &'a Node,
        stack: &mut Vec<Frame<'a>>,
    ) -> Result<WalkStatus> {
        // Kinds nobody claims are transparent.
        let handler = self.handlers.get(&node.kind());
        let status = match handler {
            Some(handler) => handler.render(w, node, true)?,
            None => WalkStatus::Continue,
        };
        let next_child = match status {
            WalkStatus::Stop => return Ok(WalkStatus::Stop),
            WalkStatus::Continue => 0,
            WalkStatus::SkipChildren => node.children.len(),
        };
        stack.push(Frame {
            node,
            handler,
            next_child,
        });
        Ok(status)
    }
}

/// A node that has been entered but not yet exited.
struct Frame<'a> {
    node: &'a Node,
    handler: Option<&'a Arc<dyn NodeRenderer>>,
    next_child: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
