use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::protocol::ReactLogEntry;
use crate::config::ShowcaseConfig;
use crate::display::{DisplayTree, NodeId, NodeSpec, TreeError};
use crate::highlight::{
    EffectTimeline, HighlightError, HighlightOutcome, SourceRef, SpanHighlighter,
};
use crate::layout::LayoutState;

/// One showcase page: the rendered code, its markers, their effects and the
/// panel layout.
pub struct Showcase {
    config: ShowcaseConfig,
    tree: DisplayTree,
    highlighter: SpanHighlighter,
    effects: EffectTimeline,
    layout: LayoutState,
}

impl Showcase {
    pub fn new(config: ShowcaseConfig, tree: DisplayTree) -> Self {
        Self {
            highlighter: SpanHighlighter::new(&config),
            layout: LayoutState::new(config.app_target_width),
            effects: EffectTimeline::new(),
            tree,
            config,
        }
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn tree(&self) -> &DisplayTree {
        &self.tree
    }

    pub fn effects(&self) -> &EffectTimeline {
        &self.effects
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutState {
        &mut self.layout
    }

    pub fn highlighter(&self) -> &SpanHighlighter {
        &self.highlighter
    }

    /// Replaces the rendered page. Markers and effects of the old page go
    /// with it.
    pub fn load(&mut self, spec: &NodeSpec) -> Result<(), TreeError> {
        self.replace_tree(DisplayTree::from_spec(spec)?);
        Ok(())
    }

    pub fn replace_tree(&mut self, tree: DisplayTree) {
        self.tree = tree;
        self.effects = EffectTimeline::new();
        info!(nodes = self.tree.node_count(), "display tree loaded");
    }

    /// Drops effects whose pulse has run out.
    pub fn expire_effects(&mut self) -> Vec<String> {
        let done = self.effects.expire(Instant::now());
        if !done.is_empty() {
            debug!(count = done.len(), "highlight effects finished");
        }
        done
    }

    /// Entry point for anything that wants a code location pulsed.
    ///
    /// Failures leave the tree untouched and are only logged: a reference may
    /// legitimately point at code that is not rendered.
    pub fn highlight_srcref(
        &mut self,
        srcref: &SourceRef,
    ) -> Result<HighlightOutcome, HighlightError> {
        let result = self
            .highlighter
            .highlight(&mut self.tree, &mut self.effects, srcref);
        if let Err(err) = &result {
            debug!(%srcref, error = %err, "skipping highlight");
        }
        result
    }

    /// Handles a `reactlog` message; entries without `srcref` are ignored.
    pub fn on_reactlog(&mut self, message: &Value) -> Option<(SourceRef, HighlightOutcome)> {
        let entry = match ReactLogEntry::from_value(message) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "malformed reactlog message");
                return None;
            }
        };
        let srcref = entry.srcref?;
        let outcome = self.highlight_srcref(&srcref).ok()?;
        Some((srcref, outcome))
    }

    pub fn code_root(&self) -> Option<NodeId> {
        self.tree.get_element_by_id(&self.config.code_root_id)
    }

    /// Code panel text with every marker bracketed as `⟦…⟧`.
    pub fn annotated_code(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.code_root() {
            for &child in self.tree.children(root) {
                self.annotate(child, &mut out);
            }
        }
        out
    }

    fn annotate(&self, node: NodeId, out: &mut String) {
        if let Some(text) = self.tree.text(node) {
            out.push_str(text);
            return;
        }
        let is_marker = self
            .tree
            .element_id(node)
            .is_some_and(|id| id.starts_with(&self.config.marker_prefix));
        if is_marker {
            out.push('⟦');
        }
        for &child in self.tree.children(node) {
            self.annotate(child, out);
        }
        if is_marker {
            out.push('⟧');
        }
    }
}
