use std::time::Duration;

use tracing::{debug, instrument};

use super::effect::{EffectSink, HighlightEffect};
use super::error::{Endpoint, HighlightError};
use super::range::SpanRange;
use super::srcref::SourceRef;
use crate::config::ShowcaseConfig;
use crate::display::{DisplayTree, NodeId};
use crate::resolver;

/// What `highlight` did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightOutcome {
    Created(NodeId),
    Reused(NodeId),
}

impl HighlightOutcome {
    pub fn marker(self) -> NodeId {
        match self {
            HighlightOutcome::Created(id) | HighlightOutcome::Reused(id) => id,
        }
    }

    pub fn created(self) -> bool {
        matches!(self, HighlightOutcome::Created(_))
    }
}

/// Wraps referenced spans of one code panel in markers and pulses them.
#[derive(Debug, Clone)]
pub struct SpanHighlighter {
    code_root_id: String,
    wrapper_tag: String,
    marker_prefix: String,
    effect: HighlightEffect,
}

impl SpanHighlighter {
    pub fn new(config: &ShowcaseConfig) -> Self {
        Self {
            code_root_id: config.code_root_id.clone(),
            wrapper_tag: config.wrapper_tag.clone(),
            marker_prefix: config.marker_prefix.clone(),
            effect: HighlightEffect {
                duration: Duration::from_millis(config.highlight_duration_ms),
            },
        }
    }

    pub fn marker_id(&self, srcref: &SourceRef) -> String {
        srcref.marker_id(&self.marker_prefix)
    }

    pub fn effect(&self) -> HighlightEffect {
        self.effect
    }

    #[instrument(skip_all, fields(srcref = %srcref))]
    pub fn highlight(
        &self,
        tree: &mut DisplayTree,
        effects: &mut dyn EffectSink,
        srcref: &SourceRef,
    ) -> Result<HighlightOutcome, HighlightError> {
        let id = self.marker_id(srcref);
        let outcome = match tree.get_element_by_id(&id) {
            Some(marker) => HighlightOutcome::Reused(marker),
            None => HighlightOutcome::Created(self.mark(tree, srcref, &id)?),
        };

        effects.stop(&id);
        effects.start(&id, self.effect);
        debug!(marker = %id, created = outcome.created(), "highlight restarted");
        Ok(outcome)
    }

    fn mark(
        &self,
        tree: &mut DisplayTree,
        srcref: &SourceRef,
        id: &str,
    ) -> Result<NodeId, HighlightError> {
        let code = tree
            .get_element_by_id(&self.code_root_id)
            .ok_or_else(|| HighlightError::MissingCodeRoot(self.code_root_id.clone()))?;

        let start = resolver::resolve(tree, code, srcref.start_line(), srcref.start_col())
            .into_result()
            .map_err(|miss| HighlightError::Unresolved {
                endpoint: Endpoint::Start,
                miss,
            })?;
        let end = resolver::resolve(tree, code, srcref.end_line(), srcref.end_col())
            .into_result()
            .map_err(|miss| HighlightError::Unresolved {
                endpoint: Endpoint::End,
                miss,
            })?;

        let range = SpanRange::between(tree, code, &self.wrapper_tag, start, end);
        range.surround(tree, &self.wrapper_tag, id)
    }
}
