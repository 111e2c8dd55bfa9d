use srcref_showcase::config::ShowcaseConfig;
use srcref_showcase::display::{DisplayTree, NodeSpec};
use srcref_showcase::highlight::{
    EffectSink, Endpoint, HighlightEffect, HighlightError, HighlightOutcome, SourceRef,
    SpanHighlighter,
};
use srcref_showcase::resolver::Miss;

// Records every call the highlighter makes on the display layer
#[derive(Default)]
struct RecordingEffects {
    calls: Vec<String>,
}

impl EffectSink for RecordingEffects {
    fn stop(&mut self, marker: &str) {
        self.calls.push(format!("stop {marker}"));
    }

    fn start(&mut self, marker: &str, effect: HighlightEffect) {
        self.calls
            .push(format!("start {marker} {}ms", effect.duration.as_millis()));
    }
}

fn page(children: Vec<NodeSpec>) -> DisplayTree {
    let code = NodeSpec::container("code", children).with_id("server-r-code");
    let spec = NodeSpec::container("pre", vec![code]);
    DisplayTree::from_spec(&spec).expect("valid tree")
}

fn token(text: &str) -> NodeSpec {
    NodeSpec::container("span", vec![text.into()]).with_class("token")
}

fn marker_text(tree: &DisplayTree, srcref: &SourceRef) -> String {
    let marker = tree
        .get_element_by_id(&srcref.marker_id("srcref_"))
        .expect("marker exists");
    tree.text_content(marker)
}

fn highlighter() -> SpanHighlighter {
    SpanHighlighter::new(&ShowcaseConfig::default())
}

#[cfg(test)]
mod highlight_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repeat_highlight_creates_one_marker() {
        let mut tree = page(vec![token("abc"), " <- 1\n".into(), "b <- 2".into()]);
        let mut effects = RecordingEffects::default();
        let srcref = SourceRef([1, 0, 1, 0, 0, 3]);
        let before = tree.node_count();

        let first = highlighter()
            .highlight(&mut tree, &mut effects, &srcref)
            .expect("first highlight");
        let second = highlighter()
            .highlight(&mut tree, &mut effects, &srcref)
            .expect("second highlight");

        assert!(matches!(first, HighlightOutcome::Created(_)));
        assert_eq!(second, HighlightOutcome::Reused(first.marker()));
        assert_eq!(tree.node_count(), before + 1);
        assert_eq!(marker_text(&tree, &srcref), "abc");
        assert_eq!(
            effects.calls,
            vec![
                "stop srcref_1,0,1,0,0,3",
                "start srcref_1,0,1,0,0,3 1600ms",
                "stop srcref_1,0,1,0,0,3",
                "start srcref_1,0,1,0,0,3 1600ms",
            ]
        );
    }

    #[test]
    fn test_distinct_wrappers_are_included_whole() {
        // x <- foo(bar)
        let mut tree = page(vec![
            "x <- ".into(),
            token("foo"),
            "(".into(),
            token("bar"),
            ")\n".into(),
        ]);
        let mut effects = RecordingEffects::default();
        let srcref = SourceRef([1, 6, 1, 10, 6, 10]);

        highlighter()
            .highlight(&mut tree, &mut effects, &srcref)
            .expect("highlight");

        assert_eq!(marker_text(&tree, &srcref), "foo(bar)");
        let code = tree.get_element_by_id("server-r-code").unwrap();
        assert_eq!(tree.text_content(code), "x <- foo(bar)\n");
    }

    #[test]
    fn test_same_token_is_split_exactly() {
        let mut tree = page(vec![token("renderPlot"), "\n".into()]);
        let mut effects = RecordingEffects::default();
        let srcref = SourceRef([1, 0, 1, 0, 6, 10]);

        highlighter()
            .highlight(&mut tree, &mut effects, &srcref)
            .expect("highlight");

        assert_eq!(marker_text(&tree, &srcref), "Plot");
        let marker = tree.get_element_by_id("srcref_1,0,1,0,6,10").unwrap();
        let token = tree.parent(marker).unwrap();
        assert_eq!(tree.element_id(token), None);
        assert_eq!(tree.text_content(token), "renderPlot");
    }

    #[test]
    fn test_multiline_plain_span() {
        let mut tree = page(vec!["alpha\nbeta\ngamma".into()]);
        let mut effects = RecordingEffects::default();
        let srcref = SourceRef([2, 0, 3, 0, 1, 3]);

        highlighter()
            .highlight(&mut tree, &mut effects, &srcref)
            .expect("highlight");

        assert_eq!(marker_text(&tree, &srcref), "eta\ngam");
        let code = tree.get_element_by_id("server-r-code").unwrap();
        assert_eq!(tree.text_content(code), "alpha\nbeta\ngamma");
        assert_eq!(tree.children(code).len(), 3);
    }

    #[test]
    fn test_unrendered_reference_leaves_tree_alone() {
        let mut tree = page(vec!["a <- 1\nb <- 2".into()]);
        let mut effects = RecordingEffects::default();
        let before = tree.to_spec(tree.root());

        let err = highlighter()
            .highlight(&mut tree, &mut effects, &SourceRef([9, 0, 9, 0, 0, 1]))
            .unwrap_err();

        assert_eq!(
            err,
            HighlightError::Unresolved {
                endpoint: Endpoint::Start,
                miss: Miss::lines(2),
            }
        );
        assert_eq!(tree.to_spec(tree.root()), before);
        assert!(effects.calls.is_empty());
    }

    #[test]
    fn test_end_past_line_reports_end_endpoint() {
        let mut tree = page(vec!["a <- 1".into()]);
        let mut effects = RecordingEffects::default();

        let err = highlighter()
            .highlight(&mut tree, &mut effects, &SourceRef([1, 0, 1, 0, 0, 40]))
            .unwrap_err();

        assert!(matches!(
            err,
            HighlightError::Unresolved {
                endpoint: Endpoint::End,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_wrapper_mismatch_is_rejected_before_mutation() {
        let mut tree = page(vec![
            NodeSpec::container("span", vec![token("ab"), "cd".into()]),
            "ef".into(),
        ]);
        let mut effects = RecordingEffects::default();
        let before = tree.to_spec(tree.root());

        let err = highlighter()
            .highlight(&mut tree, &mut effects, &SourceRef([1, 1, 1, 5, 1, 5]))
            .unwrap_err();

        assert!(matches!(err, HighlightError::StructuralMismatch { .. }));
        assert_eq!(tree.to_spec(tree.root()), before);
        assert_eq!(tree.get_element_by_id("srcref_1,1,1,5,1,5"), None);
    }

    #[test]
    fn test_inverted_reference_is_rejected() {
        let mut tree = page(vec!["one\ntwo".into()]);
        let mut effects = RecordingEffects::default();
        let before = tree.node_count();

        let err = highlighter()
            .highlight(&mut tree, &mut effects, &SourceRef([2, 0, 1, 0, 2, 1]))
            .unwrap_err();

        assert_eq!(err, HighlightError::InvertedRange);
        assert_eq!(tree.node_count(), before);
    }

    #[test]
    fn test_missing_code_root() {
        let mut tree = DisplayTree::from_spec(&NodeSpec::container("pre", vec!["x".into()]))
            .expect("valid tree");
        let mut effects = RecordingEffects::default();

        let err = highlighter()
            .highlight(&mut tree, &mut effects, &SourceRef([1, 0, 1, 0, 0, 1]))
            .unwrap_err();

        assert_eq!(err, HighlightError::MissingCodeRoot("server-r-code".into()));
    }

    #[test]
    fn test_overlapping_reference_wraps_existing_markers() {
        let mut tree = page(vec!["hello world\n".into()]);
        let mut effects = RecordingEffects::default();
        let h = highlighter();

        let hello = SourceRef([1, 0, 1, 5, 0, 5]);
        let world = SourceRef([1, 6, 1, 11, 6, 11]);
        let both = SourceRef([1, 2, 1, 8, 2, 8]);
        h.highlight(&mut tree, &mut effects, &hello).unwrap();
        h.highlight(&mut tree, &mut effects, &world).unwrap();
        h.highlight(&mut tree, &mut effects, &both).unwrap();

        // markers use the wrapper tag, so partial overlaps widen to whole markers
        assert_eq!(marker_text(&tree, &both), "hello world");
        let outer = tree.get_element_by_id(&both.marker_id("srcref_")).unwrap();
        let inner = tree.get_element_by_id(&hello.marker_id("srcref_")).unwrap();
        assert_eq!(tree.parent(inner), Some(outer));
    }

    #[test]
    fn test_custom_marker_prefix_and_duration() {
        let config = ShowcaseConfig {
            marker_prefix: "trace-".into(),
            highlight_duration_ms: 250,
            ..ShowcaseConfig::default()
        };
        let mut tree = page(vec!["abc".into()]);
        let mut effects = RecordingEffects::default();

        SpanHighlighter::new(&config)
            .highlight(&mut tree, &mut effects, &SourceRef([1, 0, 1, 0, 1, 2]))
            .unwrap();

        assert!(tree.get_element_by_id("trace-1,0,1,0,1,2").is_some());
        assert_eq!(effects.calls[1], "start trace-1,0,1,0,1,2 250ms");
    }
}
