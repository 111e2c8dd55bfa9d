// tests/session_simulation.rs
// Drives a showcase session the way a running app and a user would

use std::io::Cursor;

use serde_json::{json, Value};
use srcref_showcase::config::ShowcaseConfig;
use srcref_showcase::display::{render_source, DisplayTree, NodeSpec, Tokenize};
use srcref_showcase::highlight::SourceRef;
use srcref_showcase::logging::init_tracing_once;
use srcref_showcase::showcase::{run_console, serve, Showcase, ShowcaseServer};

// Helper to frame one message the way the app runtime does
fn frame(value: &Value) -> String {
    let body = value.to_string();
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
}

// Helper to split the server's output back into messages
fn read_frames(mut bytes: &[u8]) -> Vec<Value> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        let text = std::str::from_utf8(bytes).expect("utf8 output");
        let header_end = text.find("\r\n\r\n").expect("frame header");
        let len: usize = text["Content-Length: ".len()..header_end]
            .trim()
            .parse()
            .expect("content length");
        let start = header_end + 4;
        out.push(serde_json::from_slice(&bytes[start..start + len]).expect("json body"));
        bytes = &bytes[start + len..];
    }
    out
}

fn server_code() -> NodeSpec {
    let code = NodeSpec::container(
        "code",
        vec![
            NodeSpec::container("span", vec!["output".into()]),
            "$".into(),
            NodeSpec::container("span", vec!["plot".into()]),
            " <- renderPlot({\n  hist(x)\n})".into(),
        ],
    )
    .with_id("server-r-code");
    NodeSpec::container("pre", vec![code])
}

fn run_frames(showcase: &mut Showcase, frames: &[String]) -> Vec<Value> {
    let input = Cursor::new(frames.concat().into_bytes());
    let mut server = ShowcaseServer::new(input, Vec::new());
    serve(showcase, &mut server).expect("session ends cleanly");
    read_frames(&server.into_writer())
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[test]
    fn test_reactlog_messages_drive_highlights() {
        init_tracing_once();
        let mut showcase = Showcase::new(ShowcaseConfig::default(), DisplayTree::new("div"));
        let frames = vec![
            frame(&json!({
                "seq": 1, "type": "request", "command": "loadCode",
                "arguments": { "tree": server_code() }
            })),
            frame(&json!({
                "seq": 2, "type": "custom", "handler": "reactlog",
                "message": { "action": "enter", "srcref": [2, 2, 2, 8, 2, 8] }
            })),
            frame(&json!({
                "seq": 3, "type": "custom", "handler": "reactlog",
                "message": { "action": "exit" }
            })),
            frame(&json!({
                "seq": 4, "type": "request", "command": "highlightSrcref",
                "arguments": { "srcref": [2, 2, 2, 8, 2, 8] }
            })),
            frame(&json!({ "seq": 5, "type": "request", "command": "snapshot" })),
            frame(&json!({ "seq": 6, "type": "request", "command": "disconnect" })),
        ];

        let out = run_frames(&mut showcase, &frames);

        assert_eq!(out.len(), 6, "unexpected output: {out:#?}");
        assert_eq!(out[0]["command"], "loadCode");
        assert_eq!(out[0]["success"], true);

        assert_eq!(out[1]["type"], "event");
        assert_eq!(out[1]["event"], "highlight");
        assert_eq!(out[1]["body"]["marker"], "srcref_2,2,2,8,2,8");
        assert_eq!(out[1]["body"]["created"], true);
        assert_eq!(out[1]["body"]["durationMs"], 1600);

        assert_eq!(out[2]["command"], "highlightSrcref");
        assert_eq!(out[2]["body"]["created"], false);
        assert_eq!(out[3]["event"], "highlight");

        assert_eq!(
            out[4]["body"]["annotated"],
            "output$plot <- renderPlot({\n  ⟦hist(x⟧)\n})"
        );
        assert_eq!(out[5]["command"], "disconnect");

        let marker = "srcref_2,2,2,8,2,8";
        assert_eq!(showcase.effects().stats(marker).starts, 2);
        assert_eq!(showcase.effects().stats(marker).stops, 2);
    }

    #[test]
    fn test_bad_frames_and_requests_do_not_end_the_session() {
        init_tracing_once();
        let config = ShowcaseConfig::default();
        let tree = render_source("a <- 1\n", &config.code_root_id, &config.wrapper_tag, Tokenize::Plain)
            .expect("renders");
        let mut showcase = Showcase::new(config, tree);
        let frames = vec![
            "Content-Length: 5\r\n\r\nnope!".to_string(),
            frame(&json!({
                "seq": 1, "type": "request", "command": "highlightSrcref",
                "arguments": { "srcref": [40, 0, 40, 0, 0, 1] }
            })),
            frame(&json!({ "seq": 2, "type": "request", "command": "rewind" })),
            frame(&json!({
                "seq": 3, "type": "custom", "handler": "reactlog",
                "message": { "srcref": [1, 0, 1, 0, 0, 1] }
            })),
        ];

        let out = run_frames(&mut showcase, &frames);

        assert_eq!(out.len(), 3, "unexpected output: {out:#?}");
        assert_eq!(out[0]["success"], false);
        assert!(out[0]["message"].as_str().unwrap().contains("not rendered"));
        assert_eq!(out[1]["success"], false);
        assert_eq!(out[2]["event"], "highlight");
        assert_eq!(showcase.annotated_code(), "⟦a⟧ <- 1\n");
    }

    #[test]
    fn test_layout_requests() {
        let mut showcase = Showcase::new(ShowcaseConfig::default(), DisplayTree::new("div"));
        let frames = vec![
            frame(&json!({ "seq": 1, "type": "request", "command": "resize", "arguments": { "width": 2400 } })),
            frame(&json!({ "seq": 2, "type": "request", "command": "toggleCodePosition" })),
            frame(&json!({ "seq": 3, "type": "request", "command": "resize", "arguments": { "width": 2400 } })),
        ];

        let out = run_frames(&mut showcase, &frames);

        assert_eq!(out.len(), 4);
        assert_eq!(out[0]["body"]["sizing"], Value::Null);
        assert_eq!(out[1]["body"]["placement"], "sideBySide");
        assert_eq!(out[1]["body"]["relocation"]["serverCodeParent"], "server-r-code-tab");
        assert_eq!(out[2]["event"], "layout");
        assert_eq!(out[3]["body"]["sizing"]["appWidth"], 1200.0);
    }

    #[test]
    fn test_console_session() {
        let config = ShowcaseConfig::default();
        let tree = render_source(
            "x <- rnorm(100)\nhist(x)\n",
            &config.code_root_id,
            &config.wrapper_tag,
            Tokenize::Words,
        )
        .expect("renders");
        let mut showcase = Showcase::new(config, tree);
        let input = Cursor::new("hl 2 0 2 0 0 3\nhl \"2,0,2,0,0,3\"\nhl 1 2\nshow\ntoggle\nresize 800\nquit\nshow\n");
        let mut out = Vec::new();

        run_console(&mut showcase, input, &mut out).expect("console runs");

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("marked 2,0,2,0,0,3"), "{out}");
        assert!(out.contains("pulsed 2,0,2,0,0,3"), "{out}");
        assert!(out.contains("expected 6 integers, got 2"), "{out}");
        assert!(out.contains("x <- rnorm(100)\n⟦hist⟧(x)\n"), "{out}");
        assert!(out.contains("placement SideBySide"), "{out}");
        assert!(out.contains("app width 528px, zoom 0.55"), "{out}");
        assert_eq!(out.matches("⟦hist⟧").count(), 1, "{out}");
    }

    #[test]
    fn test_highlight_srcref_entry_point_is_best_effort() {
        let mut showcase = Showcase::new(ShowcaseConfig::default(), DisplayTree::new("div"));
        let before = showcase.tree().node_count();

        assert!(showcase.highlight_srcref(&SourceRef([1, 0, 1, 0, 0, 1])).is_err());
        assert_eq!(showcase.tree().node_count(), before);
        assert_eq!(showcase.effects().active_count(), 0);
    }
}
