use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::{debug, info, trace, warn};

use super::protocol::{ShowcaseMessage, ShowcaseMessageContent};
use super::session::Showcase;
use crate::display::NodeSpec;
use crate::highlight::{HighlightOutcome, SourceRef};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
    #[error("frame is not a valid message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid Content-Length header {0:?}")]
    BadContentLength(String),
}

impl ProtocolError {
    /// Decode failures consume their whole frame, so the stream stays usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProtocolError::Decode(_))
    }
}

/// Whether the message loop keeps going after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Content-Length framed JSON messages over a reader/writer pair.
pub struct ShowcaseServer<R, W> {
    seq: u64,
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ShowcaseServer<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            seq: 0,
            reader,
            writer,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Reads the next frame; `Ok(None)` once the peer has closed the stream.
    pub fn read_message(&mut self) -> Result<Option<ShowcaseMessage>, ProtocolError> {
        let mut content_length = None;
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if content_length.is_some() {
                    break;
                }
                continue;
            }
            if let Some(value) = line.strip_prefix("Content-Length:") {
                let value = value.trim();
                let parsed = value
                    .parse::<usize>()
                    .map_err(|_| ProtocolError::BadContentLength(value.to_string()))?;
                content_length = Some(parsed);
            }
        }

        let mut buffer = vec![0u8; content_length.unwrap_or(0)];
        self.reader.read_exact(&mut buffer)?;
        Ok(Some(serde_json::from_slice(&buffer)?))
    }

    fn send_message(&mut self, msg: &ShowcaseMessage) -> io::Result<()> {
        let json = serde_json::to_string(msg)?;
        write!(self.writer, "Content-Length: {}\r\n\r\n{}", json.len(), json)?;
        self.writer.flush()?;
        trace!(bytes = json.len(), "sent frame");
        Ok(())
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        message: Option<String>,
        body: Option<Value>,
    ) -> io::Result<()> {
        let msg = ShowcaseMessage {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: ShowcaseMessageContent::Response {
                request_seq,
                success,
                command,
                message,
                body,
            },
        };
        self.send_message(&msg)
    }

    pub fn send_event(&mut self, event: &str, body: Option<Value>) -> io::Result<()> {
        let msg = ShowcaseMessage {
            seq: self.next_seq(),
            msg_type: "event".to_string(),
            content: ShowcaseMessageContent::Event {
                event: event.to_string(),
                body,
            },
        };
        self.send_message(&msg)
    }

    fn send_highlight_event(
        &mut self,
        showcase: &Showcase,
        srcref: &SourceRef,
        outcome: HighlightOutcome,
    ) -> io::Result<()> {
        let body = json!({
            "marker": showcase.highlighter().marker_id(srcref),
            "created": outcome.created(),
            "durationMs": showcase.highlighter().effect().duration.as_millis() as u64,
        });
        self.send_event("highlight", Some(body))
    }

    /// Applies one inbound message to the session.
    pub fn dispatch(&mut self, showcase: &mut Showcase, msg: ShowcaseMessage) -> io::Result<Flow> {
        match msg.content {
            ShowcaseMessageContent::Custom { handler, message } => {
                if handler == "reactlog" {
                    if let Some((srcref, outcome)) = showcase.on_reactlog(&message) {
                        self.send_highlight_event(showcase, &srcref, outcome)?;
                    }
                } else {
                    debug!(%handler, "no handler registered");
                }
                Ok(Flow::Continue)
            }
            ShowcaseMessageContent::Request { command, arguments } => {
                self.handle_request(showcase, msg.seq, command, arguments)
            }
            other => {
                warn!(?other, "ignoring non-request message");
                Ok(Flow::Continue)
            }
        }
    }

    fn handle_request(
        &mut self,
        showcase: &mut Showcase,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> io::Result<Flow> {
        let arg = |key: &str| arguments.as_ref().and_then(|v| v.get(key)).cloned();

        match command.as_str() {
            "loadCode" => self.handle_load_code(showcase, seq, command, arg("tree"))?,
            "highlightSrcref" => self.handle_highlight(showcase, seq, command, arg("srcref"))?,
            "toggleCodePosition" => {
                let relocation = showcase.layout_mut().toggle();
                let body = json!({
                    "placement": showcase.layout().placement(),
                    "relocation": relocation,
                });
                self.send_response(seq, command, true, None, Some(body.clone()))?;
                self.send_event("layout", Some(body))?;
            }
            "resize" => {
                let width = arg("width").and_then(|v| v.as_f64());
                let Some(width) = width else {
                    return self
                        .send_response(seq, command, false, Some("missing width".into()), None)
                        .map(|_| Flow::Continue);
                };
                let sizing = showcase.layout().on_resize(width);
                self.send_response(seq, command, true, None, Some(json!({ "sizing": sizing })))?;
            }
            "snapshot" => {
                let root = showcase.tree().root();
                let body = json!({
                    "tree": showcase.tree().to_spec(root),
                    "annotated": showcase.annotated_code(),
                });
                self.send_response(seq, command, true, None, Some(body))?;
            }
            "disconnect" => {
                self.send_response(seq, command, true, None, None)?;
                return Ok(Flow::Stop);
            }
            _ => {
                warn!(%command, "unhandled command");
                self.send_response(seq, command, false, Some("unknown command".into()), None)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn handle_load_code(
        &mut self,
        showcase: &mut Showcase,
        seq: u64,
        command: String,
        tree: Option<Value>,
    ) -> io::Result<()> {
        let spec = tree.map(serde_json::from_value::<NodeSpec>);
        match spec {
            Some(Ok(spec)) => match showcase.load(&spec) {
                Ok(()) => {
                    let body = json!({ "nodes": showcase.tree().node_count() });
                    self.send_response(seq, command, true, None, Some(body))
                }
                Err(err) => self.send_response(seq, command, false, Some(err.to_string()), None),
            },
            Some(Err(err)) => self.send_response(seq, command, false, Some(err.to_string()), None),
            None => self.send_response(seq, command, false, Some("missing tree".into()), None),
        }
    }

    fn handle_highlight(
        &mut self,
        showcase: &mut Showcase,
        seq: u64,
        command: String,
        srcref: Option<Value>,
    ) -> io::Result<()> {
        let srcref = match srcref.map(serde_json::from_value::<SourceRef>) {
            Some(Ok(srcref)) => srcref,
            Some(Err(err)) => {
                return self.send_response(seq, command, false, Some(err.to_string()), None)
            }
            None => {
                return self.send_response(seq, command, false, Some("missing srcref".into()), None)
            }
        };
        match showcase.highlight_srcref(&srcref) {
            Ok(outcome) => {
                let body = json!({
                    "marker": showcase.highlighter().marker_id(&srcref),
                    "created": outcome.created(),
                });
                self.send_response(seq, command, true, None, Some(body))?;
                self.send_highlight_event(showcase, &srcref, outcome)
            }
            Err(err) => self.send_response(seq, command, false, Some(err.to_string()), None),
        }
    }
}

/// Serves framed messages until the peer disconnects or the stream ends.
pub fn serve<R: BufRead, W: Write>(
    showcase: &mut Showcase,
    server: &mut ShowcaseServer<R, W>,
) -> Result<(), ProtocolError> {
    let mut count = 0u64;
    loop {
        let msg = match server.read_message() {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                info!(count, "peer closed the stream");
                return Ok(());
            }
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "skipping frame");
                continue;
            }
            Err(err) => return Err(err),
        };
        count += 1;
        trace!(seq = msg.seq, msg_type = %msg.msg_type, "received message");
        let flow = server.dispatch(showcase, msg)?;
        showcase.expire_effects();
        if flow == Flow::Stop {
            info!(count, "disconnect requested");
            return Ok(());
        }
    }
}
