use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::highlight::SourceRef;

#[derive(Debug, Serialize, Deserialize)]
pub struct ShowcaseMessage {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: ShowcaseMessageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShowcaseMessageContent {
    /// Message pushed by the app runtime to a named handler.
    Custom {
        handler: String,
        #[serde(default)]
        message: Value,
    },
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        message: Option<String>,
        body: Option<Value>,
    },
    Request {
        command: String,
        arguments: Option<Value>,
    },
    Event {
        event: String,
        body: Option<Value>,
    },
}

/// Payload of a `reactlog` custom message. Only entries that name a code
/// location carry `srcref`.
#[derive(Debug, Default, Deserialize)]
pub struct ReactLogEntry {
    #[serde(default)]
    pub srcref: Option<SourceRef>,
}

impl ReactLogEntry {
    pub fn from_value(message: &Value) -> Result<Self, serde_json::Error> {
        if message.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(message)
    }
}
