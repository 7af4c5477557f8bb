//! Conversation endpoint wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct ConversationRequest<'a> {
    pub action: &'static str,
    pub messages: Vec<RequestMessage<'a>>,
    pub parent_message_id: &'a str,
    pub model: &'a str,
    /// Omitted entirely until the service has assigned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestMessage<'a> {
    pub id: String,
    pub role: &'static str,
    pub content: RequestContent<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestContent<'a> {
    pub content_type: &'static str,
    pub parts: [&'a str; 1],
}

/// One streamed reply event. Later events carry the full message so far.
#[derive(Debug, Deserialize)]
pub(crate) struct ConversationReply {
    #[serde(default)]
    pub message: Option<ReplyMessage>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyMessage {
    pub id: String,
    #[serde(default)]
    pub content: ReplyContent,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReplyContent {
    #[serde(default)]
    pub parts: Vec<String>,
}
