//! Request building and reply interpretation.

use super::types::{ConversationReply, ConversationRequest, RequestContent, RequestMessage};
use serde_json::Value;

/// Build the request for one user turn.
pub(crate) fn build_request<'a>(
    text: &'a str,
    parent_message_id: &'a str,
    model: &'a str,
    conversation_id: Option<&'a str>,
) -> ConversationRequest<'a> {
    ConversationRequest {
        action: "next",
        messages: vec![RequestMessage {
            id: new_message_id(),
            role: "user",
            content: RequestContent {
                content_type: "text",
                parts: [text],
            },
        }],
        parent_message_id,
        model,
        conversation_id,
    }
}

/// Fresh random message id.
pub(crate) fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn parse_reply(payload: &str) -> Result<ConversationReply, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Logical error reported by the reply, if any.
///
/// `null` and `""` mean no error.
pub(crate) fn reply_error(reply: &ConversationReply) -> Option<String> {
    match reply.error.as_ref()? {
        Value::Null => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Answer text: the first content part.
pub(crate) fn reply_text(reply: &ConversationReply) -> Option<&str> {
    reply.message.as_ref()?.content.parts.first().map(String::as_str)
}
