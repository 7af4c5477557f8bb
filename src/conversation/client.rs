//! One dialogue with the web app.

use super::convert::{build_request, new_message_id, parse_reply, reply_error, reply_text};
use super::error::SendError;
use crate::client::ChatGpt;
use crate::http::lines;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use tokio::sync::mpsc;
use tracing::Instrument;

/// A dialogue thread: the conversation id plus the id of the last message.
///
/// Sending takes `&mut self`; one conversation handles one message at a time.
#[derive(Debug)]
pub struct Conversation {
    client: ChatGpt,
    conversation_id: Option<String>,
    parent_message_id: Option<String>,
}

impl Conversation {
    pub(crate) fn new(
        client: ChatGpt,
        conversation_id: Option<String>,
        parent_message_id: Option<String>,
    ) -> Self {
        Self {
            client,
            conversation_id,
            parent_message_id,
        }
    }

    /// Id assigned by the service after the first exchange.
    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Id of the last message in the thread; the next message replies to it.
    #[must_use]
    pub fn parent_message_id(&self) -> Option<&str> {
        self.parent_message_id.as_deref()
    }

    /// Send a message and wait for the complete reply.
    pub async fn send_message(&mut self, text: &str) -> Result<String, SendError> {
        let span = self.client.span().clone();
        self.exchange(text, None).instrument(span).await
    }

    /// Send a message, forwarding each partial reply to `tx` as it streams in.
    ///
    /// Every forwarded value is the full reply so far. The returned text and
    /// the linkage update are the same as for [`send_message`](Self::send_message).
    pub async fn stream_message(
        &mut self,
        text: &str,
        tx: &mpsc::Sender<String>,
    ) -> Result<String, SendError> {
        let span = self.client.span().clone();
        self.exchange(text, Some(tx)).instrument(span).await
    }

    async fn exchange(
        &mut self,
        text: &str,
        tx: Option<&mpsc::Sender<String>>,
    ) -> Result<String, SendError> {
        // Root of the dialogue tree on the first message. Only committed on success.
        let parent_message_id = self
            .parent_message_id
            .clone()
            .unwrap_or_else(new_message_id);

        let token = self.client.ensure_valid_token().await?;

        let request = build_request(
            text,
            &parent_message_id,
            self.client.model(),
            self.conversation_id.as_deref(),
        );
        let body = serde_json::to_vec(&request).map_err(SendError::Encode)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token.authorization().clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(COOKIE, self.client.clearance_cookie().clone());

        let url = self.client.conversation_url();
        tracing::debug!(
            conversation_id = ?self.conversation_id,
            %parent_message_id,
            "Sending message"
        );

        let response = self
            .client
            .http()
            .post(url, headers, body)
            .await
            .map_err(|source| SendError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "Conversation request rejected");
            return Err(SendError::Status { status, body });
        }

        let mut payloads = lines::from_response(response);
        let mut last = String::new();
        let mut streamed = String::new();
        while let Some(payload) = payloads.next_payload().await.map_err(SendError::BodyRead)? {
            if let Some(tx) = tx {
                match parse_reply(&payload) {
                    Ok(reply) => {
                        if let Some(partial) = reply_text(&reply)
                            && partial != streamed
                        {
                            streamed = partial.to_string();
                            let _ = tx.send(streamed.clone()).await;
                        }
                    }
                    Err(e) => tracing::debug!("Skipping unparseable stream event: {e}"),
                }
            }
            last = payload;
        }
        drop(payloads);

        let reply = parse_reply(&last).map_err(|source| SendError::Decode {
            source,
            payload: last.clone(),
        })?;

        if let Some(message) = reply_error(&reply) {
            return Err(SendError::Remote { message });
        }
        let answer = reply_text(&reply).ok_or(SendError::EmptyReply)?.to_string();

        let Some(message) = reply.message else {
            return Err(SendError::EmptyReply);
        };
        self.parent_message_id = Some(message.id);
        if let Some(conversation_id) = reply.conversation_id.filter(|id| !id.is_empty()) {
            self.conversation_id = Some(conversation_id);
        }

        tracing::debug!(
            conversation_id = ?self.conversation_id,
            parent_message_id = ?self.parent_message_id,
            "Received reply"
        );
        Ok(answer)
    }
}
