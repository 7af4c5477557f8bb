//! Local stand-in for the web app's session and conversation endpoints.

#![allow(dead_code)]

use chatgpt_web::{AccessToken, ChatGpt, ClientOptions, Endpoints};
use std::collections::VecDeque;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tiny_http::{Header, Response, Server};

pub const SESSION_PATH: &str = "/api/auth/session";
pub const CONVERSATION_PATH: &str = "/backend-api/conversation";
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) Test";

/// Canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Default)]
struct Routes {
    session: VecDeque<Reply>,
    conversation: VecDeque<Reply>,
}

impl Routes {
    /// Pop the next reply; the last one repeats.
    fn next(queue: &mut VecDeque<Reply>) -> Reply {
        if queue.len() > 1 {
            queue.pop_front().expect("non-empty queue")
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Reply::status(404, "no reply configured"))
        }
    }
}

pub struct MockServer {
    server: Arc<Server>,
    base_url: String,
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    session_hits: Arc<AtomicUsize>,
    conversation_hits: Arc<AtomicUsize>,
}

impl MockServer {
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock server"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("mock server listens on TCP")
            .port();

        let mock = Self {
            server: Arc::clone(&server),
            base_url: format!("http://127.0.0.1:{port}"),
            routes: Arc::default(),
            requests: Arc::default(),
            session_hits: Arc::default(),
            conversation_hits: Arc::default(),
        };

        let routes = Arc::clone(&mock.routes);
        let requests = Arc::clone(&mock.requests);
        let session_hits = Arc::clone(&mock.session_hits);
        let conversation_hits = Arc::clone(&mock.conversation_hits);
        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let recorded = Recorded {
                    method: request.method().to_string(),
                    path: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|h| (h.field.to_string(), h.value.to_string()))
                        .collect(),
                    body,
                };

                let (reply, content_type) = {
                    let mut routes = routes.lock().unwrap();
                    match recorded.path.as_str() {
                        SESSION_PATH => {
                            session_hits.fetch_add(1, Ordering::SeqCst);
                            (Routes::next(&mut routes.session), "application/json")
                        }
                        CONVERSATION_PATH => {
                            conversation_hits.fetch_add(1, Ordering::SeqCst);
                            (Routes::next(&mut routes.conversation), "text/event-stream")
                        }
                        _ => (Reply::status(404, "not found"), "text/plain"),
                    }
                };
                requests.lock().unwrap().push(recorded);

                let header = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
                    .expect("valid header");
                let response = Response::from_string(reply.body)
                    .with_status_code(reply.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        mock
    }

    pub fn on_session(&self, reply: Reply) -> &Self {
        self.routes.lock().unwrap().session.push_back(reply);
        self
    }

    pub fn on_conversation(&self, reply: Reply) -> &Self {
        self.routes.lock().unwrap().conversation.push_back(reply);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_hits(&self) -> usize {
        self.session_hits.load(Ordering::SeqCst)
    }

    pub fn conversation_hits(&self) -> usize {
        self.conversation_hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn options(&self) -> ClientOptions {
        ClientOptions::new("session-token", "clearance-token", USER_AGENT)
            .with_endpoints(Endpoints::with_base_url(&self.base_url))
    }

    pub fn client(&self) -> ChatGpt {
        ChatGpt::new(self.options()).expect("client builds")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

/// Session body with a token valid for another hour.
pub fn session_body(token: &str) -> String {
    let expires = chrono::Utc::now() + chrono::Duration::hours(1);
    serde_json::json!({
        "user": {"id": "user-1", "name": "Test", "email": "test@example.com", "image": "", "picture": "", "groups": [], "features": []},
        "expires": expires.to_rfc3339(),
        "accessToken": token,
    })
    .to_string()
}

/// Session body whose token has already expired.
pub fn expired_session_body(token: &str) -> String {
    let expires = chrono::Utc::now() - chrono::Duration::minutes(1);
    serde_json::json!({
        "expires": expires.to_rfc3339(),
        "accessToken": token,
    })
    .to_string()
}

/// A token that stays valid for the duration of a test.
pub fn fresh_token(token: &str) -> AccessToken {
    AccessToken::new(token, Some(chrono::Utc::now() + chrono::Duration::hours(1)))
        .expect("valid token")
}

/// One reply event.
pub fn reply_event(message_id: &str, text: &str, conversation_id: &str) -> String {
    serde_json::json!({
        "message": {
            "id": message_id,
            "role": "assistant",
            "content": {"content_type": "text", "parts": [text]},
        },
        "conversation_id": conversation_id,
        "error": null,
    })
    .to_string()
}

/// Event stream body: `data: ` lines separated by blank lines, ended by `[DONE]`.
pub fn event_stream<I, S>(payloads: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut body = String::new();
    for payload in payloads {
        body.push_str("data: ");
        body.push_str(payload.as_ref());
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}
