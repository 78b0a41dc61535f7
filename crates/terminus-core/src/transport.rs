use crate::config::Config;
use crate::error::{Result, TerminusError};
use crate::paths;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// JSON request/response access to the management API. Paths are relative to
/// the API base (`sites/{id}`, `users/{id}/upstreams`).
pub trait Transport {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;

    fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body))
    }
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    session: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url(),
            session: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = paths::api_url(&self.base_url, path);
        tracing::debug!(%method, %url, "api request");

        let mut req = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.session {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send()?;
        let status = resp.status();
        let text = resp.text()?;
        tracing::debug!(status = status.as_u16(), bytes = text.len(), "api response");

        if status == StatusCode::NOT_FOUND {
            return Err(TerminusError::not_found("resource", path));
        }
        if !status.is_success() {
            return Err(TerminusError::Api {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Best-effort human message from an error body.
fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => ["message", "reason", "error"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
        _ => trimmed.to_string(),
    }
}

/// A transport pointed at a mockito server with the default `/api` base.
#[cfg(test)]
pub(crate) fn test_transport(server: &mockito::ServerGuard) -> HttpTransport {
    let host_port = server.host_with_port();
    let (host, port) = host_port.rsplit_once(':').unwrap();
    let config = Config {
        protocol: "http".to_string(),
        host: host.to_string(),
        port: port.parse().unwrap(),
        poll_interval_ms: 0,
        ..Config::default()
    };
    HttpTransport::new(&config).unwrap().with_session("test-session")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn get_sends_session_and_parses_json() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("GET", "/api/sites/abc")
            .match_header("authorization", "Bearer test-session")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc","name":"my-site"}"#)
            .create();

        let value = test_transport(&server).get("sites/abc").unwrap();
        assert_eq!(value, json!({"id": "abc", "name": "my-site"}));
        m.assert();
    }

    #[test]
    fn post_sends_json_body() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("POST", "/api/sites/abc/workflows")
            .match_body(Matcher::Json(json!({"type": "noop"})))
            .with_status(201)
            .with_body(r#"{"id":"wf"}"#)
            .create();

        let value = test_transport(&server)
            .post("sites/abc/workflows", &json!({"type": "noop"}))
            .unwrap();
        assert_eq!(value["id"], "wf");
        m.assert();
    }

    #[test]
    fn not_found_maps_to_not_found_error() {
        let mut server = mockito::Server::new();
        let _m = server.mock("GET", "/api/sites/nope").with_status(404).create();

        let err = test_transport(&server).get("sites/nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn server_error_carries_status_and_message() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/users/u1/upstreams")
            .with_status(403)
            .with_body(r#"{"message":"forbidden for you"}"#)
            .create();

        let err = test_transport(&server).get("users/u1/upstreams").unwrap_err();
        match err {
            TerminusError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 403);
                assert_eq!(message, "forbidden for you");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_success_body_is_null() {
        let mut server = mockito::Server::new();
        let _m = server.mock("DELETE", "/api/x").with_status(204).create();

        let value = test_transport(&server)
            .request(Method::DELETE, "x", None)
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("  "), "empty response body");
        assert_eq!(error_message("\"quoted\""), "quoted");
        assert_eq!(error_message(r#"{"reason":"bad"}"#), "bad");
        assert_eq!(error_message("<html>oops</html>"), "<html>oops</html>");
        assert_eq!(error_message(r#"{"code":1}"#), r#"{"code":1}"#);
    }
}
