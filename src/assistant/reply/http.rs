//! HTTP implementation of the reply service.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::assistant::core::config::ReplyConfig;
use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::reply::service::{ReplyFuture, ReplyService};

#[derive(Serialize)]
struct ReplyRequest<'a> {
    message: &'a str,
}

/// Reply service reached through `POST {endpoint}` with a JSON body.
pub struct HttpReplyService {
    client: Client,
    endpoint: Url,
}

impl HttpReplyService {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not a URL or the HTTP client cannot be built.
    pub fn new(config: &ReplyConfig) -> AssistantResult<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint this client posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_message(&self, text: &str) -> AssistantResult<Value> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ReplyRequest { message: text })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "reply service returned an error status"
            );
            return Err(AssistantError::ReplyStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint = %self.endpoint, bytes = body.len(), "reply received");
        // Plain-text bodies are passed through as a bare string reply.
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body)))
    }
}

impl ReplyService for HttpReplyService {
    fn send_reply(&self, text: String) -> ReplyFuture<'_> {
        Box::pin(async move { self.post_message(&text).await })
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    async fn echo(Json(body): Json<Value>) -> Json<Value> {
        let message = body["message"].as_str().unwrap_or_default().to_string();
        Json(json!({ "data": { "reply": format!("echo: {message}") } }))
    }

    async fn plain() -> &'static str {
        "plain text reply"
    }

    async fn broken() -> (StatusCode, &'static str) {
        (StatusCode::BAD_GATEWAY, "upstream down")
    }

    async fn spawn_server() -> SocketAddr {
        let app = Router::new()
            .route("/echo", post(echo))
            .route("/plain", post(plain))
            .route("/broken", post(broken));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    fn service_for(addr: SocketAddr, path: &str) -> HttpReplyService {
        let config = ReplyConfig {
            endpoint: format!("http://{addr}{path}"),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
        };
        HttpReplyService::new(&config).expect("build reply client")
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let config = ReplyConfig {
            endpoint: "not a url".to_string(),
            ..ReplyConfig::default()
        };
        assert!(matches!(
            HttpReplyService::new(&config),
            Err(AssistantError::Url(_))
        ));
    }

    #[tokio::test]
    async fn test_json_reply_is_returned_raw() {
        let addr = spawn_server().await;
        let service = service_for(addr, "/echo");

        let raw = service.send_reply("How do I register?".to_string()).await;

        assert_eq!(
            raw.expect("reply"),
            json!({ "data": { "reply": "echo: How do I register?" } })
        );
    }

    #[tokio::test]
    async fn test_plain_body_becomes_string() {
        let addr = spawn_server().await;
        let service = service_for(addr, "/plain");

        let raw = service.send_reply("hi".to_string()).await;

        assert_eq!(raw.expect("reply"), json!("plain text reply"));
    }

    #[tokio::test]
    async fn test_error_status_is_rejected() {
        let addr = spawn_server().await;
        let service = service_for(addr, "/broken");

        let result = service.send_reply("hi".to_string()).await;

        match result {
            Err(AssistantError::ReplyStatus { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected ReplyStatus, got {other:?}"),
        }
    }
}
