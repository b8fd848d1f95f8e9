//! Voice webhook proxy.
//!
//! Browsers cannot post to the workflow webhook directly (CORS), so the
//! multipart body is relayed as is, content type included.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::Serialize;

#[derive(Clone)]
pub struct VoiceProxyState {
    client: Client,
    upstream_url: String,
}

impl VoiceProxyState {
    pub fn new(client: Client, upstream_url: impl Into<String>) -> Self {
        Self {
            client,
            upstream_url: upstream_url.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProxyErrorResponse {
    pub error: String,
    pub details: String,
}

/// POST /api/voice-webhook
pub async fn forward_voice_note(
    State(state): State<VoiceProxyState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut request = state.client.post(&state.upstream_url).body(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        request = request.header(header::CONTENT_TYPE.as_str(), content_type.as_bytes());
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "voice proxy could not reach upstream");
            return internal_error(e.to_string());
        }
    };

    let status = response.status().as_u16();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "voice proxy failed reading upstream body");
            return internal_error(e.to_string());
        }
    };

    if !(200..300).contains(&status) {
        tracing::warn!(status, "voice upstream returned an error");
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        return (
            status,
            Json(ProxyErrorResponse {
                error: format!("upstream error: {}", status.as_u16()),
                details: text,
            }),
        )
            .into_response();
    }

    (StatusCode::OK, text).into_response()
}

fn internal_error(details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ProxyErrorResponse {
            error: "Internal Server Error".to_string(),
            details,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/hook", addr)
    }

    fn app(upstream_url: String) -> Router {
        super::super::voice_routes(VoiceProxyState::new(Client::new(), upstream_url))
    }

    async fn post_body(app: Router, content_type: &str, body: &'static str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::post("/api/voice-webhook")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn relays_body_and_content_type() {
        let upstream = Router::new().route(
            "/hook",
            post(|headers: HeaderMap, body: String| async move {
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("{}|{}", content_type, body)
            }),
        );
        let url = spawn_upstream(upstream).await;

        let (status, body) = post_body(app(url), "text/plain", "bonjour").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "text/plain|bonjour");
    }

    #[tokio::test]
    async fn upstream_error_keeps_status() {
        let upstream = Router::new().route(
            "/hook",
            post(|| async { (StatusCode::NOT_FOUND, "no such workflow") }),
        );
        let url = spawn_upstream(upstream).await;

        let (status, body) = post_body(app(url), "text/plain", "x").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "upstream error: 404");
        assert_eq!(json["details"], "no such workflow");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_500() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());
        drop(listener);

        let (status, body) = post_body(app(url), "text/plain", "x").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Internal Server Error");
    }
}
