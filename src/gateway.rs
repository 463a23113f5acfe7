use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status={status} body={body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Shape(String),
}

/// The two upstream calls the orchestrator needs. `GatewayClient` is the real
/// implementation; tests substitute scripted fakes.
#[async_trait]
pub trait OutfitGateway: Send + Sync {
    /// Sends one user message to the text model and returns the reply text.
    async fn complete_text(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Asks the image model for a picture. `Ok(None)` means the call succeeded
    /// but the reply carried no image.
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GatewayError>;
}

// Shorten inline data URLs so image replies don't flood the logs
fn truncate_data_urls_in_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "url" {
                    if let serde_json::Value::String(s) = val {
                        if s.len() > 100 && s.starts_with("data:") {
                            *val = serde_json::Value::String(preview(s, 50));
                        }
                    }
                } else {
                    truncate_data_urls_in_json(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_data_urls_in_json(val);
            }
        }
        _ => {}
    }
}

/// First `max` characters of `s`, with the total length noted when cut.
pub(crate) fn preview(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...[{} chars total]", &s[..idx], s.len()),
        None => s.to_string(),
    }
}

/// Client for an OpenAI-compatible chat-completions gateway.
pub struct GatewayClient {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GatewayClient {
    pub fn new(api_key: String, config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        }
    }

    async fn perform_api_call(
        &self,
        request_body: serde_json::Value,
    ) -> Result<ChatResponse, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("🔗 Making request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        info!("📥 Gateway response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!("❌ AI gateway error: {} {}", status, error_body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let response_text = response.text().await?;

        let logged = if response_text.len() > 1000 {
            match serde_json::from_str::<serde_json::Value>(&response_text) {
                Ok(mut json_value) => {
                    truncate_data_urls_in_json(&mut json_value);
                    json_value.to_string()
                }
                Err(_) => preview(&response_text, 1000),
            }
        } else {
            response_text.clone()
        };
        debug!("📥 Raw gateway response: {}", logged);

        serde_json::from_str(&response_text)
            .map_err(|e| GatewayError::Shape(format!("parse error: {}", e)))
    }
}

#[async_trait]
impl OutfitGateway for GatewayClient {
    async fn complete_text(&self, prompt: &str) -> Result<String, GatewayError> {
        info!("Generating outfit text with model {}", self.text_model);
        let payload = json!({
            "model": self.text_model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let parsed = self.perform_api_call(payload).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GatewayError::Shape("no message content in response".into()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GatewayError> {
        info!("🎯 Generating image with prompt: {}", preview(prompt, 100));
        let payload = json!({
            "model": self.image_model,
            "messages": [{ "role": "user", "content": prompt }],
            "modalities": ["image", "text"],
        });

        let parsed = self.perform_api_call(payload).await?;
        let image_url = extract_first_image_url(parsed);
        match &image_url {
            Some(url) => info!(
                "🖼️ Extracted image from gateway response: {}",
                preview(url, 50)
            ),
            None => warn!("⚠️ No image data found in gateway response"),
        }
        Ok(image_url)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Message,
}

#[derive(Debug, Deserialize, Default)]
struct Message {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    images: Vec<ImagePart>,
}

#[derive(Debug, Deserialize)]
struct ImagePart {
    #[serde(default)]
    image_url: Option<ImageUrl>,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    url: String,
}

fn extract_first_image_url(resp: ChatResponse) -> Option<String> {
    resp.choices
        .into_iter()
        .next()?
        .message
        .images
        .into_iter()
        .next()?
        .image_url
        .map(|u| u.url)
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    type Seen = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    /// Spins up a fake gateway that records each request and replies with `reply`.
    async fn fake_gateway(status: StatusCode, reply: serde_json::Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let recorded = seen.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let recorded = recorded.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorded.lock().push((auth, body));
                    (status, Json(reply))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{}/v1", addr), seen)
    }

    fn client(base: &str) -> GatewayClient {
        GatewayClient::new("test-key".into(), &Config::for_gateway(Some("test-key"), base))
    }

    #[tokio::test]
    async fn complete_text_sends_model_and_bearer() {
        let (base, seen) = fake_gateway(
            StatusCode::OK,
            json!({ "choices": [{ "message": { "content": "hello [1]" } }] }),
        )
        .await;

        let text = client(&base).complete_text("style me").await.unwrap();
        assert_eq!(text, "hello [1]");

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer test-key"));
        assert_eq!(
            seen[0].1,
            json!({
                "model": "google/gemini-2.5-flash",
                "messages": [{ "role": "user", "content": "style me" }]
            })
        );
    }

    #[tokio::test]
    async fn complete_text_reports_upstream_status() {
        let (base, _) = fake_gateway(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "slow down" })).await;

        match client(&base).complete_text("x").await {
            Err(GatewayError::Status { status, body }) => {
                assert_eq!(status, 429);
                assert!(body.contains("slow down"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn complete_text_without_choices_is_shape_error() {
        let (base, _) = fake_gateway(StatusCode::OK, json!({ "choices": [] })).await;
        assert!(matches!(client(&base).complete_text("x").await, Err(GatewayError::Shape(_))));
    }

    #[tokio::test]
    async fn generate_image_requests_both_modalities() {
        let (base, seen) = fake_gateway(
            StatusCode::OK,
            json!({ "choices": [{ "message": {
                "content": null,
                "images": [{ "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }]
            } }] }),
        )
        .await;

        let url = client(&base).generate_image("a red coat").await.unwrap();
        assert_eq!(url.as_deref(), Some("data:image/png;base64,AAAA"));

        let body = &seen.lock()[0].1;
        assert_eq!(body["model"], "google/gemini-2.5-flash-image");
        assert_eq!(body["modalities"], json!(["image", "text"]));
        assert_eq!(body["messages"][0]["content"], "a red coat");
    }

    #[tokio::test]
    async fn generate_image_without_images_is_none() {
        let (base, _) = fake_gateway(
            StatusCode::OK,
            json!({ "choices": [{ "message": { "content": "sorry, text only" } }] }),
        )
        .await;
        assert_eq!(client(&base).generate_image("x").await.unwrap(), None);
    }

    #[test]
    fn data_urls_are_truncated_for_logging() {
        let long = format!("data:image/png;base64,{}", "A".repeat(500));
        let mut value = json!({ "choices": [{ "message": { "images": [{ "image_url": { "url": long } }] } }] });
        truncate_data_urls_in_json(&mut value);
        let url = value["choices"][0]["message"]["images"][0]["image_url"]["url"].as_str().unwrap();
        assert!(url.ends_with("[522 chars total]"));
        assert!(url.len() < 100);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("ééééé", 2), "éé...[10 chars total]");
    }
}
