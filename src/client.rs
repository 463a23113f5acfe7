use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    models::{ErrorBody, Gender, GenerateRequest, GenerateResponse, Mood, Outfit},
    routes::GENERATE_PATH,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
}

/// What the wizard calls to turn a selection into outfits.
#[async_trait]
pub trait OutfitService: Send + Sync {
    async fn generate(&self, gender: Gender, mood: Mood) -> Result<Vec<Outfit>, ClientError>;
}

/// Talks to a running stylist server over HTTP.
pub struct HttpOutfitClient {
    client: Client,
    endpoint: String,
}

impl HttpOutfitClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH),
        }
    }
}

#[async_trait]
impl OutfitService for HttpOutfitClient {
    async fn generate(&self, gender: Gender, mood: Mood) -> Result<Vec<Outfit>, ClientError> {
        info!("Requesting outfits from {} for {} / {}", self.endpoint, gender, mood);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { gender, mood })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text).map(|b| b.error).unwrap_or(text);
            error!("Outfit generation failed: {} {}", status, message);
            return Err(ClientError::Server { status: status.as_u16(), message });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.outfits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gateway::OutfitGateway,
        orchestrator::tests::{three_outfits_reply, FakeGateway},
        routes::{create_router, AppState},
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    async fn serve(gateway: FakeGateway) -> String {
        let state = AppState { gateway: Some(Arc::new(gateway) as Arc<dyn OutfitGateway>) };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, create_router(state)).await.unwrap() });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn decodes_outfits_from_server() {
        let base = serve(FakeGateway::replying(three_outfits_reply())).await;
        let outfits = HttpOutfitClient::new(&base).generate(Gender::Female, Mood::Confident).await.unwrap();

        let titles: Vec<_> = outfits.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["Power Suit", "Smart Casual", "Evening Edge"]);
        assert!(outfits.iter().all(|o| o.image_url.is_some()));
        assert!(outfits.iter().all(|o| o.image_prompt.is_empty()));
    }

    #[tokio::test]
    async fn surfaces_server_error_message() {
        let base = serve(FakeGateway::failing(500)).await;
        match HttpOutfitClient::new(&base).generate(Gender::Male, Mood::Edgy).await {
            Err(ClientError::Server { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to generate outfits");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }
}
