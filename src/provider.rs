use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::config::validate_api_key;
use crate::error::{GatewayError, Result};
use crate::models::{
    GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig, PuzzleRequest,
};
use crate::prompts::{RESPONSE_MIME_TYPE, TEMPERATURE, TOP_K, TOP_P};

/// Something that can turn a puzzle request into puzzle JSON.
#[async_trait]
pub trait PuzzleGenerator: Send + Sync {
    async fn generate(&self, req: &PuzzleRequest) -> Result<Vec<u8>>;
}

// Gemini generateContent client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn build_request(req: &PuzzleRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: req.game_type.prompt(req),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE.to_string(),
                response_schema: req.game_type.response_schema(),
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        }
    }
}

#[async_trait]
impl PuzzleGenerator for GeminiClient {
    async fn generate(&self, req: &PuzzleRequest) -> Result<Vec<u8>> {
        // startup already checked this, but never send a placeholder upstream
        validate_api_key(&self.api_key)?;

        let body = Self::build_request(req);
        let prompt = &body.contents[0].parts[0].text;
        tracing::debug!(
            "calling Gemini with prompt (truncated): {}...",
            prompt.chars().take(100).collect::<String>()
        );

        let url = Url::parse_with_params(&self.endpoint, &[("key", self.api_key.as_str())])
            .map_err(|e| {
                GatewayError::Config(format!("invalid Gemini endpoint {}: {}", self.endpoint, e))
            })?;

        // the url carries the key, strip it from transport errors
        let res = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.without_url()))?;
        let status = res.status();
        let raw = res
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.without_url()))?;

        if status != StatusCode::OK {
            return Err(GatewayError::ProviderStatus {
                status: status.as_u16(),
                body: raw,
            });
        }

        let envelope: GeminiResponse = serde_json::from_str(&raw)
            .map_err(|source| GatewayError::MalformedResponse {
                source,
                raw: raw.clone(),
            })?;

        let text = match envelope.first_text() {
            Some(text) => text.as_bytes().to_vec(),
            None => return Err(GatewayError::EmptyResponse { raw }),
        };

        tracing::debug!("Gemini response received ({} bytes)", text.len());
        Ok(text)
    }
}
