use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TranslationEngine;
use crate::error::{AnuvadError, Result};
use crate::lang::LanguagePair;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub model: String,
    pub text: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub translation: String,
}

/// Engine invoking one pretrained model by name or local checkpoint path
/// through the inference endpoint.
pub struct RemoteEngine {
    client: Client,
    endpoint: String,
    model: String,
    pair: LanguagePair,
}

impl RemoteEngine {
    pub fn new(client: Client, endpoint: String, model: String, pair: LanguagePair) -> Self {
        Self {
            client,
            endpoint,
            model,
            pair,
        }
    }
}

#[async_trait::async_trait]
impl TranslationEngine for RemoteEngine {
    async fn translate(&self, text: &str) -> Result<String> {
        let request = InferenceRequest {
            model: self.model.clone(),
            text: text.to_string(),
            source: self.pair.source.code().to_string(),
            target: self.pair.target.code().to_string(),
        };

        let url = format!("{}/translate", self.endpoint);

        debug!("Sending inference request for {} to: {}", self.pair, url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnuvadError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnuvadError::Translation(format!(
                "Inference API error {}: {}",
                status, error_text
            )));
        }

        let inference_response: InferenceResponse = response
            .json()
            .await
            .map_err(|e| AnuvadError::Translation(format!("Failed to parse response: {}", e)))?;

        let translation = inference_response.translation.trim().to_string();

        if translation.is_empty() {
            return Err(AnuvadError::Translation(
                "Empty translation received".to_string(),
            ));
        }

        Ok(translation)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
