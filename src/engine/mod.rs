// Modular translation engine architecture
//
// The engine boundary keeps model inference opaque:
// - Remote: JSON client for the inference endpoint serving pretrained models
// - Pivot: two-hop chain through a bridge language
// - Router: per-pair model resolution with a process-lifetime engine cache

pub mod remote;
pub mod router;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

pub use remote::RemoteEngine;
pub use router::ModelRouter;

use crate::config::InferenceConfig;
use crate::error::Result;
use crate::lang::LanguagePair;

/// Main trait for model inference operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Translate text for the language pair this engine was resolved for
    async fn translate(&self, text: &str) -> Result<String>;

    /// Model identifier reported back to the caller
    fn name(&self) -> &str;
}

/// Factory for creating engine instances for a resolved model
pub trait EngineFactory: Send + Sync {
    fn create(&self, model: &str, pair: LanguagePair) -> Arc<dyn TranslationEngine>;
}

/// Default factory backed by the configured inference endpoint
pub struct RemoteEngineFactory {
    client: Client,
    endpoint: String,
}

impl RemoteEngineFactory {
    pub fn new(config: &InferenceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }
}

impl EngineFactory for RemoteEngineFactory {
    fn create(&self, model: &str, pair: LanguagePair) -> Arc<dyn TranslationEngine> {
        Arc::new(RemoteEngine::new(
            self.client.clone(),
            self.endpoint.clone(),
            model.to_string(),
            pair,
        ))
    }
}

/// Two-hop engine chaining source->bridge and bridge->target models.
pub struct PivotEngine {
    first: Arc<dyn TranslationEngine>,
    second: Arc<dyn TranslationEngine>,
    name: String,
}

impl PivotEngine {
    pub fn new(first: Arc<dyn TranslationEngine>, second: Arc<dyn TranslationEngine>) -> Self {
        let name = format!("{} + {}", first.name(), second.name());
        Self {
            first,
            second,
            name,
        }
    }
}

#[async_trait]
impl TranslationEngine for PivotEngine {
    async fn translate(&self, text: &str) -> Result<String> {
        let intermediate = self.first.translate(text).await?;
        self.second.translate(&intermediate).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
