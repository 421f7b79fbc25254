use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::{EngineFactory, PivotEngine, TranslationEngine};
use crate::config::RouterConfig;
use crate::error::{AnuvadError, Result};
use crate::lang::{Language, LanguagePair};

/// Known direct pretrained models (Helsinki-NLP opus MT). Indic<->Indic
/// pairs have no direct model and pivot through English.
const DIRECT_MODELS: &[(&str, &str, &str)] = &[
    ("en", "hi", "Helsinki-NLP/opus-mt-en-hi"),
    ("hi", "en", "Helsinki-NLP/opus-mt-hi-en"),
    ("en", "mr", "Helsinki-NLP/opus-mt-en-mr"),
    ("mr", "en", "Helsinki-NLP/opus-mt-mr-en"),
];

/// Files whose presence marks a usable fine-tuned checkpoint directory.
const MODEL_ARTIFACTS: &[&str] = &["config.json", "pytorch_model.bin", "model.safetensors"];

/// Where a resolved model came from, in resolution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    EnvOverride(String),
    LocalFineTuned(PathBuf),
    Direct(&'static str),
    Pivot,
}

impl ModelSource {
    pub fn describe(&self) -> String {
        match self {
            ModelSource::EnvOverride(model) => format!("env override ({})", model),
            ModelSource::LocalFineTuned(path) => format!("fine-tuned ({})", path.display()),
            ModelSource::Direct(model) => format!("direct ({})", model),
            ModelSource::Pivot => "pivot via English".to_string(),
        }
    }
}

/// Resolves a language pair to a translation engine.
///
/// Resolution order: per-pair environment override, local fine-tuned
/// checkpoint directory, static direct-model table, then a two-hop pivot
/// through English. Resolved engines are cached for the process lifetime;
/// the pair set is small and fixed, so there is no eviction.
pub struct ModelRouter {
    config: RouterConfig,
    factory: Box<dyn EngineFactory>,
    cache: HashMap<LanguagePair, Arc<dyn TranslationEngine>>,
}

impl ModelRouter {
    pub fn new(config: RouterConfig, factory: Box<dyn EngineFactory>) -> Self {
        Self {
            config,
            factory,
            cache: HashMap::new(),
        }
    }

    /// Resolve an engine for the pair, caching the result.
    pub fn route(&mut self, pair: LanguagePair) -> Result<Arc<dyn TranslationEngine>> {
        if let Some(engine) = self.cache.get(&pair) {
            debug!("Engine cache hit for {}", pair);
            return Ok(engine.clone());
        }

        let engine = match self.resolve_direct(pair) {
            Some(model) => self.factory.create(&model, pair),
            None => self.build_pivot(pair)?,
        };

        info!("Resolved model for {}: {}", pair, engine.name());
        self.cache.insert(pair, engine.clone());
        Ok(engine)
    }

    /// How the pair would resolve, without creating an engine.
    pub fn resolution(&self, pair: LanguagePair) -> Result<ModelSource> {
        if let Some(model) = env_override(pair) {
            return Ok(ModelSource::EnvOverride(model));
        }
        if let Some(path) = self.local_fine_tuned(pair) {
            return Ok(ModelSource::LocalFineTuned(path));
        }
        if let Some(model) = direct_model(pair) {
            return Ok(ModelSource::Direct(model));
        }

        let to_bridge = LanguagePair::new(pair.source, Language::English);
        let from_bridge = LanguagePair::new(Language::English, pair.target);
        if self.can_resolve_direct(to_bridge) && self.can_resolve_direct(from_bridge) {
            Ok(ModelSource::Pivot)
        } else {
            Err(AnuvadError::ModelUnavailable(pair.to_string()))
        }
    }

    fn build_pivot(&mut self, pair: LanguagePair) -> Result<Arc<dyn TranslationEngine>> {
        let to_bridge = LanguagePair::new(pair.source, Language::English);
        let from_bridge = LanguagePair::new(Language::English, pair.target);

        // A hop that is itself pivot-only would recurse forever; both hops
        // must resolve to a concrete model.
        let first = self.route_direct(to_bridge)?;
        let second = self.route_direct(from_bridge)?;

        debug!(
            "No direct model for {}, pivoting: {} then {}",
            pair,
            first.name(),
            second.name()
        );

        Ok(Arc::new(PivotEngine::new(first, second)))
    }

    fn route_direct(&mut self, pair: LanguagePair) -> Result<Arc<dyn TranslationEngine>> {
        if let Some(engine) = self.cache.get(&pair) {
            return Ok(engine.clone());
        }

        let model = self
            .resolve_direct(pair)
            .ok_or_else(|| AnuvadError::ModelUnavailable(pair.to_string()))?;

        let engine = self.factory.create(&model, pair);
        self.cache.insert(pair, engine.clone());
        Ok(engine)
    }

    fn resolve_direct(&self, pair: LanguagePair) -> Option<String> {
        if let Some(model) = env_override(pair) {
            return Some(model);
        }
        if let Some(path) = self.local_fine_tuned(pair) {
            return Some(path.display().to_string());
        }
        direct_model(pair).map(|m| m.to_string())
    }

    fn can_resolve_direct(&self, pair: LanguagePair) -> bool {
        self.resolve_direct(pair).is_some()
    }

    /// Fine-tuned checkpoint directory for the pair, validated by the
    /// presence of a recognized model artifact file.
    fn local_fine_tuned(&self, pair: LanguagePair) -> Option<PathBuf> {
        let path = self.config.local_model_root.join(pair.dir_name());
        if !path.is_dir() {
            return None;
        }
        if MODEL_ARTIFACTS.iter().any(|f| path.join(f).exists()) {
            Some(path)
        } else {
            None
        }
    }
}

fn env_override(pair: LanguagePair) -> Option<String> {
    std::env::var(pair.override_var()).ok().filter(|v| !v.is_empty())
}

fn direct_model(pair: LanguagePair) -> Option<&'static str> {
    DIRECT_MODELS
        .iter()
        .find(|(src, tgt, _)| *src == pair.source.code() && *tgt == pair.target.code())
        .map(|(_, _, model)| *model)
}
