use tracing::{debug, info};

use crate::config::Config;
use crate::engine::{EngineFactory, ModelRouter, RemoteEngineFactory};
use crate::error::Result;
use crate::lang::{Language, LanguagePair};
use crate::metrics::{self, TranslationMetrics};
use crate::transliterate;

/// One translation request as submitted by the presentation layer.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub source: Language,
    pub target: Language,
    pub use_transliteration: bool,
    pub reference: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source: Language, target: Language) -> Self {
        Self {
            text: text.into(),
            source,
            target,
            use_transliteration: false,
            reference: None,
        }
    }

    pub fn with_transliteration(mut self, use_transliteration: bool) -> Self {
        self.use_transliteration = use_transliteration;
        self
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference.filter(|r| !r.trim().is_empty());
        self
    }
}

/// Completed translation with the models used and optional metrics.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub translation: String,
    pub model_name: Option<String>,
    pub metrics: TranslationMetrics,
}

impl TranslationOutcome {
    fn passthrough(text: String) -> Self {
        Self {
            translation: text,
            model_name: None,
            metrics: TranslationMetrics::absent(),
        }
    }
}

/// The single entry point combining routing, transliteration and metrics.
pub struct Translator {
    router: ModelRouter,
}

impl Translator {
    pub fn new(config: &Config) -> Self {
        Self::with_factory(config, Box::new(RemoteEngineFactory::new(&config.inference)))
    }

    pub fn with_factory(config: &Config, factory: Box<dyn EngineFactory>) -> Self {
        Self {
            router: ModelRouter::new(config.router.clone(), factory),
        }
    }

    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    pub async fn translate(&mut self, request: &TranslationRequest) -> Result<TranslationOutcome> {
        if request.text.trim().is_empty() {
            return Ok(TranslationOutcome::passthrough(String::new()));
        }

        if request.source == request.target {
            debug!("Source and target language match, returning input unchanged");
            return Ok(TranslationOutcome::passthrough(request.text.clone()));
        }

        let (translation, model_name) = if self.should_transliterate(request) {
            info!(
                "Transliterating romanized input to {} script",
                request.target
            );
            (
                transliterate::to_script(&request.text, request.target),
                transliterate::SCHEME_NAME.to_string(),
            )
        } else {
            let pair = LanguagePair::new(request.source, request.target);
            let engine = self.router.route(pair)?;
            let translation = engine.translate(&request.text).await?;
            (translation, engine.name().to_string())
        };

        let metrics = metrics::evaluate(&translation, request.reference.as_deref());

        Ok(TranslationOutcome {
            translation,
            model_name: Some(model_name),
            metrics,
        })
    }

    /// Transliteration applies to ASCII English->Indic input when requested
    /// or when the text carries romanized hint tokens.
    fn should_transliterate(&self, request: &TranslationRequest) -> bool {
        request.source == Language::English
            && request.target.uses_devanagari()
            && request.text.is_ascii()
            && (request.use_transliteration || transliterate::looks_romanized(&request.text))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::{MockTranslationEngine, TranslationEngine};

    struct EchoFactory {
        reply: String,
    }

    impl EngineFactory for EchoFactory {
        fn create(&self, model: &str, _pair: LanguagePair) -> Arc<dyn TranslationEngine> {
            let mut engine = MockTranslationEngine::new();
            engine.expect_name().return_const(model.to_string());
            let reply = self.reply.clone();
            engine
                .expect_translate()
                .returning(move |_| Ok(reply.clone()));
            Arc::new(engine)
        }
    }

    fn translator_with_reply(reply: &str) -> Translator {
        Translator::with_factory(
            &Config::default(),
            Box::new(EchoFactory {
                reply: reply.to_string(),
            }),
        )
    }

    #[tokio::test]
    async fn test_empty_input_is_empty_outcome() {
        let mut translator = translator_with_reply("unused");
        let request = TranslationRequest::new("   ", Language::English, Language::Hindi);
        let outcome = translator.translate(&request).await.unwrap();
        assert_eq!(outcome.translation, "");
        assert!(outcome.model_name.is_none());
        assert!(!outcome.metrics.any_present());
    }

    #[tokio::test]
    async fn test_same_language_is_identity() {
        let mut translator = translator_with_reply("unused");
        let request = TranslationRequest::new("hello", Language::English, Language::English);
        let outcome = translator.translate(&request).await.unwrap();
        assert_eq!(outcome.translation, "hello");
        assert!(outcome.model_name.is_none());
        assert!(!outcome.metrics.any_present());
    }

    #[tokio::test]
    async fn test_explicit_transliteration() {
        let mut translator = translator_with_reply("unused");
        let request = TranslationRequest::new("Namastey", Language::English, Language::Hindi)
            .with_transliteration(true);
        let outcome = translator.translate(&request).await.unwrap();
        assert_eq!(outcome.translation, "नमस्ते");
        assert_eq!(
            outcome.model_name.as_deref(),
            Some("transliteration(ITRANS)")
        );
    }

    #[tokio::test]
    async fn test_hint_vocabulary_triggers_transliteration() {
        let mut translator = translator_with_reply("unused");
        let request = TranslationRequest::new("Namaste", Language::English, Language::Hindi);
        let outcome = translator.translate(&request).await.unwrap();
        assert_eq!(outcome.translation, "नमस्ते");
        assert!(outcome.model_name.unwrap().contains("transliteration"));
    }

    #[tokio::test]
    async fn test_devanagari_input_uses_model_path() {
        let mut translator = translator_with_reply("hello");
        let request = TranslationRequest::new("नमस्ते", Language::Hindi, Language::English);
        let outcome = translator.translate(&request).await.unwrap();
        assert_eq!(outcome.translation, "hello");
        assert_eq!(
            outcome.model_name.as_deref(),
            Some("Helsinki-NLP/opus-mt-hi-en")
        );
    }

    #[tokio::test]
    async fn test_reference_attaches_metrics() {
        let mut translator = translator_with_reply("नमस्ते");
        let request = TranslationRequest::new("Hello", Language::English, Language::Hindi)
            .with_reference(Some("नमस्ते".to_string()));
        let outcome = translator.translate(&request).await.unwrap();
        // bleu and ter are always computed against a non-empty reference;
        // meteor depends on the feature flag
        assert!(outcome.metrics.bleu.is_some());
        assert!(outcome.metrics.ter.is_some());
        assert_eq!(outcome.metrics.meteor.is_some(), cfg!(feature = "meteor"));
    }

    #[tokio::test]
    async fn test_pivot_pair_reports_joined_model_names() {
        let mut translator = translator_with_reply("anything");
        let request = TranslationRequest::new("कुछ पाठ", Language::Hindi, Language::Marathi);
        let outcome = translator.translate(&request).await.unwrap();
        assert_eq!(
            outcome.model_name.as_deref(),
            Some("Helsinki-NLP/opus-mt-hi-en + Helsinki-NLP/opus-mt-en-mr")
        );
    }
}
