use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::CompareConfig;
use crate::error::{AnuvadError, Result};
use crate::lang::Language;

/// Side-by-side result of our translation and the external service's.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub ours: String,
    pub google: String,
}

/// Client for the unofficial Google Translate endpoint, used only for
/// side-by-side comparison. Failures never propagate out of `compare`.
pub struct GoogleCompare {
    client: Client,
    config: CompareConfig,
}

impl GoogleCompare {
    pub fn new(config: CompareConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Translate through the external service. Errors propagate; callers
    /// wanting the degraded behavior use `compare`.
    pub async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        if !self.config.enabled {
            return Err(AnuvadError::Translation(
                "comparison disabled in configuration".to_string(),
            ));
        }

        let encoded_text = form_urlencoded::byte_serialize(text.as_bytes()).collect::<String>();
        let url = format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.config.endpoint,
            source.code(),
            target.code(),
            encoded_text
        );

        debug!("Requesting comparison translation for {} -> {}", source, target);

        let response = self
            .client
            .get(&url)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnuvadError::Translation(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;

        parse_translation(&json).ok_or_else(|| {
            AnuvadError::Translation("Invalid response format from Google Translate".to_string())
        })
    }

    /// Compare our translation with the external service's, degrading to a
    /// human-readable unavailability string on any failure.
    pub async fn compare(
        &self,
        text: &str,
        source: Language,
        target: Language,
        our_translation: &str,
    ) -> Comparison {
        let google = match self.translate(text, source, target).await {
            Ok(translation) => translation,
            Err(e) => {
                warn!("Comparison service unavailable: {}", e);
                format!("Google Translate unavailable: {}", e)
            }
        };

        Comparison {
            ours: our_translation.to_string(),
            google,
        }
    }
}

/// The endpoint answers with nested arrays; translated chunks sit at
/// `[0][i][0]` and concatenate to the full translation.
fn parse_translation(json: &Value) -> Option<String> {
    let translations = json.get(0)?.as_array()?;

    let mut result = String::new();
    for translation in translations {
        if let Some(text) = translation.get(0).and_then(|v| v.as_str()) {
            result.push_str(text);
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

/// True when a stored comparison column holds an unavailability marker
/// rather than a real translation.
pub fn is_unavailable(google_translation: &str) -> bool {
    let lower = google_translation.to_lowercase();
    lower.is_empty() || lower.starts_with("unavailable") || lower.starts_with("google translate unavailable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translation_concatenates_chunks() {
        let json: Value = serde_json::from_str(
            r#"[[["नमस्ते ","Hello ",null],["दुनिया","world",null]],null,"en"]"#,
        )
        .unwrap();
        assert_eq!(parse_translation(&json).unwrap(), "नमस्ते दुनिया");
    }

    #[test]
    fn test_parse_translation_rejects_malformed_payload() {
        let json: Value = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert!(parse_translation(&json).is_none());
    }

    #[tokio::test]
    async fn test_disabled_comparison_degrades_to_string() {
        let compare = GoogleCompare::new(CompareConfig {
            enabled: false,
            endpoint: "https://example.invalid".to_string(),
        });
        let result = compare
            .compare("Hello", Language::English, Language::Hindi, "नमस्ते")
            .await;
        assert_eq!(result.ours, "नमस्ते");
        assert!(result.google.starts_with("Google Translate unavailable:"));
    }

    #[test]
    fn test_is_unavailable_markers() {
        assert!(is_unavailable(""));
        assert!(is_unavailable("unavailable"));
        assert!(is_unavailable("Google Translate unavailable: timeout"));
        assert!(!is_unavailable("नमस्ते"));
    }
}
