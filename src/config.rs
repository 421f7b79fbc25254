use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AnuvadError, Result};

fn default_inference_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub router: RouterConfig,
    pub inference: InferenceConfig,
    pub compare: CompareConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Root directory holding fine-tuned checkpoints in `<src>-<tgt>` subdirectories
    pub local_model_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Inference server endpoint URL serving the pretrained models
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Whether side-by-side comparison against the external service is attempted
    pub enabled: bool,
    /// Unofficial translation endpoint URL
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the translation history file
    pub data_dir: PathBuf,
    /// Directory for evaluation output files
    pub out_dir: PathBuf,
}

impl StorageConfig {
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("historical.csv")
    }

    pub fn eval_results_path(&self) -> PathBuf {
        self.out_dir.join("eval_results.csv")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            router: RouterConfig {
                local_model_root: std::env::var("LOCAL_MODEL_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("models/local")),
            },
            inference: InferenceConfig {
                endpoint: "http://localhost:8080".to_string(),
                timeout_secs: default_inference_timeout(),
            },
            compare: CompareConfig {
                enabled: true,
                endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            },
            storage: StorageConfig {
                data_dir: std::env::var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("data")),
                out_dir: std::env::var("OUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("out")),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnuvadError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AnuvadError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AnuvadError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AnuvadError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
