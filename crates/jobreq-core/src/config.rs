//! JobReq Configuration Management
//!
//! Handles configuration from environment variables and TOML files with
//! defaults that work without any setup. Every tunable of the pipeline
//! (threshold, model, weights, pattern table, recommendation cap) lives here.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::library::{
    DEFAULT_INFERENCE_ENDPOINT, DEFAULT_LABEL_CATEGORIES, DEFAULT_LIST_ITEM_INDICATORS,
    DEFAULT_MODEL_ID, DEFAULT_PATTERN_LIBRARY, DEFAULT_REQUIREMENT_KEYWORDS,
};
use crate::RequirementCategory;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Entity recognition
    pub ner: NerConfig,

    /// Complexity scoring weights and bands
    pub scoring: ScoringConfig,

    /// Recommendation generation
    pub recommendations: RecommendationConfig,

    /// Sentence analysis and input limits
    pub extraction: ExtractionConfig,

    /// Category -> expression list
    pub patterns: PatternLibraryConfig,

    /// HTTP server
    pub server: ServerConfig,

    /// Logging
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Entity recognition
        if let Ok(backend) = std::env::var("JOBREQ_NER_BACKEND") {
            self.ner.backend = backend.parse()?;
        }
        if let Ok(model) = std::env::var("JOBREQ_MODEL_ID") {
            self.ner.model_id = model;
        }
        if let Ok(endpoint) = std::env::var("JOBREQ_NER_ENDPOINT") {
            self.ner.endpoint = endpoint;
        }
        if let Ok(token) = std::env::var("JOBREQ_API_TOKEN") {
            self.ner.api_token = Some(token);
        }
        if let Ok(confidence) = std::env::var("JOBREQ_CONFIDENCE") {
            self.ner.confidence_threshold =
                confidence.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "JOBREQ_CONFIDENCE".to_string(),
                    value: confidence,
                })?;
        }

        // Extraction
        if let Ok(max_len) = std::env::var("JOBREQ_MAX_TEXT_LENGTH") {
            self.extraction.max_text_length =
                max_len.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "JOBREQ_MAX_TEXT_LENGTH".to_string(),
                    value: max_len,
                })?;
        }

        // Server
        if let Ok(host) = std::env::var("JOBREQ_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("JOBREQ_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "JOBREQ_PORT".to_string(),
                value: port,
            })?;
        }

        // Logging
        if let Ok(level) = std::env::var("JOBREQ_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Check numeric ranges and table shapes.
    ///
    /// Pattern expressions are compiled (and rejected) by the extractor when
    /// it is built, which also happens before any extraction call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.ner.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidValue {
                key: "ner.confidence_threshold".to_string(),
                value: threshold.to_string(),
            });
        }

        for (category, weight) in &self.scoring.category_weights {
            check_weight(&format!("scoring.category_weights.{category}"), *weight)?;
        }
        check_weight("scoring.diversity_weight", self.scoring.diversity_weight)?;
        check_weight("scoring.density_weight", self.scoring.density_weight)?;

        let bands = (self.scoring.medium_band_min, self.scoring.high_band_min);
        if !(bands.0.is_finite() && bands.1.is_finite() && bands.0 <= bands.1) {
            return Err(ConfigError::InvalidValue {
                key: "scoring.medium_band_min/high_band_min".to_string(),
                value: format!("{}/{}", bands.0, bands.1),
            });
        }

        if self.patterns.rules.values().all(Vec::is_empty) {
            return Err(ConfigError::MissingRequired("patterns".to_string()));
        }

        if self.extraction.max_text_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "extraction.max_text_length".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}

fn check_weight(key: &str, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: weight.to_string(),
        })
    }
}

/// Entity recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Which recognizer to run
    pub backend: NerBackend,

    /// Hosted model identifier
    pub model_id: String,

    /// Base URL of the inference service (model id is appended)
    pub endpoint: String,

    /// Bearer token for the inference service
    pub api_token: Option<String>,

    /// Minimum confidence for an entity to be kept, in [0, 1]
    pub confidence_threshold: f64,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Recognizer label -> category (unlisted labels map to `other`)
    pub label_categories: BTreeMap<String, RequirementCategory>,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            backend: NerBackend::Inference,
            model_id: DEFAULT_MODEL_ID.to_string(),
            endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            api_token: None,
            confidence_threshold: 0.7,
            timeout_secs: 30,
            label_categories: DEFAULT_LABEL_CATEGORIES
                .iter()
                .map(|(label, category)| (label.to_string(), *category))
                .collect(),
        }
    }
}

impl NerConfig {
    /// Backend that will actually run.
    ///
    /// The public hosted endpoint rejects anonymous calls, so `inference`
    /// against it without a token resolves to `dictionary`. Custom endpoints
    /// are used as configured.
    pub fn effective_backend(&self) -> NerBackend {
        let has_token = self
            .api_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty());
        let hosted = self.endpoint.trim_end_matches('/') == DEFAULT_INFERENCE_ENDPOINT;

        match self.backend {
            NerBackend::Inference if hosted && !has_token => NerBackend::Dictionary,
            backend => backend,
        }
    }
}

/// Supported recognizer backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NerBackend {
    /// Hosted token-classification model over HTTP
    Inference,
    /// Offline gazetteer
    Dictionary,
    /// No entity recognition (pattern-only results)
    Disabled,
}

impl std::str::FromStr for NerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inference" | "huggingface" => Ok(Self::Inference),
            "dictionary" => Ok(Self::Dictionary),
            "disabled" | "none" => Ok(Self::Disabled),
            _ => Err(ConfigError::InvalidValue {
                key: "JOBREQ_NER_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Complexity scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points per requirement, by category
    pub category_weights: BTreeMap<RequirementCategory, f64>,

    /// Points per populated category
    pub diversity_weight: f64,

    /// Points per requirement per 100 words of input
    pub density_weight: f64,

    /// Scores at or above this are "medium"
    pub medium_band_min: f64,

    /// Scores at or above this are "high"
    pub high_band_min: f64,
}

impl ScoringConfig {
    /// Weight for a category (0 when unlisted)
    pub fn weight(&self, category: RequirementCategory) -> f64 {
        self.category_weights.get(&category).copied().unwrap_or(0.0)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let category_weights = [
            (RequirementCategory::TechnicalSkill, 0.35),
            (RequirementCategory::Experience, 0.5),
            (RequirementCategory::Education, 0.5),
            (RequirementCategory::SoftSkill, 0.2),
            (RequirementCategory::Certification, 0.6),
            (RequirementCategory::Tool, 0.25),
            (RequirementCategory::Other, 0.1),
        ]
        .into_iter()
        .collect();

        Self {
            category_weights,
            diversity_weight: 0.5,
            density_weight: 0.1,
            medium_band_min: 3.5,
            high_band_min: 7.0,
        }
    }
}

/// Recommendation generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Maximum number of per-category recommendations
    pub max_recommendations: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 4,
        }
    }
}

/// Sentence analysis and input limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keywords marking a sentence as requirement-bearing (case-insensitive)
    pub requirement_keywords: Vec<String>,

    /// Words that, besides the requirement keywords, make a list line an
    /// individual requirement (case-insensitive substring match)
    pub list_item_indicators: Vec<String>,

    /// Longest input (characters) accepted by the CLI, API and batch layers
    pub max_text_length: usize,
}

impl ExtractionConfig {
    /// Reject text longer than `max_text_length` characters
    pub fn check_length(&self, text: &str) -> crate::Result<()> {
        let length = text.chars().count();
        if length > self.max_text_length {
            return Err(crate::JobReqError::InvalidInput(format!(
                "text is too long ({length} characters, maximum is {})",
                self.max_text_length
            )));
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            requirement_keywords: DEFAULT_REQUIREMENT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            list_item_indicators: DEFAULT_LIST_ITEM_INDICATORS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            max_text_length: 10_000,
        }
    }
}

/// Pattern library: category -> ordered expression list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternLibraryConfig {
    pub rules: BTreeMap<RequirementCategory, Vec<String>>,
}

impl Default for PatternLibraryConfig {
    fn default() -> Self {
        Self {
            rules: DEFAULT_PATTERN_LIBRARY
                .iter()
                .map(|(category, expressions)| {
                    (*category, expressions.iter().map(|e| e.to_string()).collect())
                })
                .collect(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Enable permissive CORS
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_body_size: 1024 * 1024, // 1MB
            cors_enabled: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
