//! JobReq Core - Domain models, errors, and configuration
//!
//! This crate defines the shared abstractions of the job requirements extractor:
//! - Requirement categories (closed set)
//! - Recognized entities and extracted snippets
//! - The analysis result and its serialized shape
//! - Common error types
//! - Configuration management and the default pattern library

pub mod analysis;
pub mod config;
pub mod library;

pub use analysis::{
    AnalysisResult, CategorizedRequirements, EntityExtractionStatus, ExtractionMetadata,
    RequirementSummary, Requirements,
};
pub use config::{
    AppConfig, ConfigError, ExtractionConfig, LoggingConfig, NerBackend, NerConfig,
    PatternLibraryConfig, RecommendationConfig, ScoringConfig, ServerConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for extraction operations
#[derive(Error, Debug)]
pub enum JobReqError {
    /// Malformed input or per-call argument (fatal to the call)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external recognition model could not be loaded or invoked
    #[error("Entity recognition model unavailable: {0}")]
    ModelUnavailable(String),

    /// Malformed pattern library, out-of-range threshold, bad weights
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JobReqError {
    /// Whether the pipeline may continue in degraded mode after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ModelUnavailable(_))
    }
}

impl From<ConfigError> for JobReqError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JobReqError>;

// ============================================================================
// Requirement Categories
// ============================================================================

/// Semantic bucket a requirement is sorted into.
///
/// The set is closed: labels that do not name one of these categories
/// normalize to [`RequirementCategory::Other`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    TechnicalSkill,
    Experience,
    Education,
    SoftSkill,
    Certification,
    Tool,
    #[default]
    Other,
}

impl RequirementCategory {
    /// Every category, in declaration order
    pub const ALL: [Self; 7] = [
        Self::TechnicalSkill,
        Self::Experience,
        Self::Education,
        Self::SoftSkill,
        Self::Certification,
        Self::Tool,
        Self::Other,
    ];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalSkill => "technical_skill",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::SoftSkill => "soft_skill",
            Self::Certification => "certification",
            Self::Tool => "tool",
            Self::Other => "other",
        }
    }

    /// Human-readable heading ("technical_skill" -> "Technical Skill")
    pub fn title(&self) -> &'static str {
        match self {
            Self::TechnicalSkill => "Technical Skill",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::SoftSkill => "Soft Skill",
            Self::Certification => "Certification",
            Self::Tool => "Tool",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequirementCategory {
    type Err = JobReqError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| JobReqError::InvalidInput(format!("unknown requirement category: {s}")))
    }
}

// ============================================================================
// Entities and Snippets
// ============================================================================

/// A labeled span produced by an entity recognizer.
///
/// Serializes as `{"text", "type", "confidence"}`; the normalized category is
/// internal to the pipeline and not part of the exported shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Span text as it appears in the input
    pub text: String,
    /// Raw label reported by the recognizer (e.g. "MISC", "SKILL")
    #[serde(rename = "type")]
    pub label: String,
    /// Recognizer confidence in [0, 1]
    pub confidence: f64,
    /// Category the label normalized to
    #[serde(skip)]
    pub category: RequirementCategory,
}

impl Entity {
    pub fn new(
        text: impl Into<String>,
        label: impl Into<String>,
        confidence: f64,
        category: RequirementCategory,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            confidence,
            category,
        }
    }
}

/// Where an extracted snippet came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetOrigin {
    PatternMatch,
    EntityRecognition,
}

/// A contiguous fragment of the input tagged with its category and origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSnippet {
    pub text: String,
    pub category: RequirementCategory,
    pub origin: SnippetOrigin,
}

impl ExtractedSnippet {
    /// Snippet produced by a pattern rule
    pub fn from_pattern(text: impl Into<String>, category: RequirementCategory) -> Self {
        Self {
            text: text.into(),
            category,
            origin: SnippetOrigin::PatternMatch,
        }
    }

    /// Snippet produced by the entity recognizer
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            text: entity.text.clone(),
            category: entity.category,
            origin: SnippetOrigin::EntityRecognition,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
