//! JobReq Extractor - Requirement extraction pipeline
//!
//! Turns free-form job-description text into an [`AnalysisResult`]:
//! - Pattern matching against the configured pattern library
//! - Named Entity Recognition through a pluggable [`EntityRecognizer`]
//! - Categorization into the closed category set
//! - Complexity scoring and recommendations
//!
//! # Example
//!
//! ```no_run
//! use jobreq_core::AppConfig;
//! use jobreq_extractor::RequirementsExtractor;
//!
//! let extractor = RequirementsExtractor::from_config(&AppConfig::default())?;
//! let result = extractor.extract_requirements("Senior Python developer, 5+ years experience")?;
//! println!("{}", result.complexity_score);
//! # Ok::<(), jobreq_core::JobReqError>(())
//! ```
//!
//! [`AnalysisResult`]: jobreq_core::AnalysisResult

pub mod categorizer;
pub mod inference;
pub mod ner;
pub mod patterns;
pub mod pipeline;
pub mod recommend;
pub mod scoring;
pub mod text;

pub use categorizer::categorize;
pub use inference::InferenceRecognizer;
pub use ner::{create_recognizer, DictionaryRecognizer, EntityRecognizer, LabelMap};
pub use patterns::{CategoryMatches, PatternMatcher};
pub use pipeline::RequirementsExtractor;
pub use recommend::RecommendationGenerator;
pub use scoring::{ComplexityScorer, ScoreBand, ScoreInputs, MAX_COMPLEXITY_SCORE};
pub use text::split_sentences;
