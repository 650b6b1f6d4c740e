//! Extraction orchestrator
//!
//! Composes segmentation, pattern matching, entity recognition,
//! categorization, scoring and recommendations into a single
//! `extract_requirements` call.

use std::sync::Arc;

use jobreq_core::{
    AnalysisResult, AppConfig, ExtractionMetadata, JobReqError, RequirementSummary, Requirements,
    Result,
};

use crate::categorizer::categorize;
use crate::ner::{create_recognizer, EntityRecognizer};
use crate::patterns::{flatten_matches, PatternMatcher};
use crate::recommend::RecommendationGenerator;
use crate::scoring::{ComplexityScorer, ScoreInputs};
use crate::text::{capitalize_first, char_count, list_items, split_sentences, word_count};

/// Requirements extraction pipeline.
///
/// Built once from configuration and shared freely between threads; the
/// recognizer is injected so tests can substitute a deterministic stub.
pub struct RequirementsExtractor {
    /// Compiled pattern library
    matcher: PatternMatcher,

    /// Entity recognizer (none when recognition is disabled)
    recognizer: Option<Arc<dyn EntityRecognizer>>,

    /// Minimum entity confidence
    confidence_threshold: f64,

    /// Lowercased requirement keywords
    keywords: Vec<String>,

    /// Lowercased words marking a list line as a requirement (keywords included)
    list_indicators: Vec<String>,

    scorer: ComplexityScorer,
    recommender: RecommendationGenerator,
}

impl RequirementsExtractor {
    /// Create an extractor around an already constructed recognizer.
    ///
    /// Fails with `ConfigurationError` for an out-of-range threshold, bad
    /// weights or a malformed pattern library.
    pub fn new(config: &AppConfig, recognizer: Option<Arc<dyn EntityRecognizer>>) -> Result<Self> {
        config.validate()?;
        let matcher = PatternMatcher::new(&config.patterns)?;

        tracing::debug!(
            expressions = matcher.expression_count(),
            recognizer = recognizer.as_ref().map(|r| r.name()).unwrap_or("none"),
            "Requirements extractor initialized"
        );

        let lowercase = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };
        let keywords = lowercase(&config.extraction.requirement_keywords);
        let mut list_indicators = keywords.clone();
        list_indicators.extend(lowercase(&config.extraction.list_item_indicators));

        Ok(Self {
            matcher,
            recognizer,
            confidence_threshold: config.ner.confidence_threshold,
            keywords,
            list_indicators,
            scorer: ComplexityScorer::new(config.scoring.clone()),
            recommender: RecommendationGenerator::new(&config.recommendations, &config.scoring),
        })
    }

    /// Create with the recognizer selected by `config.ner.backend`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config, create_recognizer(&config.ner))
    }

    /// Replace the recognizer
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Drop entity recognition (pattern-only results)
    pub fn without_recognizer(mut self) -> Self {
        self.recognizer = None;
        self
    }

    /// Name of the configured recognizer
    pub fn recognizer_name(&self) -> Option<&str> {
        self.recognizer.as_ref().map(|r| r.name())
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    pub fn pattern_count(&self) -> usize {
        self.matcher.expression_count()
    }

    /// Analyze one job description.
    ///
    /// Any text is accepted, including the empty string. An unavailable model
    /// degrades the result to pattern-only extraction and is recorded in the
    /// result metadata; other recognizer errors propagate.
    pub fn extract_requirements(&self, text: &str) -> Result<AnalysisResult> {
        // 1. Segment
        let sentences = split_sentences(text);
        tracing::debug!("Segmented into {} sentences", sentences.len());

        // 2. Pattern matching
        let pattern_matches = self.matcher.find_matches(text);
        let text_requirements = flatten_matches(&pattern_matches);
        tracing::debug!("Pattern matching found {} snippets", text_requirements.len());

        let individual_requirements = self.individual_requirements(text);

        // 3. Entity recognition
        let (entities, metadata) = self.recognize(text)?;

        // 4. Categorize
        let categorized = categorize(&pattern_matches, &entities);

        // 5. Summary counters
        let requirement_sentences = sentences
            .iter()
            .filter(|s| self.is_requirement_sentence(s))
            .count();
        let summary = RequirementSummary::new(
            sentences.len(),
            requirement_sentences,
            categorized.distinct_requirements() + individual_requirements.len(),
        );

        // 6. Score
        let words = word_count(text);
        let complexity_score = self.scorer.score(ScoreInputs {
            categorized: &categorized,
            word_count: words,
        });

        // 7. Recommend
        let recommendations = self.recommender.recommend(&categorized, complexity_score);

        tracing::debug!(
            requirements = summary.estimated_requirements,
            complexity_score,
            degraded = metadata.is_degraded(),
            "Extraction completed"
        );

        Ok(AnalysisResult {
            requirements: Requirements {
                text_requirements,
                individual_requirements,
                entity_requirements: entities,
                categorized_requirements: categorized,
                summary,
            },
            text_length: char_count(text),
            word_count: words,
            complexity_score,
            recommendations,
            metadata,
        })
    }

    /// Run the recognizer, degrading on an unavailable model
    fn recognize(&self, text: &str) -> Result<(Vec<jobreq_core::Entity>, ExtractionMetadata)> {
        let Some(recognizer) = &self.recognizer else {
            return Ok((
                Vec::new(),
                ExtractionMetadata::skipped(None, "entity recognition disabled"),
            ));
        };

        match recognizer.recognize(text, self.confidence_threshold) {
            Ok(entities) => {
                tracing::debug!("Entity recognition returned {} entities", entities.len());
                Ok((entities, ExtractionMetadata::completed(recognizer.name())))
            }
            Err(JobReqError::ModelUnavailable(reason)) => {
                tracing::warn!(
                    recognizer = recognizer.name(),
                    "Entity recognition unavailable, continuing with patterns only: {}",
                    reason
                );
                Ok((
                    Vec::new(),
                    ExtractionMetadata::skipped(Some(recognizer.name().to_string()), reason),
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// List lines mentioning a requirement indicator, capitalized and
    /// deduplicated in first-seen order
    fn individual_requirements(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for item in list_items(text) {
            let lower = item.to_lowercase();
            if !self.list_indicators.iter().any(|k| lower.contains(k.as_str())) {
                continue;
            }

            let item = capitalize_first(item);
            if !found.contains(&item) {
                found.push(item);
            }
        }

        found
    }

    /// A sentence bears requirements if it holds a keyword or a pattern match
    fn is_requirement_sentence(&self, sentence: &str) -> bool {
        let lower = sentence.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
            || self.matcher.matches_any(sentence)
    }
}
