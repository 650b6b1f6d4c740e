//! Analysis result types
//!
//! The field layout here is the export format consumed by files and the HTTP
//! API; key names must stay stable.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Entity, RequirementCategory, Result};

// ============================================================================
// Categorized Requirements
// ============================================================================

/// Category -> ordered, deduplicated requirement strings.
///
/// Every category of the closed set is present as a key, possibly with an
/// empty list. Insertion keeps the first occurrence of each string per
/// category; the same string may appear under several categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorizedRequirements(BTreeMap<RequirementCategory, Vec<String>>);

impl CategorizedRequirements {
    /// Create with one empty list per category
    pub fn new() -> Self {
        Self(
            RequirementCategory::ALL
                .into_iter()
                .map(|c| (c, Vec::new()))
                .collect(),
        )
    }

    /// Append a requirement unless the category already holds it
    pub fn insert(&mut self, category: RequirementCategory, text: impl Into<String>) -> bool {
        let text = text.into();
        let items = self.0.entry(category).or_default();
        if items.contains(&text) {
            return false;
        }
        items.push(text);
        true
    }

    /// Requirements filed under a category
    pub fn get(&self, category: RequirementCategory) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether a category holds a specific string
    pub fn contains(&self, category: RequirementCategory, text: &str) -> bool {
        self.get(category).iter().any(|item| item == text)
    }

    /// Iterate categories in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (RequirementCategory, &[String])> {
        self.0.iter().map(|(c, items)| (*c, items.as_slice()))
    }

    /// Number of categories holding at least one requirement
    pub fn populated_categories(&self) -> usize {
        self.0.values().filter(|items| !items.is_empty()).count()
    }

    /// Number of distinct strings across all categories
    pub fn distinct_requirements(&self) -> usize {
        self.0
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// True when no category holds anything
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

impl Default for CategorizedRequirements {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Result Shape
// ============================================================================

/// Summary counters over the input text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSummary {
    pub total_sentences: usize,
    pub requirement_sentences: usize,
    /// `requirement_sentences / total_sentences`, 0 when there are no sentences
    pub requirement_density: f64,
    pub estimated_requirements: usize,
}

impl RequirementSummary {
    pub fn new(
        total_sentences: usize,
        requirement_sentences: usize,
        estimated_requirements: usize,
    ) -> Self {
        let requirement_density = if total_sentences == 0 {
            0.0
        } else {
            requirement_sentences as f64 / total_sentences as f64
        };

        Self {
            total_sentences,
            requirement_sentences,
            requirement_density,
            estimated_requirements,
        }
    }
}

/// Requirement sets produced by one extraction call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Pattern-matched snippets, deduplicated, first-seen order
    pub text_requirements: Vec<String>,
    /// Bullet, numbered or indented list lines that mention a requirement.
    /// Counted in `summary.estimated_requirements` but never categorized.
    #[serde(default)]
    pub individual_requirements: Vec<String>,
    /// Entities at or above the confidence threshold
    pub entity_requirements: Vec<Entity>,
    pub categorized_requirements: CategorizedRequirements,
    pub summary: RequirementSummary,
}

/// Outcome of the entity recognition stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityExtractionStatus {
    #[default]
    Completed,
    Skipped,
}

impl std::fmt::Display for EntityExtractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// How the result was produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub entity_extraction: EntityExtractionStatus,
    /// Why entity extraction was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    /// Name of the recognizer that ran (or was attempted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognizer: Option<String>,
}

impl ExtractionMetadata {
    /// Entity recognition ran to completion
    pub fn completed(recognizer: impl Into<String>) -> Self {
        Self {
            entity_extraction: EntityExtractionStatus::Completed,
            skip_reason: None,
            recognizer: Some(recognizer.into()),
        }
    }

    /// Entity recognition was skipped; results are pattern-only
    pub fn skipped(recognizer: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            entity_extraction: EntityExtractionStatus::Skipped,
            skip_reason: Some(reason.into()),
            recognizer,
        }
    }

    /// Whether the result was produced in degraded (pattern-only) mode
    pub fn is_degraded(&self) -> bool {
        self.entity_extraction == EntityExtractionStatus::Skipped
    }
}

/// Root output of one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub requirements: Requirements,
    /// Input length in characters
    pub text_length: usize,
    /// Whitespace-delimited word count
    pub word_count: usize,
    /// Complexity in [0.0, 10.0]
    pub complexity_score: f64,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub metadata: ExtractionMetadata,
}

impl AnalysisResult {
    /// Whether entity extraction was skipped for this result
    pub fn is_degraded(&self) -> bool {
        self.metadata.is_degraded()
    }

    /// Serialize to pretty JSON (2-space indent)
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorized_has_every_category() {
        let categorized = CategorizedRequirements::new();
        assert_eq!(categorized.iter().count(), RequirementCategory::ALL.len());
        assert!(categorized.is_empty());
    }

    #[test]
    fn test_categorized_insert_dedups_per_category() {
        let mut categorized = CategorizedRequirements::new();
        assert!(categorized.insert(RequirementCategory::TechnicalSkill, "Python"));
        assert!(!categorized.insert(RequirementCategory::TechnicalSkill, "Python"));
        assert!(categorized.insert(RequirementCategory::TechnicalSkill, "python"));
        assert!(categorized.insert(RequirementCategory::Tool, "Python"));

        assert_eq!(
            categorized.get(RequirementCategory::TechnicalSkill),
            ["Python", "python"]
        );
        assert_eq!(categorized.populated_categories(), 2);
        assert_eq!(categorized.distinct_requirements(), 2);
    }

    #[test]
    fn test_summary_density() {
        let summary = RequirementSummary::new(4, 1, 3);
        assert!((summary.requirement_density - 0.25).abs() < f64::EPSILON);

        let empty = RequirementSummary::new(0, 0, 0);
        assert_eq!(empty.requirement_density, 0.0);
    }

    #[test]
    fn test_result_serialized_shape() {
        let mut result = AnalysisResult::default();
        result
            .requirements
            .categorized_requirements
            .insert(RequirementCategory::Education, "Bachelor's degree");

        let value = serde_json::to_value(&result).unwrap();
        let requirements = &value["requirements"];

        assert!(requirements["text_requirements"].is_array());
        assert!(requirements["individual_requirements"].is_array());
        assert!(requirements["entity_requirements"].is_array());
        assert_eq!(
            requirements["categorized_requirements"]["education"][0],
            "Bachelor's degree"
        );
        assert_eq!(requirements["summary"]["total_sentences"], 0);
        assert_eq!(requirements["summary"]["requirement_density"], 0.0);
        assert_eq!(value["text_length"], 0);
        assert_eq!(value["word_count"], 0);
        assert_eq!(value["complexity_score"], 0.0);
        assert!(value["recommendations"].is_array());
        assert_eq!(value["metadata"]["entity_extraction"], "completed");
    }

    #[test]
    fn test_degraded_metadata() {
        let metadata = ExtractionMetadata::skipped(None, "model offline");
        assert!(metadata.is_degraded());

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["entity_extraction"], "skipped");
        assert_eq!(value["skip_reason"], "model offline");
        assert!(value.get("recognizer").is_none());
    }

    #[test]
    fn test_result_json_roundtrip_keeps_categories() {
        let mut result = AnalysisResult::default();
        result
            .requirements
            .categorized_requirements
            .insert(RequirementCategory::Tool, "Jira");

        let json = result.to_json_pretty().unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert!(parsed
            .requirements
            .categorized_requirements
            .contains(RequirementCategory::Tool, "Jira"));
    }
}
