//! Named Entity Recognition (NER) module
//!
//! Provides the recognizer capability used by the pipeline plus the pieces
//! every adapter shares:
//! - Label normalization into the closed category set
//! - Confidence threshold validation
//! - Dictionary-based recognizer (offline gazetteer)
//!
//! The hosted-model adapter lives in [`crate::inference`].

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use jobreq_core::{Entity, JobReqError, NerBackend, NerConfig, RequirementCategory, Result};

use crate::inference::InferenceRecognizer;

// ============================================================================
// Recognizer Trait
// ============================================================================

/// Capability interface around an entity recognition model.
///
/// Implementations return only entities with `confidence >= threshold`, with
/// labels already normalized to a category. A model that cannot be loaded or
/// invoked reports [`JobReqError::ModelUnavailable`].
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str, confidence_threshold: f64) -> Result<Vec<Entity>>;

    /// Short identifier recorded in result metadata
    fn name(&self) -> &str;
}

/// Reject thresholds outside [0, 1] (NaN included)
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(JobReqError::InvalidInput(format!(
            "confidence threshold must be within [0, 1], got {threshold}"
        )))
    }
}

// ============================================================================
// Label Normalization
// ============================================================================

/// Fixed lookup from recognizer labels to categories
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    table: BTreeMap<String, RequirementCategory>,
}

impl LabelMap {
    /// Build from a label table; keys are matched case-insensitively
    pub fn new(table: &BTreeMap<String, RequirementCategory>) -> Self {
        Self {
            table: table
                .iter()
                .map(|(label, category)| (label.to_uppercase(), *category))
                .collect(),
        }
    }

    /// Map a raw label to a category.
    ///
    /// IOB/BIOES prefixes ("B-", "I-", "E-", "S-") are stripped first; a label
    /// that is not in the table normalizes to `other`.
    pub fn normalize(&self, label: &str) -> RequirementCategory {
        let upper = label.trim().to_uppercase();
        let bare = ["B-", "I-", "E-", "S-"]
            .iter()
            .find_map(|prefix| upper.strip_prefix(prefix))
            .unwrap_or(&upper);

        self.table
            .get(bare)
            .copied()
            .unwrap_or(RequirementCategory::Other)
    }
}

// ============================================================================
// Dictionary-based NER
// ============================================================================

/// Dictionary entry for entity matching
#[derive(Debug, Clone)]
pub struct DictionaryEntry {
    pub term: String,
    pub label: String,
    pub aliases: Vec<String>,
}

/// Compiled entry: whole-word matchers for the term and its aliases, each
/// paired with the confidence it reports
struct CompiledEntry {
    entry: DictionaryEntry,
    patterns: Vec<(Regex, f64)>,
}

const TERM_CONFIDENCE: f64 = 0.95;
const ALIAS_CONFIDENCE: f64 = 0.9;

/// Terms this short collide with ordinary words ("go", "ml") unless matched
/// with their exact casing
const CASE_SENSITIVE_MAX_CHARS: usize = 2;

/// Offline recognizer matching a gazetteer of job-market terms.
///
/// The canonical term scores 0.95, an alias 0.9; overlapping spans keep the
/// higher-confidence match.
pub struct DictionaryRecognizer {
    entries: Vec<CompiledEntry>,
    labels: LabelMap,
}

impl DictionaryRecognizer {
    /// Create with the built-in job-market dictionary
    pub fn new(labels: LabelMap) -> Self {
        let mut recognizer = Self {
            entries: Vec::new(),
            labels,
        };

        recognizer.init_job_dictionary();
        recognizer
    }

    /// Create with no terms (add them with [`Self::add_term`])
    pub fn empty(labels: LabelMap) -> Self {
        Self {
            entries: Vec::new(),
            labels,
        }
    }

    /// Initialize dictionary for common job-description terms
    fn init_job_dictionary(&mut self) {
        // Languages and platforms
        self.add_term("Python", "SKILL", vec!["python3"]);
        self.add_term("JavaScript", "SKILL", vec!["ECMAScript"]);
        self.add_term("TypeScript", "SKILL", vec![]);
        self.add_term("Java", "SKILL", vec![]);
        self.add_term("Go", "SKILL", vec!["Golang"]);
        self.add_term("Rust", "SKILL", vec![]);
        self.add_term("SQL", "SKILL", vec!["PostgreSQL", "MySQL"]);
        self.add_term("Kubernetes", "SKILL", vec!["K8s"]);
        self.add_term("Docker", "SKILL", vec!["containers"]);
        self.add_term("AWS", "SKILL", vec!["Amazon Web Services"]);
        self.add_term("Azure", "SKILL", vec![]);
        self.add_term("GCP", "SKILL", vec!["Google Cloud"]);
        self.add_term("Machine Learning", "SKILL", vec!["ML"]);
        self.add_term("React", "SKILL", vec!["React.js", "ReactJS"]);

        // Tools
        self.add_term("Git", "TOOL", vec!["GitHub", "GitLab"]);
        self.add_term("Jira", "TOOL", vec![]);
        self.add_term("Confluence", "TOOL", vec![]);
        self.add_term("Jenkins", "TOOL", vec![]);
        self.add_term("Terraform", "TOOL", vec![]);
        self.add_term("Figma", "TOOL", vec![]);

        // Education
        self.add_term("Bachelor's degree", "DEGREE", vec!["BSc", "BS degree", "BA degree"]);
        self.add_term("Master's degree", "DEGREE", vec!["MSc", "MS degree"]);
        self.add_term("PhD", "DEGREE", vec!["Ph.D", "doctorate"]);

        // Certifications
        self.add_term("PMP", "CERTIFICATION", vec![]);
        self.add_term("CISSP", "CERTIFICATION", vec![]);
        self.add_term("AWS Certified", "CERTIFICATION", vec![]);

        // Soft skills
        self.add_term("communication", "SOFT_SKILL", vec!["communicator"]);
        self.add_term("leadership", "SOFT_SKILL", vec!["mentoring"]);
        self.add_term("teamwork", "SOFT_SKILL", vec!["collaboration"]);
    }

    /// Add a dictionary term; terms that fail to compile are skipped.
    ///
    /// Terms and aliases of two characters or fewer only match with the
    /// casing given here.
    pub fn add_term(&mut self, term: &str, label: &str, aliases: Vec<&str>) {
        let Some(term_regex) = whole_word(&[term], !is_case_sensitive(term)) else {
            return;
        };
        let mut patterns = vec![(term_regex, TERM_CONFIDENCE)];

        let (exact, folded): (Vec<&str>, Vec<&str>) =
            aliases.iter().copied().partition(|alias| is_case_sensitive(alias));
        for (group, ignore_case) in [(folded, true), (exact, false)] {
            if group.is_empty() {
                continue;
            }
            if let Some(regex) = whole_word(&group, ignore_case) {
                patterns.push((regex, ALIAS_CONFIDENCE));
            }
        }

        self.entries.push(CompiledEntry {
            entry: DictionaryEntry {
                term: term.to_string(),
                label: label.to_string(),
                aliases: aliases.iter().map(|s| s.to_string()).collect(),
            },
            patterns,
        });
    }

    /// Number of dictionary entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect raw spans for every term and alias
    fn scan(&self, text: &str) -> Vec<Span<'_>> {
        let mut spans = Vec::new();

        for compiled in &self.entries {
            for (regex, confidence) in &compiled.patterns {
                for mat in regex.find_iter(text) {
                    spans.push(Span {
                        start: mat.start(),
                        end: mat.end(),
                        label: &compiled.entry.label,
                        confidence: *confidence,
                    });
                }
            }
        }

        spans
    }
}

fn is_case_sensitive(term: &str) -> bool {
    term.chars().count() <= CASE_SENSITIVE_MAX_CHARS
}

/// Build a whole-word alternation
fn whole_word(terms: &[&str], ignore_case: bool) -> Option<Regex> {
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .case_insensitive(ignore_case)
        .build()
        .ok()
}

struct Span<'a> {
    start: usize,
    end: usize,
    label: &'a str,
    confidence: f64,
}

/// Remove overlapping spans, keeping the highest confidence (then the longest)
fn deduplicate(mut spans: Vec<Span<'_>>) -> Vec<Span<'_>> {
    spans.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
            .then(a.start.cmp(&b.start))
    });

    let mut covered: HashSet<usize> = HashSet::new();
    let mut kept = Vec::new();

    for span in spans {
        if (span.start..span.end).any(|i| covered.contains(&i)) {
            continue;
        }
        covered.extend(span.start..span.end);
        kept.push(span);
    }

    kept.sort_by_key(|s| s.start);
    kept
}

impl EntityRecognizer for DictionaryRecognizer {
    fn recognize(&self, text: &str, confidence_threshold: f64) -> Result<Vec<Entity>> {
        validate_threshold(confidence_threshold)?;

        let entities = deduplicate(self.scan(text))
            .into_iter()
            .filter(|span| span.confidence >= confidence_threshold)
            .map(|span| {
                Entity::new(
                    &text[span.start..span.end],
                    span.label,
                    span.confidence,
                    self.labels.normalize(span.label),
                )
            })
            .collect();

        Ok(entities)
    }

    fn name(&self) -> &str {
        "dictionary"
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Create the recognizer selected by configuration (`None` when disabled).
///
/// The backend is resolved with [`NerConfig::effective_backend`].
pub fn create_recognizer(config: &NerConfig) -> Option<Arc<dyn EntityRecognizer>> {
    let backend = config.effective_backend();
    if backend != config.backend {
        tracing::info!(
            "No API token for {}; using the dictionary recognizer",
            config.endpoint
        );
    }

    match backend {
        NerBackend::Inference => Some(Arc::new(InferenceRecognizer::from_config(config))),
        NerBackend::Dictionary => Some(Arc::new(DictionaryRecognizer::new(LabelMap::new(
            &config.label_categories,
        )))),
        NerBackend::Disabled => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelMap {
        LabelMap::new(&NerConfig::default().label_categories)
    }

    #[test]
    fn test_label_normalization() {
        let map = labels();
        assert_eq!(map.normalize("SKILL"), RequirementCategory::TechnicalSkill);
        assert_eq!(map.normalize("b-tool"), RequirementCategory::Tool);
        assert_eq!(map.normalize("I-DEGREE"), RequirementCategory::Education);
        assert_eq!(map.normalize("PER"), RequirementCategory::Other);
        assert_eq!(map.normalize("SOMETHING_NEW"), RequirementCategory::Other);
        assert_eq!(map.normalize(""), RequirementCategory::Other);
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_dictionary_terms() {
        let ner = DictionaryRecognizer::new(labels());

        let entities = ner
            .recognize("Python and Jira experience, PMP preferred", 0.7)
            .unwrap();

        let found: Vec<(&str, RequirementCategory)> = entities
            .iter()
            .map(|e| (e.text.as_str(), e.category))
            .collect();
        assert!(found.contains(&("Python", RequirementCategory::TechnicalSkill)));
        assert!(found.contains(&("Jira", RequirementCategory::Tool)));
        assert!(found.contains(&("PMP", RequirementCategory::Certification)));
    }

    #[test]
    fn test_dictionary_whole_words_only() {
        let ner = DictionaryRecognizer::new(labels());

        // "Java" must not fire inside "JavaScript"
        let entities = ner.recognize("JavaScript developer", 0.7).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "JavaScript");
    }

    #[test]
    fn test_overlap_keeps_higher_confidence() {
        let ner = DictionaryRecognizer::new(labels());

        // "AWS Certified" (certification) overlaps "AWS" (skill); both score 0.95,
        // the longer span wins
        let entities = ner.recognize("AWS Certified engineer", 0.7).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "AWS Certified");
        assert_eq!(entities[0].category, RequirementCategory::Certification);
    }

    #[test]
    fn test_threshold_filters_aliases() {
        let ner = DictionaryRecognizer::new(labels());

        let entities = ner.recognize("Golang services", 0.92).unwrap();
        assert!(entities.is_empty());

        let entities = ner.recognize("Golang services", 0.9).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, "SKILL");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let ner = DictionaryRecognizer::new(labels());
        let err = ner.recognize("Python", 2.0).unwrap_err();
        assert!(matches!(err, JobReqError::InvalidInput(_)));
    }

    #[test]
    fn test_create_recognizer_by_backend() {
        let mut config = NerConfig::default();
        assert_eq!(create_recognizer(&config).unwrap().name(), "dictionary");

        config.api_token = Some("hf_token".to_string());
        assert_eq!(
            create_recognizer(&config).unwrap().name(),
            config.model_id.as_str()
        );

        config.backend = NerBackend::Dictionary;
        assert_eq!(create_recognizer(&config).unwrap().name(), "dictionary");

        config.backend = NerBackend::Disabled;
        assert!(create_recognizer(&config).is_none());
    }

    #[test]
    fn test_short_terms_match_exact_case() {
        let ner = DictionaryRecognizer::new(labels());

        let entities = ner
            .recognize(
                "You will be ready to go on site and lead teams. ML and TS welcome",
                0.7,
            )
            .unwrap();
        let texts: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert!(!texts.contains(&"go"));
        assert!(!texts.contains(&"TS"));
        assert_eq!(texts, vec!["ML"]);

        let entities = ner.recognize("Go and Golang, 250 ml", 0.7).unwrap();
        let texts: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Go", "Golang"]);
    }

    #[test]
    fn test_empty_dictionary() {
        let ner = DictionaryRecognizer::empty(labels());
        assert!(ner.is_empty());
        assert!(ner.recognize("Python", 0.5).unwrap().is_empty());
    }
}
