//! Pattern matcher
//!
//! Compiles the configured pattern library once and applies it to raw text.
//! Each category's expressions are run in order over the full input; matches
//! are concatenated and deduplicated per category (first occurrence wins).

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use jobreq_core::{
    ExtractedSnippet, JobReqError, PatternLibraryConfig, RequirementCategory, Result,
};

/// Category -> ordered, deduplicated matched snippets
pub type CategoryMatches = BTreeMap<RequirementCategory, Vec<String>>;

/// One category's compiled rule
#[derive(Debug, Clone)]
struct CompiledRule {
    category: RequirementCategory,
    expressions: Vec<Regex>,
}

/// Applies the pattern library to text
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: Vec<CompiledRule>,
}

impl PatternMatcher {
    /// Compile a pattern library; any malformed expression is a configuration error
    pub fn new(library: &PatternLibraryConfig) -> Result<Self> {
        let mut rules = Vec::with_capacity(library.rules.len());

        for (category, sources) in &library.rules {
            let expressions = sources
                .iter()
                .map(|source| {
                    RegexBuilder::new(source)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| {
                            JobReqError::ConfigurationError(format!(
                                "invalid {category} pattern {source:?}: {e}"
                            ))
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            rules.push(CompiledRule {
                category: *category,
                expressions,
            });
        }

        Ok(Self { rules })
    }

    /// Create with the built-in library
    pub fn with_defaults() -> Result<Self> {
        Self::new(&PatternLibraryConfig::default())
    }

    /// Total number of compiled expressions
    pub fn expression_count(&self) -> usize {
        self.rules.iter().map(|r| r.expressions.len()).sum()
    }

    /// Match every rule against the text
    pub fn find_matches(&self, text: &str) -> CategoryMatches {
        let mut matches = CategoryMatches::new();

        for rule in &self.rules {
            let found = matches.entry(rule.category).or_default();
            for regex in &rule.expressions {
                for mat in regex.find_iter(text) {
                    let snippet = mat.as_str().trim();
                    if !snippet.is_empty() && !found.iter().any(|s| s == snippet) {
                        found.push(snippet.to_string());
                    }
                }
            }
        }

        matches
    }

    /// Matches as origin-tagged snippets, in category order
    pub fn snippets(&self, text: &str) -> Vec<ExtractedSnippet> {
        self.find_matches(text)
            .into_iter()
            .flat_map(|(category, found)| {
                found
                    .into_iter()
                    .map(move |s| ExtractedSnippet::from_pattern(s, category))
            })
            .collect()
    }

    /// Whether any expression matches the text
    pub fn matches_any(&self, text: &str) -> bool {
        self.rules
            .iter()
            .flat_map(|r| r.expressions.iter())
            .any(|regex| regex.is_match(text))
    }
}

/// Flatten category matches into one list, deduplicated, first-seen order
pub fn flatten_matches(matches: &CategoryMatches) -> Vec<String> {
    let mut flat: Vec<String> = Vec::new();
    for snippet in matches.values().flatten() {
        if !flat.contains(snippet) {
            flat.push(snippet.clone());
        }
    }
    flat
}
