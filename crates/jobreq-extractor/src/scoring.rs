//! Complexity scoring
//!
//! score = sum(category weight * requirements in category)
//!       + diversity weight * populated categories
//!       + density weight * requirements per 100 words
//!
//! clipped to [0, 10] and rounded to two decimals. Input with no words always
//! scores exactly 0.0.

use serde::{Deserialize, Serialize};

use jobreq_core::{CategorizedRequirements, ScoringConfig};

/// Upper bound of the complexity score
pub const MAX_COMPLEXITY_SCORE: f64 = 10.0;

/// Everything the scorer looks at
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub categorized: &'a CategorizedRequirements,
    pub word_count: usize,
}

/// Coarse complexity band used for the general recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    /// Classify a score against the configured band thresholds
    pub fn classify(score: f64, config: &ScoringConfig) -> Self {
        if score >= config.high_band_min {
            Self::High
        } else if score >= config.medium_band_min {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Deterministic weighted scorer
#[derive(Debug, Clone)]
pub struct ComplexityScorer {
    config: ScoringConfig,
}

impl ComplexityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score in [0.0, 10.0]
    pub fn score(&self, inputs: ScoreInputs<'_>) -> f64 {
        if inputs.word_count == 0 {
            return 0.0;
        }

        let weighted: f64 = inputs
            .categorized
            .iter()
            .map(|(category, items)| self.config.weight(category) * items.len() as f64)
            .sum();

        let diversity =
            self.config.diversity_weight * inputs.categorized.populated_categories() as f64;

        let per_hundred_words = inputs.categorized.distinct_requirements() as f64 * 100.0
            / inputs.word_count as f64;
        let density = self.config.density_weight * per_hundred_words;

        let raw = weighted + diversity + density;
        if !raw.is_finite() {
            return MAX_COMPLEXITY_SCORE;
        }

        let clipped = raw.clamp(0.0, MAX_COMPLEXITY_SCORE);
        (clipped * 100.0).round() / 100.0
    }

    /// Band a score falls into
    pub fn band(&self, score: f64) -> ScoreBand {
        ScoreBand::classify(score, &self.config)
    }
}

impl Default for ComplexityScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobreq_core::RequirementCategory;
    use proptest::prelude::*;

    fn categorized(entries: &[(RequirementCategory, &str)]) -> CategorizedRequirements {
        let mut categorized = CategorizedRequirements::new();
        for (category, text) in entries {
            categorized.insert(*category, *text);
        }
        categorized
    }

    #[test]
    fn test_no_words_scores_zero() {
        let scorer = ComplexityScorer::default();
        let empty = CategorizedRequirements::new();
        let score = scorer.score(ScoreInputs {
            categorized: &empty,
            word_count: 0,
        });
        assert_eq!(score, 0.0);
        assert_eq!(scorer.band(score), ScoreBand::Low);
    }

    #[test]
    fn test_weighted_sum() {
        let scorer = ComplexityScorer::default();
        let reqs = categorized(&[
            (RequirementCategory::TechnicalSkill, "Python"),
            (RequirementCategory::Experience, "3+ years"),
        ]);

        // 0.35 + 0.5 + 2 * 0.5 + 0.1 * (2 * 100 / 10)
        let score = scorer.score(ScoreInputs {
            categorized: &reqs,
            word_count: 10,
        });
        assert!((score - 3.85).abs() < 1e-9);
    }

    #[test]
    fn test_clipped_to_max() {
        let config = ScoringConfig {
            diversity_weight: 100.0,
            ..ScoringConfig::default()
        };
        let scorer = ComplexityScorer::new(config);
        let reqs = categorized(&[(RequirementCategory::Tool, "Jira")]);

        let score = scorer.score(ScoreInputs {
            categorized: &reqs,
            word_count: 5,
        });
        assert_eq!(score, MAX_COMPLEXITY_SCORE);
        assert_eq!(scorer.band(score), ScoreBand::High);
    }

    #[test]
    fn test_bands() {
        let scorer = ComplexityScorer::default();
        assert_eq!(scorer.band(0.0), ScoreBand::Low);
        assert_eq!(scorer.band(3.49), ScoreBand::Low);
        assert_eq!(scorer.band(3.5), ScoreBand::Medium);
        assert_eq!(scorer.band(6.99), ScoreBand::Medium);
        assert_eq!(scorer.band(7.0), ScoreBand::High);
    }

    proptest! {
        #[test]
        fn prop_score_within_range(
            items in proptest::collection::vec(("[a-z]{1,8}", 0usize..7), 0..40),
            word_count in 0usize..500,
        ) {
            let mut reqs = CategorizedRequirements::new();
            for (text, idx) in &items {
                reqs.insert(RequirementCategory::ALL[*idx], text.clone());
            }

            let score = ComplexityScorer::default().score(ScoreInputs {
                categorized: &reqs,
                word_count,
            });
            prop_assert!((0.0..=MAX_COMPLEXITY_SCORE).contains(&score));
        }
    }
}
