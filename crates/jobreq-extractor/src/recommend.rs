//! Recommendation generator
//!
//! Rule table lookup: one canned tip per populated category (fixed priority
//! order, capped), followed by one general tip for the score band.

use jobreq_core::{
    CategorizedRequirements, RecommendationConfig, RequirementCategory, ScoringConfig,
};

use crate::scoring::ScoreBand;

/// Categories in the order their advice is emitted
pub const RECOMMENDATION_PRIORITY: [RequirementCategory; 6] = [
    RequirementCategory::TechnicalSkill,
    RequirementCategory::Experience,
    RequirementCategory::Education,
    RequirementCategory::Certification,
    RequirementCategory::Tool,
    RequirementCategory::SoftSkill,
];

fn category_advice(category: RequirementCategory) -> Option<&'static str> {
    match category {
        RequirementCategory::TechnicalSkill => {
            Some("Focus on highlighting relevant technical skills in your resume")
        }
        RequirementCategory::Experience => {
            Some("Emphasize relevant work experience and achievements")
        }
        RequirementCategory::Education => {
            Some("Ensure your education credentials are clearly stated")
        }
        RequirementCategory::Certification => {
            Some("List required certifications prominently, including dates obtained")
        }
        RequirementCategory::Tool => {
            Some("Mention hands-on experience with the specific tools listed")
        }
        RequirementCategory::SoftSkill => {
            Some("Back up soft skills with concrete examples from past roles")
        }
        RequirementCategory::Other => None,
    }
}

fn band_advice(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Low => "This job has fewer requirements - may be more entry-level",
        ScoreBand::Medium => {
            "This job has a moderate set of requirements - tailor your resume to the core skills"
        }
        ScoreBand::High => "This job has many requirements - consider if you meet most criteria",
    }
}

/// Maps category coverage and score band to advice
#[derive(Debug, Clone)]
pub struct RecommendationGenerator {
    max_recommendations: usize,
    bands: ScoringConfig,
}

impl RecommendationGenerator {
    /// `max_recommendations` caps the per-category tips; the band tip is always added
    pub fn new(config: &RecommendationConfig, scoring: &ScoringConfig) -> Self {
        Self {
            max_recommendations: config.max_recommendations,
            bands: scoring.clone(),
        }
    }

    /// Advice for a categorized set and its complexity score
    pub fn recommend(&self, categorized: &CategorizedRequirements, score: f64) -> Vec<String> {
        self.recommend_for_band(categorized, ScoreBand::classify(score, &self.bands))
    }

    pub fn recommend_for_band(
        &self,
        categorized: &CategorizedRequirements,
        band: ScoreBand,
    ) -> Vec<String> {
        let mut recommendations: Vec<String> = RECOMMENDATION_PRIORITY
            .iter()
            .filter(|category| !categorized.get(**category).is_empty())
            .filter_map(|category| category_advice(*category))
            .take(self.max_recommendations)
            .map(str::to_string)
            .collect();

        let general = band_advice(band);
        if !recommendations.iter().any(|r| r == general) {
            recommendations.push(general.to_string());
        }

        recommendations
    }
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new(&RecommendationConfig::default(), &ScoringConfig::default())
    }
}
