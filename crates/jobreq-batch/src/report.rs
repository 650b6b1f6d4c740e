//! Batch summary report
//!
//! Aggregates the records of a batch run: success rate, text volume, average
//! complexity, requirement totals and the per-category distribution.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobreq_core::RequirementCategory;

use crate::BatchItem;

/// Text volume and complexity over successful analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_text_length: usize,
    pub total_word_count: usize,
    /// Rounded to two decimals
    pub average_complexity_score: f64,
}

/// Requirement totals over successful analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementsTotals {
    pub total_requirements_found: usize,
    /// Rounded to two decimals
    pub average_requirements_per_job: f64,
}

/// Summary of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_files_processed: usize,
    pub successful_analyses: usize,
    pub failed_analyses: usize,
    /// Successful analyses whose entity recognition was skipped
    pub degraded_analyses: usize,
    pub success_rate: f64,
    pub aggregate_metrics: AggregateMetrics,
    pub requirements_summary: RequirementsTotals,
    /// Category -> requirements found across all jobs
    pub category_distribution: BTreeMap<RequirementCategory, usize>,
    pub generated_at: DateTime<Utc>,
}

impl BatchSummary {
    /// Summarize batch records; `None` when there are none
    pub fn from_items(items: &[BatchItem]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let analyses: Vec<_> = items.iter().filter_map(BatchItem::analysis).collect();
        let successful = analyses.len();

        let mut aggregate = AggregateMetrics::default();
        let mut total_complexity = 0.0;
        let mut total_requirements = 0;
        let mut distribution: BTreeMap<RequirementCategory, usize> = BTreeMap::new();

        for analysis in &analyses {
            aggregate.total_text_length += analysis.text_length;
            aggregate.total_word_count += analysis.word_count;
            total_complexity += analysis.complexity_score;

            let reqs = &analysis.requirements;
            total_requirements += reqs.summary.estimated_requirements;
            for (category, found) in reqs.categorized_requirements.iter() {
                *distribution.entry(category).or_default() += found.len();
            }
        }

        aggregate.average_complexity_score = round2(average(total_complexity, successful));

        Some(Self {
            total_files_processed: items.len(),
            successful_analyses: successful,
            failed_analyses: items.len() - successful,
            degraded_analyses: analyses.iter().filter(|a| a.is_degraded()).count(),
            success_rate: successful as f64 / items.len() as f64,
            aggregate_metrics: aggregate,
            requirements_summary: RequirementsTotals {
                total_requirements_found: total_requirements,
                average_requirements_per_job: round2(average(
                    total_requirements as f64,
                    successful,
                )),
            },
            category_distribution: distribution,
            generated_at: Utc::now(),
        })
    }

    /// Human-readable report
    pub fn report(&self) -> String {
        let mut out = format!(
            "=== Batch Analysis Report ===\n\n\
             Files processed: {}\n\
             Successful: {} | Failed: {} | Degraded: {}\n\
             Success rate: {:.1}%\n\n\
             Text volume:\n\
               Characters: {}\n\
               Words:      {}\n\
               Average complexity: {:.2}\n\n\
             Requirements:\n\
               Total found:     {}\n\
               Average per job: {:.2}\n\n\
             Category distribution:\n",
            self.total_files_processed,
            self.successful_analyses,
            self.failed_analyses,
            self.degraded_analyses,
            self.success_rate * 100.0,
            self.aggregate_metrics.total_text_length,
            self.aggregate_metrics.total_word_count,
            self.aggregate_metrics.average_complexity_score,
            self.requirements_summary.total_requirements_found,
            self.requirements_summary.average_requirements_per_job,
        );

        for (category, count) in &self.category_distribution {
            out.push_str(&format!("  {:<16} {}\n", category.title(), count));
        }

        out
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemOutcome, TextInfo};
    use jobreq_core::{AnalysisResult, CategorizedRequirements, RequirementSummary};

    fn analyzed(score: f64, tools: &[&str], words: usize) -> BatchItem {
        let mut categorized = CategorizedRequirements::new();
        for tool in tools {
            categorized.insert(RequirementCategory::Tool, *tool);
        }

        let mut result = AnalysisResult {
            text_length: words * 5,
            word_count: words,
            complexity_score: score,
            ..AnalysisResult::default()
        };
        result.requirements.summary = RequirementSummary::new(1, 1, tools.len());
        result.requirements.categorized_requirements = categorized;

        BatchItem {
            outcome: ItemOutcome::Analyzed(Box::new(result)),
            file_info: None,
            text_info: Some(TextInfo { index: 0 }),
            row_info: None,
        }
    }

    fn failed() -> BatchItem {
        BatchItem {
            outcome: ItemOutcome::Failed {
                error: "unreadable".to_string(),
            },
            file_info: None,
            text_info: Some(TextInfo { index: 2 }),
            row_info: None,
        }
    }

    #[test]
    fn test_empty_batch_has_no_summary() {
        assert!(BatchSummary::from_items(&[]).is_none());
    }

    #[test]
    fn test_summary_totals() {
        let items = vec![
            analyzed(2.0, &["Git", "Jira"], 10),
            analyzed(3.333, &["Git"], 20),
            failed(),
        ];

        let summary = BatchSummary::from_items(&items).unwrap();
        assert_eq!(summary.total_files_processed, 3);
        assert_eq!(summary.successful_analyses, 2);
        assert_eq!(summary.failed_analyses, 1);
        assert!((summary.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.aggregate_metrics.total_word_count, 30);
        assert_eq!(summary.aggregate_metrics.total_text_length, 150);
        assert_eq!(summary.aggregate_metrics.average_complexity_score, 2.67);
        assert_eq!(summary.requirements_summary.total_requirements_found, 3);
        assert_eq!(summary.requirements_summary.average_requirements_per_job, 1.5);
        assert_eq!(summary.category_distribution[&RequirementCategory::Tool], 3);
        assert_eq!(summary.category_distribution[&RequirementCategory::Education], 0);
        // Default metadata is "completed"
        assert_eq!(summary.degraded_analyses, 0);
    }

    #[test]
    fn test_all_failed() {
        let summary = BatchSummary::from_items(&[failed()]).unwrap();
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.aggregate_metrics.average_complexity_score, 0.0);
        assert!(summary.category_distribution.is_empty());
    }

    #[test]
    fn test_report_text() {
        let summary = BatchSummary::from_items(&[analyzed(1.5, &["Git"], 4)]).unwrap();
        let report = summary.report();

        assert!(report.contains("Files processed: 1"));
        assert!(report.contains("Success rate: 100.0%"));
        assert!(report.contains("Tool"));
    }
}
