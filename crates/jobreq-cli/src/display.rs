//! Human-readable rendering of an analysis

use jobreq_core::AnalysisResult;

const RULE_WIDTH: usize = 60;
const MAX_TEXT_REQUIREMENTS: usize = 10;
const MAX_ITEMS_PER_CATEGORY: usize = 5;
const MAX_ITEM_CHARS: usize = 80;

/// Render the analysis report printed by `jobreq analyze`
pub fn render_analysis(analysis: &AnalysisResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let reqs = &analysis.requirements;
    let summary = &reqs.summary;

    let mut report = format!("\n{rule}\nJOB REQUIREMENTS ANALYSIS RESULTS\n{rule}\n");

    if analysis.is_degraded() {
        let reason = analysis
            .metadata
            .skip_reason
            .as_deref()
            .unwrap_or("unknown reason");
        report.push_str(&format!(
            "\nNote: entity recognition was skipped ({reason}); results are pattern-only.\n"
        ));
    }

    report.push_str(&format!(
        r#"
BASIC METRICS:
   Text Length: {} characters
   Word Count: {} words
   Complexity Score: {:.1}/10

REQUIREMENTS SUMMARY:
   Total Sentences: {}
   Requirement Sentences: {}
   Estimated Requirements: {}
   Requirement Density: {:.1}%
"#,
        analysis.text_length,
        analysis.word_count,
        analysis.complexity_score,
        summary.total_sentences,
        summary.requirement_sentences,
        summary.estimated_requirements,
        summary.requirement_density * 100.0,
    ));

    if !reqs.text_requirements.is_empty() {
        report.push_str("\nPATTERN-BASED REQUIREMENTS:\n");
        report.push_str(&numbered_list(&reqs.text_requirements, MAX_TEXT_REQUIREMENTS));
    }

    if !reqs.individual_requirements.is_empty() {
        report.push_str("\nLISTED REQUIREMENTS:\n");
        report.push_str(&numbered_list(
            &reqs.individual_requirements,
            MAX_TEXT_REQUIREMENTS,
        ));
    }

    if !reqs.categorized_requirements.is_empty() {
        report.push_str("\nCATEGORIZED REQUIREMENTS:\n");
        for (category, items) in reqs.categorized_requirements.iter() {
            if items.is_empty() {
                continue;
            }
            report.push_str(&format!("\n   {}:\n", category.title().to_uppercase()));
            for item in items.iter().take(MAX_ITEMS_PER_CATEGORY) {
                report.push_str(&format!("      - {}\n", truncate(item, MAX_ITEM_CHARS)));
            }
            if items.len() > MAX_ITEMS_PER_CATEGORY {
                report.push_str(&format!(
                    "      ... and {} more\n",
                    items.len() - MAX_ITEMS_PER_CATEGORY
                ));
            }
        }
    }

    if !analysis.recommendations.is_empty() {
        report.push_str("\nRECOMMENDATIONS:\n");
        for (i, rec) in analysis.recommendations.iter().enumerate() {
            report.push_str(&format!("   {}. {}\n", i + 1, rec));
        }
    }

    report
}

/// First `limit` items, numbered, then a count of the rest
fn numbered_list(items: &[String], limit: usize) -> String {
    let mut list: String = items
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, item)| format!("   {:2}. {}\n", i + 1, truncate(item, MAX_ITEM_CHARS)))
        .collect();

    if items.len() > limit {
        list.push_str(&format!("   ... and {} more\n", items.len() - limit));
    }
    list
}

/// Cut `text` to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
