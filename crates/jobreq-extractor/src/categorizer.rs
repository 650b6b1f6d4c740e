//! Categorizer
//!
//! Files pattern snippets under the category their rule declared and entity
//! spans under their normalized category.

use jobreq_core::{CategorizedRequirements, Entity, ExtractedSnippet};

use crate::patterns::CategoryMatches;

/// Merge pattern matches and entities into the closed category set.
///
/// Pattern snippets are inserted first, then entities, each list deduplicated
/// by exact (case-sensitive) string equality in first-seen order.
pub fn categorize(pattern_matches: &CategoryMatches, entities: &[Entity]) -> CategorizedRequirements {
    let snippets = pattern_matches
        .iter()
        .flat_map(|(category, found)| {
            found
                .iter()
                .map(move |text| ExtractedSnippet::from_pattern(text.as_str(), *category))
        })
        .chain(entities.iter().map(ExtractedSnippet::from_entity));

    categorize_snippets(snippets)
}

/// Categorize an already tagged snippet stream
pub fn categorize_snippets(
    snippets: impl IntoIterator<Item = ExtractedSnippet>,
) -> CategorizedRequirements {
    let mut categorized = CategorizedRequirements::new();
    for snippet in snippets {
        if !snippet.text.trim().is_empty() {
            categorized.insert(snippet.category, snippet.text);
        }
    }
    categorized
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobreq_core::RequirementCategory;

    fn matches(entries: &[(RequirementCategory, &[&str])]) -> CategoryMatches {
        entries
            .iter()
            .map(|(c, found)| (*c, found.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_every_category_present() {
        let categorized = categorize(&CategoryMatches::new(), &[]);
        assert_eq!(categorized.iter().count(), RequirementCategory::ALL.len());
        assert!(categorized.is_empty());
    }

    #[test]
    fn test_patterns_then_entities() {
        let pattern_matches = matches(&[(RequirementCategory::TechnicalSkill, &["Python"])]);
        let entities = vec![
            Entity::new("Python", "MISC", 0.99, RequirementCategory::TechnicalSkill),
            Entity::new("Django", "MISC", 0.91, RequirementCategory::TechnicalSkill),
        ];

        let categorized = categorize(&pattern_matches, &entities);
        assert_eq!(
            categorized.get(RequirementCategory::TechnicalSkill),
            ["Python", "Django"]
        );
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let pattern_matches = matches(&[(RequirementCategory::Tool, &["Git"])]);
        let entities = vec![Entity::new("git", "TOOL", 0.9, RequirementCategory::Tool)];

        let categorized = categorize(&pattern_matches, &entities);
        assert_eq!(categorized.get(RequirementCategory::Tool), ["Git", "git"]);
    }

    #[test]
    fn test_same_phrase_in_two_categories() {
        let pattern_matches = matches(&[(RequirementCategory::TechnicalSkill, &["Docker"])]);
        let entities = vec![Entity::new("Docker", "TOOL", 0.95, RequirementCategory::Tool)];

        let categorized = categorize(&pattern_matches, &entities);
        assert!(categorized.contains(RequirementCategory::TechnicalSkill, "Docker"));
        assert!(categorized.contains(RequirementCategory::Tool, "Docker"));
        assert_eq!(categorized.distinct_requirements(), 1);
        assert_eq!(categorized.populated_categories(), 2);
    }

    #[test]
    fn test_unknown_label_lands_in_other() {
        let entities = vec![Entity::new("Acme", "ORG", 0.99, RequirementCategory::Other)];
        let categorized = categorize(&CategoryMatches::new(), &entities);
        assert_eq!(categorized.get(RequirementCategory::Other), ["Acme"]);
    }
}
