use std::time::Instant;

use crate::models::{FilterCriteria, Opportunity, SearchOutcome};
use crate::store::CatalogStore;

/// Combines interpreter-produced filters with the user's explicit
/// selections. Pure and total; per-field precedence:
/// - type/category: manual wins if set, else the AI value.
/// - is_remote: the manual remote-only toggle forces true; otherwise the AI
///   value passes through (which may be unset).
/// - min_stipend and keyword only come from the interpreter.
/// - poster_user_id is supplied directly by company-scoped callers.
pub fn merge(ai: &FilterCriteria, manual: &FilterCriteria) -> FilterCriteria {
    FilterCriteria {
        kind: manual.kind.or(ai.kind),
        category: manual.category.or(ai.category),
        is_remote: if manual.is_remote == Some(true) {
            Some(true)
        } else {
            ai.is_remote
        },
        min_stipend: ai.min_stipend,
        keyword: ai.keyword.clone(),
        poster_user_id: manual.poster_user_id,
    }
}

/// True iff the record satisfies every set field in the criteria. Unset
/// criteria match everything.
pub fn matches(record: &Opportunity, criteria: &FilterCriteria) -> bool {
    if let Some(kind) = criteria.kind {
        if record.kind != kind {
            return false;
        }
    }
    if let Some(category) = criteria.category {
        if record.category != category {
            return false;
        }
    }
    if let Some(is_remote) = criteria.is_remote {
        if record.is_remote != is_remote {
            return false;
        }
    }
    if let Some(min) = criteria.min_stipend {
        if record.stipend_amount < min {
            return false;
        }
    }
    if let Some(keyword) = &criteria.keyword {
        // Separator-joined so a keyword cannot straddle two fields.
        let haystack = format!(
            "{}\n{}\n{}",
            record.title, record.description, record.organization
        )
        .to_lowercase();
        if !haystack.contains(&keyword.to_lowercase()) {
            return false;
        }
    }
    if let Some(poster) = criteria.poster_user_id {
        if record.posted_by_user_id != Some(poster) {
            return false;
        }
    }
    true
}

/// Linear scan in stored order (newest first). No scoring, no secondary
/// sort: the result is the catalog filtered in place. Empty is not an error.
pub fn filter_catalog(records: &[Opportunity], criteria: &FilterCriteria) -> Vec<Opportunity> {
    records
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect()
}

/// Runs the scan against the store and wraps it in the presentation
/// contract, with wall-clock timing for display.
pub fn execute(
    store: &CatalogStore,
    criteria: &FilterCriteria,
    synthesized_query: &str,
) -> SearchOutcome {
    let started = Instant::now();
    let results = filter_catalog(store.all(), criteria);
    SearchOutcome {
        synthesized_query: synthesized_query.to_string(),
        results,
        execution_time_ms: started.elapsed().as_millis() as u64,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, OpportunityType};
    use chrono::NaiveDate;

    fn record(id: i64, kind: OpportunityType, category: Category) -> Opportunity {
        Opportunity {
            id,
            title: format!("Posting {id}"),
            organization: "Test Org".to_string(),
            kind,
            category,
            location: "Remote".to_string(),
            is_remote: true,
            stipend_amount: 0,
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            description: "A posting used in tests.".to_string(),
            requirements: vec![],
            posted_at: None,
            posted_by_user_id: None,
        }
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria::default()
    }

    #[test]
    fn test_merge_manual_type_wins() {
        let ai = FilterCriteria {
            kind: Some(OpportunityType::Internship),
            ..criteria()
        };
        let manual = FilterCriteria {
            kind: Some(OpportunityType::Workshop),
            ..criteria()
        };
        assert_eq!(merge(&ai, &manual).kind, Some(OpportunityType::Workshop));
        // Without a manual choice, the AI value survives.
        assert_eq!(
            merge(&ai, &criteria()).kind,
            Some(OpportunityType::Internship)
        );
        assert_eq!(merge(&criteria(), &criteria()).kind, None);
    }

    #[test]
    fn test_merge_manual_category_wins() {
        let ai = FilterCriteria {
            category: Some(Category::Technology),
            ..criteria()
        };
        let manual = FilterCriteria {
            category: Some(Category::Academic),
            ..criteria()
        };
        assert_eq!(merge(&ai, &manual).category, Some(Category::Academic));
        assert_eq!(merge(&ai, &criteria()).category, Some(Category::Technology));
    }

    #[test]
    fn test_merge_remote_toggle_forces_true() {
        let ai = FilterCriteria {
            is_remote: Some(false),
            ..criteria()
        };
        let manual = FilterCriteria {
            is_remote: Some(true),
            ..criteria()
        };
        assert_eq!(merge(&ai, &manual).is_remote, Some(true));
        // Toggle off leaves the AI three-state value untouched.
        assert_eq!(merge(&ai, &criteria()).is_remote, Some(false));
        assert_eq!(merge(&criteria(), &criteria()).is_remote, None);
    }

    #[test]
    fn test_merge_passthrough_fields() {
        let ai = FilterCriteria {
            min_stipend: Some(1),
            keyword: Some("coding".to_string()),
            ..criteria()
        };
        let manual = FilterCriteria {
            poster_user_id: Some(500),
            ..criteria()
        };
        let merged = merge(&ai, &manual);
        assert_eq!(merged.min_stipend, Some(1));
        assert_eq!(merged.keyword.as_deref(), Some("coding"));
        assert_eq!(merged.poster_user_id, Some(500));
    }

    #[test]
    fn test_unset_criteria_matches_everything() {
        let records = vec![
            record(1, OpportunityType::Scholarship, Category::Technology),
            record(2, OpportunityType::Workshop, Category::ArtsDesign),
        ];
        let out = filter_catalog(&records, &criteria());
        assert_eq!(out, records);
    }

    #[test]
    fn test_stipend_and_type_predicates() {
        let mut scholarship = record(1, OpportunityType::Scholarship, Category::Technology);
        scholarship.stipend_amount = 5000;
        let records = vec![scholarship];

        let paid = FilterCriteria {
            min_stipend: Some(1),
            ..criteria()
        };
        assert_eq!(filter_catalog(&records, &paid).len(), 1);

        let internships = FilterCriteria {
            kind: Some(OpportunityType::Internship),
            ..criteria()
        };
        assert!(filter_catalog(&records, &internships).is_empty());
    }

    #[test]
    fn test_remote_filter_is_three_state() {
        let mut onsite = record(1, OpportunityType::Internship, Category::Technology);
        onsite.is_remote = false;
        let remote = record(2, OpportunityType::Internship, Category::Technology);
        let records = vec![onsite, remote];

        let only_onsite = FilterCriteria {
            is_remote: Some(false),
            ..criteria()
        };
        let out = filter_catalog(&records, &only_onsite);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);

        // Unset matches both; false is not conflated with "not requested".
        assert_eq!(filter_catalog(&records, &criteria()).len(), 2);
    }

    #[test]
    fn test_keyword_is_case_insensitive_across_fields() {
        let mut rec = record(1, OpportunityType::Mentorship, Category::ArtsDesign);
        rec.title = "Digital Music Production Mentorship".to_string();
        rec.description = "Learn Logic Pro and mixing.".to_string();
        rec.organization = "SoundWave".to_string();
        let records = vec![rec];

        for needle in ["music", "LOGIC PRO", "soundwave"] {
            let by_keyword = FilterCriteria {
                keyword: Some(needle.to_string()),
                ..criteria()
            };
            assert_eq!(filter_catalog(&records, &by_keyword).len(), 1, "{needle}");
        }

        let miss = FilterCriteria {
            keyword: Some("welding".to_string()),
            ..criteria()
        };
        assert!(filter_catalog(&records, &miss).is_empty());
    }

    #[test]
    fn test_keyword_does_not_straddle_field_boundaries() {
        let mut rec = record(1, OpportunityType::Internship, Category::Technology);
        rec.title = "Junior Dev".to_string();
        rec.description = "Build things".to_string();
        rec.organization = "Studio".to_string();
        let records = vec![rec];

        // "thingsstudio" would only match if description and organization
        // were concatenated without a separator.
        let straddle = FilterCriteria {
            keyword: Some("thingsstudio".to_string()),
            ..criteria()
        };
        assert!(filter_catalog(&records, &straddle).is_empty());
    }

    #[test]
    fn test_order_preserved_and_idempotent() {
        let records = vec![
            record(3, OpportunityType::Internship, Category::Technology),
            record(1, OpportunityType::Internship, Category::Technology),
            record(2, OpportunityType::Internship, Category::Technology),
        ];
        let by_type = FilterCriteria {
            kind: Some(OpportunityType::Internship),
            ..criteria()
        };
        let first = filter_catalog(&records, &by_type);
        let second = filter_catalog(&records, &by_type);
        assert_eq!(first, second);
        let ids: Vec<i64> = first.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_execute_on_empty_catalog() {
        let store = CatalogStore::new();
        let outcome = execute(&store, &criteria(), "SELECT * FROM opportunities");
        assert!(outcome.results.is_empty());
        assert!(outcome.error.is_none());
        assert_eq!(outcome.synthesized_query, "SELECT * FROM opportunities");
    }

    #[test]
    fn test_execute_against_store_snapshot() {
        let mut store = CatalogStore::new();
        store.insert(record(0, OpportunityType::Workshop, Category::Technology));
        store.insert(record(0, OpportunityType::Scholarship, Category::Academic));

        let workshops = FilterCriteria {
            kind: Some(OpportunityType::Workshop),
            ..criteria()
        };
        let outcome = execute(&store, &workshops, "q");
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].kind, OpportunityType::Workshop);
    }
}
