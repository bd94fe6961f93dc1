use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::Rating;
use crate::submissions::repo::{Review, Submission};

/// At most this many submissions (and reviews) feed one summary.
pub const ANALYTICS_CAP: i64 = 1000;

/// How many of the loaded submissions are echoed back as "recent".
pub const RECENT_WINDOW: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_submissions: usize,
    pub rating_distribution: BTreeMap<String, usize>,
    pub language_distribution: BTreeMap<String, usize>,
    pub category_distribution: BTreeMap<String, usize>,
    pub recent_submissions: Vec<Submission>,
}

/// Pure aggregation over the loaded rows.
///
/// The rating distribution is pre-seeded with all three labels at zero so the
/// client always sees every bucket; a label outside the known three (from an
/// older record, say) still gets its own bucket rather than being dropped.
/// Recent submissions are the first `RECENT_WINDOW` rows in storage order,
/// which `Submission::list_by_user` keeps at created_at descending.
pub fn summarize(submissions: Vec<Submission>, reviews: &[Review]) -> AnalyticsSummary {
    let mut rating_distribution: BTreeMap<String, usize> = Rating::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), 0))
        .collect();
    for review in reviews {
        *rating_distribution.entry(review.rating.clone()).or_insert(0) += 1;
    }

    let mut language_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for sub in &submissions {
        *language_distribution.entry(sub.language.clone()).or_insert(0) += 1;
        *category_distribution.entry(sub.category.clone()).or_insert(0) += 1;
    }

    let total_submissions = submissions.len();
    let recent_submissions: Vec<Submission> =
        submissions.into_iter().take(RECENT_WINDOW).collect();

    AnalyticsSummary {
        total_submissions,
        rating_distribution,
        language_distribution,
        category_distribution,
        recent_submissions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn submission(language: &str, category: &str) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            language: language.into(),
            category: category.into(),
            problem_description: "p".into(),
            code: "c".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn review(submission_id: Uuid, rating: &str) -> Review {
        Review {
            id: Uuid::new_v4(),
            submission_id,
            time_complexity: "O(n)".into(),
            space_complexity: "O(1)".into(),
            edge_cases: vec![],
            code_structure: "fine".into(),
            optimization_suggestions: vec![],
            interview_readiness: "ok".into(),
            rating: rating.into(),
            optimized_code: "c".into(),
            interview_questions: vec![],
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_input_still_carries_all_rating_buckets() {
        let summary = summarize(vec![], &[]);
        assert_eq!(summary.total_submissions, 0);
        assert_eq!(summary.rating_distribution.len(), 3);
        assert_eq!(summary.rating_distribution["Beginner"], 0);
        assert_eq!(summary.rating_distribution["Interview-Ready"], 0);
        assert_eq!(summary.rating_distribution["Production-Grade"], 0);
        assert!(summary.recent_submissions.is_empty());
    }

    #[test]
    fn distributions_sum_to_total() {
        let subs = vec![
            submission("python", "DSA"),
            submission("python", "System Design"),
            submission("rust", "DSA"),
        ];
        let reviews = vec![
            review(subs[0].id, "Beginner"),
            review(subs[1].id, "Interview-Ready"),
        ];
        let summary = summarize(subs, &reviews);

        assert_eq!(summary.total_submissions, 3);
        assert_eq!(
            summary.language_distribution.values().sum::<usize>(),
            summary.total_submissions
        );
        assert_eq!(
            summary.category_distribution.values().sum::<usize>(),
            summary.total_submissions
        );
        assert!(summary.rating_distribution.values().sum::<usize>() <= summary.total_submissions);
        assert_eq!(summary.language_distribution["python"], 2);
        assert_eq!(summary.category_distribution["DSA"], 2);
        assert_eq!(summary.rating_distribution["Interview-Ready"], 1);
    }

    #[test]
    fn unknown_rating_label_gets_its_own_bucket() {
        let subs = vec![submission("go", "DSA")];
        let reviews = vec![review(subs[0].id, "Legacy-Label")];
        let summary = summarize(subs, &reviews);
        assert_eq!(summary.rating_distribution["Legacy-Label"], 1);
        assert_eq!(summary.rating_distribution.len(), 4);
    }

    #[test]
    fn recent_window_caps_at_five_in_input_order() {
        let subs: Vec<Submission> = (0..8).map(|_| submission("python", "DSA")).collect();
        let first_id = subs[0].id;
        let summary = summarize(subs, &[]);
        assert_eq!(summary.recent_submissions.len(), RECENT_WINDOW);
        assert_eq!(summary.recent_submissions[0].id, first_id);
        assert_eq!(summary.total_submissions, 8);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = summarize(vec![submission("python", "DSA")], &[]);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("totalSubmissions"));
        assert!(json.contains("ratingDistribution"));
        assert!(json.contains("recentSubmissions"));
    }
}
