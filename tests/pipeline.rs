use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use section_sorter::load::{read_students, write_grouped};
use section_sorter::models::StudentRecord;
use section_sorter::{
    enrich_all, process_batch, EnrichConfig, FetchError, Fetcher, PartitionPolicy, RetryPolicy,
    SolvedCountSource, ValidationError,
};

struct DelayedTable {
    counts: HashMap<String, (u32, Duration)>,
}

#[async_trait]
impl SolvedCountSource for DelayedTable {
    async fn solved_count(&self, handle: &str) -> Result<u32, FetchError> {
        match self.counts.get(handle) {
            Some((count, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(*count)
            }
            None => Err(FetchError::Transport("connection refused".to_string())),
        }
    }
}

fn fetcher(entries: &[(&str, u32, u64)]) -> Fetcher {
    let counts = entries
        .iter()
        .map(|(handle, count, delay_ms)| {
            (handle.to_string(), (*count, Duration::from_millis(*delay_ms)))
        })
        .collect();
    Fetcher::new(
        Arc::new(DelayedTable { counts }),
        RetryPolicy {
            max_retries: 3,
            delay: Duration::from_millis(50),
        },
    )
}

const COHORT: &str = "\
Name,CGPA,LeetCode_Questions,LeetCode_ID,Email,Section
Ema Stone,5.0,0,,ema@example.com,A
Bo Chen,8.0,,bo_c,bo@example.com,A
Al Diaz,9.0,100,al_d,al@example.com,A
Dee Park,6.0,0,,dee@example.com,B
Cy Olsen,7.0,,ghost,cy@example.com,
";

#[tokio::test(start_paused = true)]
async fn csv_to_sections_with_enrichment() {
    let students = read_students(COHORT.as_bytes()).unwrap();
    let fetcher = fetcher(&[("bo_c", 50, 200), ("al_d", 999, 10)]);

    let outcome = process_batch(
        students,
        Some(&fetcher),
        2,
        PartitionPolicy::RankBanded,
        &EnrichConfig::default(),
    )
    .await
    .unwrap();

    let ranked: Vec<(&str, f64, &str)> = outcome
        .sectioned
        .iter()
        .map(|s| (s.identifier(), s.scored.final_score, s.section.as_str()))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("al@example.com", 56.0, "A"),
            ("bo@example.com", 42.0, "A"),
            ("cy@example.com", 28.0, "A"),
            ("dee@example.com", 24.0, "B"),
            ("ema@example.com", 20.0, "B"),
        ]
    );

    let changes: Vec<(&str, &str, &str)> = outcome
        .changes
        .iter()
        .map(|c| (c.identifier.as_str(), c.previous_label(), c.new_section.as_str()))
        .collect();
    assert_eq!(
        changes,
        vec![
            ("cy@example.com", "unassigned", "A"),
            ("ema@example.com", "A", "B"),
        ]
    );
    assert_eq!(outcome.unresolved, vec!["cy@example.com".to_string()]);

    let mut out = Vec::new();
    write_grouped(&mut out, &outcome.sectioned).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 6);
}

#[tokio::test(start_paused = true)]
async fn tertile_policy_mixes_the_cohort() {
    let students: Vec<StudentRecord> = (0..12i32)
        .map(|i| StudentRecord {
            name: format!("Student {i}"),
            handle: None,
            academic_score: 10.0 - f64::from(i) * 0.5,
            raw_secondary_metric: Some(i64::from(i)),
            email: format!("s{i}@example.com"),
            previous_section: None,
        })
        .collect();

    let outcome = process_batch(
        students,
        None,
        3,
        PartitionPolicy::TertileBalanced,
        &EnrichConfig::default(),
    )
    .await
    .unwrap();

    for label in ["A", "B", "C"] {
        let members: Vec<usize> = outcome
            .sectioned
            .iter()
            .enumerate()
            .filter(|(_, s)| s.section == label)
            .map(|(rank, _)| rank)
            .collect();
        assert_eq!(members.len(), 4);
        assert!(members.iter().any(|&rank| rank < 4));
        assert!(members.iter().any(|&rank| rank >= 8));
    }
}

#[tokio::test(start_paused = true)]
async fn ghost_handle_is_absent_after_retries() {
    let fetcher = fetcher(&[]);
    let results = enrich_all(&fetcher, &["ghost"], &EnrichConfig::default()).await;
    assert_eq!(results, vec![None]);
}

#[tokio::test]
async fn row_without_any_metric_source_fails_the_batch() {
    let data = "Name,CGPA,LeetCode_Questions,LeetCode_ID,Email,Section\n\
                Avery,8.0,12,,avery@example.com,\n\
                Jules,7.0,,,jules@example.com,\n";
    let students = read_students(data.as_bytes()).unwrap();

    let result = process_batch(
        students,
        None,
        1,
        PartitionPolicy::RankBanded,
        &EnrichConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(ValidationError::NoMetricSource { row: 1 })));
}
