use std::collections::HashMap;

use crate::config::EnrichConfig;
use crate::enrich::{enrich_all, Fetcher};
use crate::error::ValidationError;
use crate::models::{StudentRecord, VerificationOutcome};
use crate::validate::validate_records;

pub fn verify(
    records: &[StudentRecord],
    fetched: &[Option<u32>],
) -> Result<Vec<VerificationOutcome>, ValidationError> {
    records
        .iter()
        .zip(fetched.iter().copied().chain(std::iter::repeat(None)))
        .enumerate()
        .map(|(row, (record, actual))| {
            let identifier = record.identifier().to_string();
            let outcome = match (record.raw_secondary_metric, actual, record.handle()) {
                (Some(value), _, _) if value < 0 => {
                    return Err(ValidationError::NegativeMetric { row, value });
                }
                (Some(reported), Some(actual), Some(_)) if reported == i64::from(actual) => {
                    VerificationOutcome::Verified {
                        identifier,
                        count: actual,
                    }
                }
                (Some(reported), Some(actual), Some(_)) => VerificationOutcome::Mismatch {
                    identifier,
                    reported,
                    actual,
                },
                _ => VerificationOutcome::Unverifiable { identifier },
            };
            Ok(outcome)
        })
        .collect()
}

pub async fn verify_reported(
    fetcher: &Fetcher,
    records: &[StudentRecord],
    config: &EnrichConfig,
) -> Result<Vec<VerificationOutcome>, ValidationError> {
    validate_records(records)?;

    let fetcher = fetcher.with_policy(config.verify_policy());
    let handles: Vec<&str> = records
        .iter()
        .map(|record| match record.raw_secondary_metric {
            Some(_) => record.handle().unwrap_or(""),
            None => "",
        })
        .collect();

    let fetched = enrich_all(&fetcher, &handles, config).await;
    let outcomes = verify(records, &fetched)?;

    let mismatched = outcomes
        .iter()
        .filter(|o| matches!(o, VerificationOutcome::Mismatch { .. }))
        .count();
    let unverifiable = outcomes
        .iter()
        .filter(|o| matches!(o, VerificationOutcome::Unverifiable { .. }))
        .count();
    tracing::info!(
        students = records.len(),
        mismatched,
        unverifiable,
        "Verified reported solved counts"
    );

    Ok(outcomes)
}

pub fn apply_corrections(
    mut records: Vec<StudentRecord>,
    outcomes: &[VerificationOutcome],
) -> Vec<StudentRecord> {
    let corrections: HashMap<&str, u32> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            VerificationOutcome::Mismatch {
                identifier, actual, ..
            } => Some((identifier.as_str(), *actual)),
            _ => None,
        })
        .collect();

    for record in &mut records {
        if let Some(actual) = corrections.get(record.identifier()) {
            record.raw_secondary_metric = Some(i64::from(*actual));
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::RetryPolicy;
    use crate::enrich::fetcher::fakes::TableSource;
    use crate::validate::student;

    fn with_handle(mut record: StudentRecord, handle: &str) -> StudentRecord {
        record.handle = Some(handle.to_string());
        record
    }

    #[test]
    fn classifies_each_student() {
        let records = vec![
            with_handle(student("Avery", 9.0, Some(120)), "avery"),
            with_handle(student("Jules", 8.0, Some(80)), "jules"),
            with_handle(student("Kiara", 7.0, Some(60)), "kiara"),
            student("Noor", 6.0, Some(10)),
        ];
        let outcomes = verify(&records, &[Some(120), Some(95), None, Some(10)]).unwrap();

        assert!(matches!(outcomes[0], VerificationOutcome::Verified { count: 120, .. }));
        assert_eq!(
            outcomes[1],
            VerificationOutcome::Mismatch {
                identifier: "jules@example.com".to_string(),
                reported: 80,
                actual: 95,
            }
        );
        assert!(matches!(outcomes[2], VerificationOutcome::Unverifiable { .. }));
        assert!(matches!(outcomes[3], VerificationOutcome::Unverifiable { .. }));
    }

    #[test]
    fn corrections_only_touch_mismatches() {
        let records = vec![
            with_handle(student("Avery", 9.0, Some(120)), "avery"),
            with_handle(student("Jules", 8.0, Some(80)), "jules"),
        ];
        let outcomes = verify(&records, &[Some(120), Some(95)]).unwrap();
        let corrected = apply_corrections(records, &outcomes);
        assert_eq!(corrected[0].raw_secondary_metric, Some(120));
        assert_eq!(corrected[1].raw_secondary_metric, Some(95));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_handle_is_reported_as_unverifiable() {
        let records = vec![
            with_handle(student("Avery", 9.0, Some(120)), "avery"),
            with_handle(student("Ghost", 5.0, Some(300)), "ghost"),
        ];
        let source = Arc::new(TableSource::new(&[("avery", 121)]));
        let fetcher = Fetcher::new(
            source.clone(),
            RetryPolicy {
                max_retries: 3,
                delay: Duration::from_secs(2),
            },
        );

        let config = EnrichConfig {
            verify_delay: Duration::from_secs(5),
            ..EnrichConfig::default()
        };
        let started = tokio::time::Instant::now();
        let outcomes = verify_reported(&fetcher, &records, &config).await.unwrap();

        assert!(matches!(outcomes[0], VerificationOutcome::Mismatch { actual: 121, .. }));
        assert!(matches!(outcomes[1], VerificationOutcome::Unverifiable { .. }));
        assert_eq!(source.calls_for("ghost"), 3);
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[test]
    fn negative_reported_count_is_not_a_mismatch() {
        let records = vec![
            with_handle(student("Avery", 9.0, Some(120)), "avery"),
            with_handle(student("Neg", 6.0, Some(-5)), "neg"),
        ];
        assert_eq!(
            verify(&records, &[Some(120), Some(7)]),
            Err(ValidationError::NegativeMetric { row: 1, value: -5 })
        );
    }

    #[tokio::test]
    async fn invalid_batch_fails_before_any_lookup() {
        let records = vec![with_handle(student("Neg", 6.0, Some(-5)), "neg")];
        let source = Arc::new(TableSource::new(&[("neg", 7)]));
        let fetcher = Fetcher::new(source.clone(), RetryPolicy::default());

        let result = verify_reported(&fetcher, &records, &EnrichConfig::default()).await;

        assert_eq!(result, Err(ValidationError::NegativeMetric { row: 0, value: -5 }));
        assert_eq!(source.calls_for("neg"), 0);
    }

    #[test]
    fn padded_email_matches_its_correction() {
        let mut padded = with_handle(student("Jules", 8.0, Some(80)), "jules");
        padded.email = "  jules@example.com ".to_string();
        let records = vec![padded];

        let outcomes = verify(&records, &[Some(95)]).unwrap();
        assert_eq!(outcomes[0].identifier(), "jules@example.com");

        let corrected = apply_corrections(records, &outcomes);
        assert_eq!(corrected[0].raw_secondary_metric, Some(95));
    }
}
