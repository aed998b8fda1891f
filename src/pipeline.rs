use crate::config::EnrichConfig;
use crate::diff::changes_for;
use crate::enrich::{enrich_all, Fetcher};
use crate::error::ValidationError;
use crate::models::{ChangeEntry, EnrichedRecord, SectionedRecord, StudentRecord};
use crate::partition::{assign_sections, PartitionPolicy};
use crate::score::{rank, score};
use crate::validate::{validate_records, validate_section_count};

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub sectioned: Vec<SectionedRecord>,
    pub changes: Vec<ChangeEntry>,
    pub unresolved: Vec<String>,
}

pub async fn process_batch(
    records: Vec<StudentRecord>,
    fetcher: Option<&Fetcher>,
    num_sections: i64,
    policy: PartitionPolicy,
    config: &EnrichConfig,
) -> Result<BatchOutcome, ValidationError> {
    validate_records(&records)?;
    validate_section_count(num_sections, records.len())?;

    let enriched = enrich(records, fetcher, config).await;
    let unresolved = enriched
        .iter()
        .filter(|record| record.secondary_metric.is_none())
        .map(|record| record.student.identifier().to_string())
        .collect();

    let ranked = rank(score(enriched)?);
    let sectioned = assign_sections(ranked, num_sections, policy)?;
    let changes = changes_for(&sectioned);

    tracing::info!(
        students = sectioned.len(),
        sections = num_sections,
        policy = ?policy,
        changes = changes.len(),
        "Batch sectioned"
    );

    Ok(BatchOutcome {
        sectioned,
        changes,
        unresolved,
    })
}

async fn enrich(
    records: Vec<StudentRecord>,
    fetcher: Option<&Fetcher>,
    config: &EnrichConfig,
) -> Vec<EnrichedRecord> {
    let missing: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.raw_secondary_metric.is_none())
        .map(|(index, _)| index)
        .collect();

    let mut fetched = vec![None; records.len()];
    if let Some(fetcher) = fetcher {
        let handles: Vec<&str> = missing
            .iter()
            .map(|&index| records[index].handle().unwrap_or(""))
            .collect();
        let results = enrich_all(fetcher, &handles, config).await;
        for (&index, count) in missing.iter().zip(results) {
            fetched[index] = count;
        }
    } else if !missing.is_empty() {
        tracing::warn!(
            students = missing.len(),
            "No lookup source configured, missing solved counts score as zero"
        );
    }

    records
        .into_iter()
        .zip(fetched)
        .map(|(student, fetched)| {
            // Validation guarantees reported counts are within u32.
            let reported = student
                .raw_secondary_metric
                .and_then(|value| u32::try_from(value).ok());
            EnrichedRecord {
                secondary_metric: reported.or(fetched),
                student,
            }
        })
        .collect()
}
