use crate::error::ValidationError;
use crate::models::{EnrichedRecord, ScoredRecord};

pub const ACADEMIC_WEIGHT: f64 = 4.0;
pub const SECONDARY_WEIGHT: f64 = 2.0;
pub const NORMALIZED_MAX: f64 = 10.0;

pub fn score(batch: Vec<EnrichedRecord>) -> Result<Vec<ScoredRecord>, ValidationError> {
    let max_metric = batch
        .iter()
        .map(EnrichedRecord::metric_or_zero)
        .max()
        .unwrap_or(0);

    batch
        .into_iter()
        .enumerate()
        .map(|(row, enriched)| {
            let normalized = normalize(enriched.metric_or_zero(), max_metric);
            let final_score = ACADEMIC_WEIGHT * enriched.student.academic_score
                + SECONDARY_WEIGHT * normalized;

            if !final_score.is_finite() {
                return Err(ValidationError::NonFiniteScore { row });
            }

            Ok(ScoredRecord {
                enriched,
                normalized_secondary: round3(normalized),
                final_score: round3(final_score),
            })
        })
        .collect()
}

pub fn normalize(metric: u32, max_metric: u32) -> f64 {
    if max_metric == 0 {
        return 0.0;
    }
    f64::from(metric) / f64::from(max_metric) * NORMALIZED_MAX
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn rank(mut scored: Vec<ScoredRecord>) -> Vec<ScoredRecord> {
    scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    scored
}
