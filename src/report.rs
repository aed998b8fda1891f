use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{SectionedRecord, VerificationOutcome};
use crate::partition::PartitionPolicy;
use crate::pipeline::BatchOutcome;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSummary {
    pub section: String,
    pub count: usize,
    pub avg_score: f64,
    pub top_score: f64,
    pub bottom_score: f64,
}

pub fn summarize_by_section(sectioned: &[SectionedRecord]) -> Vec<SectionSummary> {
    let mut map: std::collections::BTreeMap<&str, Vec<f64>> = std::collections::BTreeMap::new();

    for record in sectioned {
        map.entry(record.section.as_str())
            .or_default()
            .push(record.scored.final_score);
    }

    map.into_iter()
        .map(|(section, scores)| SectionSummary {
            section: section.to_string(),
            count: scores.len(),
            avg_score: if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            },
            top_score: scores.iter().copied().fold(f64::MIN, f64::max),
            bottom_score: scores.iter().copied().fold(f64::MAX, f64::min),
        })
        .collect()
}

pub fn build_report(
    generated_on: NaiveDate,
    policy: PartitionPolicy,
    outcome: &BatchOutcome,
) -> String {
    let summaries = summarize_by_section(&outcome.sectioned);

    let mut output = String::new();
    let policy_label = match policy {
        PartitionPolicy::RankBanded => "rank-banded",
        PartitionPolicy::TertileBalanced => "tertile-balanced",
    };

    let _ = writeln!(output, "# Section Assignment Report");
    let _ = writeln!(
        output,
        "Generated on {} for {} students ({} policy)",
        generated_on,
        outcome.sectioned.len(),
        policy_label
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Sections");

    for summary in &summaries {
        let _ = writeln!(
            output,
            "- {}: {} students (avg {:.2}, range {:.2} to {:.2})",
            summary.section,
            summary.count,
            summary.avg_score,
            summary.bottom_score,
            summary.top_score
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Students");

    for record in outcome.sectioned.iter().take(10) {
        let _ = writeln!(
            output,
            "- {} ({}) section {} score {:.3}",
            record.student().name,
            record.identifier(),
            record.section,
            record.scored.final_score
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Section Changes");

    if outcome.changes.is_empty() {
        let _ = writeln!(output, "No section changes in this batch.");
    } else {
        for change in &outcome.changes {
            let _ = writeln!(
                output,
                "- {}: {} -> {}",
                change.identifier,
                change.previous_label(),
                change.new_section
            );
        }
    }

    if !outcome.unresolved.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Unresolved Solved Counts");
        for identifier in &outcome.unresolved {
            let _ = writeln!(output, "- {} (scored as 0)", identifier);
        }
    }

    output
}

pub fn build_verification_report(generated_on: NaiveDate, outcomes: &[VerificationOutcome]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Solved Count Verification");
    let _ = writeln!(output, "Generated on {}", generated_on);
    let _ = writeln!(output);

    if outcomes.is_empty() {
        let _ = writeln!(output, "No students to verify.");
        return output;
    }

    for outcome in outcomes {
        let line = match outcome {
            VerificationOutcome::Verified { identifier, count } => {
                format!("- {identifier}: verified ({count})")
            }
            VerificationOutcome::Mismatch {
                identifier,
                reported,
                actual,
            } => format!("- {identifier}: reported {reported}, actual {actual}"),
            VerificationOutcome::Unverifiable { identifier } => {
                format!("- {identifier}: could not verify")
            }
        };
        let _ = writeln!(output, "{line}");
    }

    output
}
