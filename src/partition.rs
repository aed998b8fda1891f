use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{ScoredRecord, SectionedRecord};
use crate::validate::validate_section_count;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartitionPolicy {
    /// Contiguous score bands: everyone in A outranks everyone in B.
    #[default]
    RankBanded,
    /// Top, middle and bottom thirds dealt round-robin so every section gets a mix.
    TertileBalanced,
}

pub fn section_label(index: usize) -> String {
    char::from(b'A' + index as u8).to_string()
}

pub fn assign_sections(
    ranked: Vec<ScoredRecord>,
    num_sections: i64,
    policy: PartitionPolicy,
) -> Result<Vec<SectionedRecord>, ValidationError> {
    let sections = validate_section_count(num_sections, ranked.len())?;
    let indices = match policy {
        PartitionPolicy::RankBanded => rank_banded(ranked.len(), sections),
        PartitionPolicy::TertileBalanced => tertile_balanced(ranked.len(), sections),
    };

    Ok(ranked
        .into_iter()
        .zip(indices)
        .map(|(scored, index)| SectionedRecord {
            scored,
            section: section_label(index),
        })
        .collect())
}

fn rank_banded(students: usize, sections: usize) -> Vec<usize> {
    let base = students / sections;
    let remainder = students % sections;

    let mut indices = Vec::with_capacity(students);
    for section in 0..sections {
        let count = base + usize::from(section < remainder);
        indices.extend(std::iter::repeat(section).take(count));
    }
    indices
}

// The round-robin cursor carries over between tertiles. Restarting it at A for
// each tertile would leave trailing sections short, or empty when a tertile is
// smaller than the section count.
fn tertile_balanced(students: usize, sections: usize) -> Vec<usize> {
    let bounds = [0, students / 3, 2 * students / 3, students];

    let mut indices = Vec::with_capacity(students);
    let mut cursor = 0;
    for tertile in bounds.windows(2) {
        for _ in tertile[0]..tertile[1] {
            indices.push(cursor % sections);
            cursor += 1;
        }
    }
    indices
}
