use std::collections::HashSet;

use crate::error::ValidationError;
use crate::models::StudentRecord;

pub const ACADEMIC_SCORE_MAX: f64 = 10.0;
pub const MAX_SECTIONS: usize = 26;

pub fn validate_records(records: &[StudentRecord]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();

    for (row, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() {
            return Err(ValidationError::MissingField { row, field: "name" });
        }
        if record.identifier().is_empty() {
            return Err(ValidationError::MissingField { row, field: "email" });
        }
        if !record.academic_score.is_finite()
            || !(0.0..=ACADEMIC_SCORE_MAX).contains(&record.academic_score)
        {
            return Err(ValidationError::AcademicScoreOutOfRange {
                row,
                value: record.academic_score,
                max: ACADEMIC_SCORE_MAX,
            });
        }

        match record.raw_secondary_metric {
            Some(value) if value < 0 => {
                return Err(ValidationError::NegativeMetric { row, value });
            }
            Some(value) if u32::try_from(value).is_err() => {
                return Err(ValidationError::MetricOverflow { row, value });
            }
            Some(_) => {}
            None if record.handle().is_none() => {
                return Err(ValidationError::NoMetricSource { row });
            }
            None => {}
        }

        if !seen.insert(record.identifier()) {
            return Err(ValidationError::DuplicateIdentifier {
                row,
                email: record.identifier().to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_section_count(num_sections: i64, students: usize) -> Result<usize, ValidationError> {
    let invalid = || ValidationError::InvalidSectionCount {
        requested: num_sections,
        students,
        max_labels: MAX_SECTIONS,
    };

    let count = usize::try_from(num_sections).map_err(|_| invalid())?;
    if count == 0 || count > students || count > MAX_SECTIONS {
        return Err(invalid());
    }
    Ok(count)
}

#[cfg(test)]
pub(crate) fn student(name: &str, academic_score: f64, solved: Option<i64>) -> StudentRecord {
    StudentRecord {
        name: name.to_string(),
        handle: None,
        academic_score,
        raw_secondary_metric: solved,
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        previous_section: None,
    }
}
