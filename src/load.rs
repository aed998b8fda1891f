use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::models::{SectionedRecord, StudentRecord};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "CGPA")]
    cgpa: f64,
    #[serde(rename = "LeetCode_Questions", default)]
    leetcode_questions: Option<i64>,
    #[serde(rename = "LeetCode_ID", default)]
    leetcode_id: Option<String>,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Section", default)]
    section: Option<String>,
}

impl From<CsvRow> for StudentRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            name: row.name,
            handle: row.leetcode_id,
            academic_score: row.cgpa,
            raw_secondary_metric: row.leetcode_questions,
            email: row.email,
            previous_section: row.section,
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupedRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "CGPA")]
    cgpa: f64,
    #[serde(rename = "LeetCode_Questions")]
    leetcode_questions: Option<u32>,
    #[serde(rename = "Normalized_LeetCode")]
    normalized_leetcode: f64,
    #[serde(rename = "Final_Score")]
    final_score: f64,
    #[serde(rename = "Previous_Section")]
    previous_section: Option<&'a str>,
    #[serde(rename = "Section")]
    section: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
}

pub fn read_students<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<StudentRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut students = Vec::new();

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid student row {}", line + 1))?;
        students.push(row.into());
    }

    Ok(students)
}

pub fn load_students(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_students(file)
}

pub fn write_grouped<W: std::io::Write>(writer: W, sectioned: &[SectionedRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for record in sectioned {
        let student = record.student();
        writer.serialize(GroupedRow {
            name: &student.name,
            cgpa: student.academic_score,
            leetcode_questions: record.scored.enriched.secondary_metric,
            normalized_leetcode: record.scored.normalized_secondary,
            final_score: record.scored.final_score,
            previous_section: student.previous_section(),
            section: &record.section,
            email: student.identifier(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

pub fn save_grouped(path: &Path, sectioned: &[SectionedRecord]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_grouped(file, sectioned)
}
