use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    pub handle: Option<String>,
    pub academic_score: f64,
    pub raw_secondary_metric: Option<i64>,
    pub email: String,
    pub previous_section: Option<String>,
}

impl StudentRecord {
    pub fn identifier(&self) -> &str {
        self.email.trim()
    }

    pub fn handle(&self) -> Option<&str> {
        self.handle
            .as_deref()
            .map(str::trim)
            .filter(|handle| !handle.is_empty())
    }

    pub fn previous_section(&self) -> Option<&str> {
        self.previous_section
            .as_deref()
            .map(str::trim)
            .filter(|section| !section.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub student: StudentRecord,
    pub secondary_metric: Option<u32>,
}

impl EnrichedRecord {
    pub fn metric_or_zero(&self) -> u32 {
        self.secondary_metric.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub enriched: EnrichedRecord,
    pub normalized_secondary: f64,
    pub final_score: f64,
}

impl ScoredRecord {
    pub fn student(&self) -> &StudentRecord {
        &self.enriched.student
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionedRecord {
    pub scored: ScoredRecord,
    pub section: String,
}

impl SectionedRecord {
    pub fn student(&self) -> &StudentRecord {
        self.scored.student()
    }

    pub fn identifier(&self) -> &str {
        self.student().identifier()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    pub identifier: String,
    pub previous_section: Option<String>,
    pub new_section: String,
}

impl ChangeEntry {
    pub fn previous_label(&self) -> &str {
        self.previous_section.as_deref().unwrap_or(UNASSIGNED)
    }
}

pub const UNASSIGNED: &str = "unassigned";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified { identifier: String, count: u32 },
    Mismatch { identifier: String, reported: i64, actual: u32 },
    Unverifiable { identifier: String },
}

impl VerificationOutcome {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Verified { identifier, .. }
            | Self::Mismatch { identifier, .. }
            | Self::Unverifiable { identifier } => identifier,
        }
    }
}
