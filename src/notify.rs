use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{ChangeEntry, SectionedRecord};

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn section_changed(
        &self,
        student: &SectionedRecord,
        change: &ChangeEntry,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub failed: usize,
}

pub async fn dispatch(
    sink: &dyn NotificationSink,
    sectioned: &[SectionedRecord],
    changes: &[ChangeEntry],
) -> DispatchSummary {
    let by_identifier: HashMap<&str, &SectionedRecord> = sectioned
        .iter()
        .map(|record| (record.identifier(), record))
        .collect();

    let mut summary = DispatchSummary::default();
    for change in changes {
        let Some(student) = by_identifier.get(change.identifier.as_str()) else {
            tracing::warn!(identifier = %change.identifier, "Change for unknown student skipped");
            summary.failed += 1;
            continue;
        };

        match sink.section_changed(student, change).await {
            Ok(()) => summary.delivered += 1,
            Err(e) => {
                tracing::error!(
                    identifier = %change.identifier,
                    error = ?e,
                    "Section change notification failed"
                );
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        delivered = summary.delivered,
        failed = summary.failed,
        "Section change notifications dispatched"
    );
    summary
}

pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn section_changed(
        &self,
        student: &SectionedRecord,
        change: &ChangeEntry,
    ) -> anyhow::Result<()> {
        tracing::info!(
            name = %student.student().name,
            email = %change.identifier,
            previous = %change.previous_label(),
            current = %change.new_section,
            final_score = student.scored.final_score,
            "Section changed"
        );
        Ok(())
    }
}
