use super::types::{FeedbackRecord, FeedbackStatus, Origin};
use crate::format::format_agent_name;

/// Client-side narrowing of an already-fetched listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub status: Option<FeedbackStatus>,
    pub origin: Option<Origin>,
    /// Case-insensitive substring over agent name, criterion, comment and
    /// evaluation id.
    pub search: String,
}

impl RecordQuery {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.origin.is_none() && self.search.trim().is_empty()
    }

    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.origin.is_some_and(|o| o != record.origin) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            format_agent_name(record),
            record.criterion_label(),
            record.criterion_name.clone(),
            record.comment.clone(),
            record.evaluation_id.clone(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, records: &[FeedbackRecord]) -> Vec<FeedbackRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
