//! Feedback records: decoding, aggregation, paging and mutations.

pub mod actions;
pub mod aggregate;
pub mod pages;
pub mod query;
pub mod types;

pub use actions::{apply_optimistic, FeedbackAction};
pub use aggregate::{
    aggregate, deduplicate, AgentGroup, EvaluationGroup, StatusCounts, UNASSIGNED_AGENT,
};
pub use pages::{FeedbackPages, PageRequest};
pub use query::RecordQuery;
pub use types::{
    decode_records, Contestation, ContestationResolution, FeedbackRecord, FeedbackStatus, Origin,
};
