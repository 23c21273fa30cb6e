//! Feedback mutations and their optimistic local patches.
//!
//! After the server accepts a mutation the affected record is patched in
//! place so the list reflects the change immediately. The patch is
//! cosmetic: the view always refetches afterwards and the server's answer
//! replaces it.

use serde_json::{json, Value};

use super::types::{Contestation, ContestationResolution, FeedbackRecord, FeedbackStatus};
use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackAction {
    Accept,
    Contest {
        reason: String,
    },
    Review {
        resolution: ContestationResolution,
        reply: String,
    },
    Edit {
        comment: String,
        current_performance: f64,
    },
}

impl FeedbackAction {
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackAction::Accept => "accept",
            FeedbackAction::Contest { .. } => "contest",
            FeedbackAction::Review { .. } => "review",
            FeedbackAction::Edit { .. } => "edit",
        }
    }

    /// Reject input the server would refuse anyway.
    pub fn validate(&self) -> Result<(), DashboardError> {
        match self {
            FeedbackAction::Contest { reason } if reason.trim().is_empty() => Err(
                DashboardError::Invalid("A contestation needs a reason".to_string()),
            ),
            FeedbackAction::Edit {
                current_performance,
                ..
            } if !(0.0..=100.0).contains(current_performance) => Err(DashboardError::Invalid(
                format!("Performance must be between 0 and 100, got {}", current_performance),
            )),
            _ => Ok(()),
        }
    }

    /// HTTP method and path relative to the API base.
    pub fn endpoint(&self, id: i64) -> (&'static str, String) {
        match self {
            FeedbackAction::Accept => ("POST", format!("/feedbacks/{}/accept", id)),
            FeedbackAction::Contest { .. } => ("POST", format!("/feedbacks/{}/contest", id)),
            FeedbackAction::Review { .. } => ("POST", format!("/feedbacks/{}/review", id)),
            FeedbackAction::Edit { .. } => ("PUT", format!("/feedbacks/{}", id)),
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            FeedbackAction::Accept => None,
            FeedbackAction::Contest { reason } => Some(json!({ "reason": reason.trim() })),
            FeedbackAction::Review { resolution, reply } => Some(json!({
                "resolution": resolution,
                "reply": reply.trim(),
            })),
            FeedbackAction::Edit {
                comment,
                current_performance,
            } => Some(json!({
                "comment": comment,
                "current_performance": current_performance,
            })),
        }
    }
}

/// Patch every record with `id` to mirror the expected server state.
/// Returns whether anything was patched.
pub fn apply_optimistic(records: &mut [FeedbackRecord], id: i64, action: &FeedbackAction) -> bool {
    let mut patched = false;
    for record in records.iter_mut().filter(|r| r.id == id) {
        patch_record(record, action);
        patched = true;
    }
    patched
}

fn patch_record(record: &mut FeedbackRecord, action: &FeedbackAction) {
    match action {
        FeedbackAction::Accept => record.status = FeedbackStatus::Accepted,
        FeedbackAction::Contest { reason } => {
            record.status = FeedbackStatus::InReview;
            record.contestation = Some(Contestation {
                reason: reason.trim().to_string(),
                ..Contestation::default()
            });
        }
        FeedbackAction::Review { resolution, reply } => {
            // Either outcome closes the item for the agent.
            record.status = FeedbackStatus::Accepted;
            let contestation = record.contestation.get_or_insert_with(Contestation::default);
            contestation.resolution = Some(*resolution);
            contestation.reply = Some(reply.trim().to_string()).filter(|r| !r.is_empty());
        }
        FeedbackAction::Edit {
            comment,
            current_performance,
        } => {
            record.comment = comment.clone();
            if current_performance.is_finite() {
                record.current_performance = current_performance.clamp(0.0, 100.0);
            }
        }
    }
}
