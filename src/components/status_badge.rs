use leptos::prelude::*;

use crate::feedback::{FeedbackStatus, Origin};

#[component]
pub fn StatusBadge(status: FeedbackStatus) -> impl IntoView {
    let class = match status {
        FeedbackStatus::Pending => "status-badge status-pending",
        FeedbackStatus::Accepted => "status-badge status-accepted",
        FeedbackStatus::InReview => "status-badge status-review",
    };

    view! { <span class=class>{status.label()}</span> }
}

#[component]
pub fn OriginBadge(origin: Origin) -> impl IntoView {
    let class = match origin {
        Origin::Ai => "origin-badge origin-ai",
        Origin::Monitor => "origin-badge origin-monitor",
    };

    view! { <span class=class>{origin.label()}</span> }
}
