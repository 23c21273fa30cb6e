use leptos::prelude::*;

use crate::components::feedback_forms::{ContestForm, EditForm, ReviewForm};
use crate::components::status_badge::{OriginBadge, StatusBadge};
use crate::feedback::{
    Contestation, ContestationResolution, FeedbackAction, FeedbackRecord,
};
use crate::format::{format_percent, performance_tier};
use crate::session::use_session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowMode {
    Idle,
    Contesting,
    Editing,
}

fn contestation_view(contestation: Contestation) -> impl IntoView {
    view! {
        <div class="contestation">
            <span class="contestation-label">"Contested: "</span>
            <span class="contestation-reason">{contestation.reason}</span>
            {contestation.resolution.map(|r| view! {
                <span class="contestation-resolution">{r.label()}</span>
            })}
            {contestation.reply.map(|r| view! { <p class="contestation-reply">{r}</p> })}
        </div>
    }
}

/// One criterion-level feedback item with the actions the session allows.
#[component]
pub fn FeedbackRow(
    record: FeedbackRecord,
    #[prop(into)] on_action: Callback<(i64, FeedbackAction)>,
    /// Show the monitor's review form for contested items.
    #[prop(default = false)]
    reviewing: bool,
) -> impl IntoView {
    let session = use_session();
    let (mode, set_mode) = signal(RowMode::Idle);
    let id = record.id;

    let permission = |action: FeedbackAction| {
        let record = record.clone();
        Signal::derive(move || session.session.with(|s| s.can_perform(&record, &action).is_ok()))
    };
    let can_accept = permission(FeedbackAction::Accept);
    let can_contest = permission(FeedbackAction::Contest {
        reason: String::new(),
    });
    let can_edit = permission(FeedbackAction::Edit {
        comment: String::new(),
        current_performance: 0.0,
    });
    let can_review = permission(FeedbackAction::Review {
        resolution: ContestationResolution::Rejected,
        reply: String::new(),
    });
    let idle = move || mode.get() == RowMode::Idle;

    let performance = record.current_performance;
    let performance_class = format!("performance {}", performance_tier(performance).css_class());
    let comment = record.comment.clone();

    view! {
        <div class="feedback-row">
            <div class="feedback-main">
                <span class="criterion-label">{record.criterion_label()}</span>
                {record.criterion_category.clone().map(|c| view! {
                    <span class="criterion-category">{c}</span>
                })}
                <span class=performance_class>{format_percent(Some(performance))}</span>
                <StatusBadge status=record.status />
                <OriginBadge origin=record.origin />
            </div>
            <p class="feedback-comment">{record.comment.clone()}</p>
            <span class="feedback-date">{record.created_at.clone()}</span>
            {record.contestation.clone().map(contestation_view)}

            <div class="feedback-actions">
                <Show when=move || can_accept.get() && idle()>
                    <button
                        class="btn btn-primary btn-small"
                        on:click=move |_| on_action.run((id, FeedbackAction::Accept))
                    >
                        "Accept"
                    </button>
                </Show>
                <Show when=move || can_contest.get() && idle()>
                    <button
                        class="btn btn-secondary btn-small"
                        on:click=move |_| set_mode.set(RowMode::Contesting)
                    >
                        "Contest"
                    </button>
                </Show>
                <Show when=move || can_edit.get() && idle()>
                    <button
                        class="btn btn-secondary btn-small"
                        on:click=move |_| set_mode.set(RowMode::Editing)
                    >
                        "Edit"
                    </button>
                </Show>
            </div>

            <Show when=move || mode.get() == RowMode::Contesting>
                <ContestForm
                    on_submit=Callback::new(move |reason: String| {
                        set_mode.set(RowMode::Idle);
                        on_action.run((id, FeedbackAction::Contest { reason }));
                    })
                    on_cancel=Callback::new(move |_: ()| set_mode.set(RowMode::Idle))
                />
            </Show>

            {move || (mode.get() == RowMode::Editing).then(|| view! {
                <EditForm
                    comment=comment.clone()
                    current_performance=performance
                    on_submit=Callback::new(move |(comment, current_performance): (String, f64)| {
                        set_mode.set(RowMode::Idle);
                        on_action.run((id, FeedbackAction::Edit { comment, current_performance }));
                    })
                    on_cancel=Callback::new(move |_: ()| set_mode.set(RowMode::Idle))
                />
            })}

            <Show when=move || reviewing && can_review.get()>
                <ReviewForm on_submit=Callback::new(
                    move |(resolution, reply): (ContestationResolution, String)| {
                        on_action.run((id, FeedbackAction::Review { resolution, reply }));
                    },
                ) />
            </Show>
        </div>
    }
}
