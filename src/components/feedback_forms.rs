use leptos::prelude::*;

use crate::feedback::ContestationResolution;

/// Free-text reason for disputing a feedback item.
#[component]
pub fn ContestForm(
    #[prop(into)] on_submit: Callback<String>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let (reason, set_reason) = signal(String::new());
    let blank = move || reason.with(|r| r.trim().is_empty());

    view! {
        <div class="contest-form">
            <textarea
                class="input"
                placeholder="Why do you disagree with this feedback?"
                prop:value=move || reason.get()
                on:input=move |ev| set_reason.set(event_target_value(&ev))
            ></textarea>
            <div class="form-actions">
                <button
                    class="btn btn-primary btn-small"
                    disabled=blank
                    on:click=move |_| on_submit.run(reason.get_untracked())
                >
                    "Submit contestation"
                </button>
                <button class="btn btn-secondary btn-small" on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
            </div>
        </div>
    }
}

/// Monitor's verdict on a contestation.
#[component]
pub fn ReviewForm(
    #[prop(into)] on_submit: Callback<(ContestationResolution, String)>,
) -> impl IntoView {
    let (reply, set_reply) = signal(String::new());

    view! {
        <div class="review-form">
            <textarea
                class="input"
                placeholder="Reply to the agent (optional)"
                prop:value=move || reply.get()
                on:input=move |ev| set_reply.set(event_target_value(&ev))
            ></textarea>
            <div class="form-actions">
                <button
                    class="btn btn-primary btn-small"
                    on:click=move |_| on_submit.run((ContestationResolution::Upheld, reply.get_untracked()))
                >
                    "Uphold"
                </button>
                <button
                    class="btn btn-danger btn-small"
                    on:click=move |_| on_submit.run((ContestationResolution::Rejected, reply.get_untracked()))
                >
                    "Reject"
                </button>
            </div>
        </div>
    }
}

/// Monitor correction of a feedback's comment and score.
#[component]
pub fn EditForm(
    comment: String,
    current_performance: f64,
    #[prop(into)] on_submit: Callback<(String, f64)>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let (comment, set_comment) = signal(comment);
    let (score, set_score) = signal(format!("{}", current_performance));
    let parsed = move || {
        score
            .with(|s| s.trim().replace(',', ".").parse::<f64>().ok())
            .filter(|v| (0.0..=100.0).contains(v))
    };

    view! {
        <div class="edit-form">
            <textarea
                class="input"
                prop:value=move || comment.get()
                on:input=move |ev| set_comment.set(event_target_value(&ev))
            ></textarea>
            <label class="filter-field">
                <span>"Performance (0-100)"</span>
                <input
                    type="number"
                    class="input"
                    min="0"
                    max="100"
                    prop:value=move || score.get()
                    on:input=move |ev| set_score.set(event_target_value(&ev))
                />
            </label>
            <div class="form-actions">
                <button
                    class="btn btn-primary btn-small"
                    disabled=move || parsed().is_none()
                    on:click=move |_| {
                        if let Some(value) = parsed() {
                            on_submit.run((comment.get_untracked(), value));
                        }
                    }
                >
                    "Save"
                </button>
                <button class="btn btn-secondary btn-small" on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
            </div>
        </div>
    }
}
