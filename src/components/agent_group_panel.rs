use leptos::prelude::*;

use crate::components::feedback_row::FeedbackRow;
use crate::feedback::{AgentGroup, EvaluationGroup, FeedbackAction};
use crate::format::{format_agent_name, format_percent, performance_tier, sort_by_category};

fn average_badge(average: Option<i64>) -> impl IntoView {
    let class = match average {
        Some(v) => format!("average-badge {}", performance_tier(v as f64).css_class()),
        None => "average-badge".to_string(),
    };
    view! { <span class=class>{format_percent(average.map(|v| v as f64))}</span> }
}

fn evaluation_view(
    evaluation: &EvaluationGroup,
    on_action: Callback<(i64, FeedbackAction)>,
) -> impl IntoView {
    let mut records = evaluation.records.clone();
    sort_by_category(&mut records, |r| r.criterion_category.as_deref().unwrap_or(""));

    let title = if evaluation.evaluation_id.is_empty() {
        "Unlinked feedback".to_string()
    } else {
        format!("Evaluation {}", evaluation.evaluation_id)
    };
    let counts = format!(
        "{} of {} pending",
        evaluation.counts.pending, evaluation.counts.total
    );

    view! {
        <div class="evaluation-group">
            <div class="evaluation-header">
                <span class="evaluation-title">{title}</span>
                <span class="evaluation-counts">{counts}</span>
                {average_badge(evaluation.performance_average)}
            </div>
            {records
                .into_iter()
                .map(|record| view! { <FeedbackRow record=record on_action=on_action /> })
                .collect::<Vec<_>>()}
        </div>
    }
}

/// Collapsible block of one agent's feedback, grouped by evaluation.
/// Starts expanded when the agent has pending items.
#[component]
pub fn AgentGroupPanel(
    group: AgentGroup,
    #[prop(into)] on_action: Callback<(i64, FeedbackAction)>,
) -> impl IntoView {
    let (expanded, set_expanded) = signal(group.counts.pending > 0);
    let name = if group.is_unassigned() {
        "Unassigned".to_string()
    } else {
        format_agent_name(&group)
    };
    let counts = group.counts;
    let average = group.performance_average;
    let evaluations = group.evaluations;

    view! {
        <section class="agent-group">
            <header
                class="agent-group-header"
                on:click=move |_| set_expanded.update(|e| *e = !*e)
            >
                <span class="agent-name">{name}</span>
                <span class="agent-counts">
                    <span class="count count-pending">{format!("{} pending", counts.pending)}</span>
                    <span class="count count-accepted">{format!("{} accepted", counts.accepted)}</span>
                    <span class="count count-review">{format!("{} in review", counts.in_review)}</span>
                </span>
                {average_badge(average)}
            </header>
            {move || expanded.get().then(|| view! {
                <div class="evaluation-list">
                    {evaluations
                        .iter()
                        .map(|e| evaluation_view(e, on_action))
                        .collect::<Vec<_>>()}
                </div>
            })}
        </section>
    }
}
