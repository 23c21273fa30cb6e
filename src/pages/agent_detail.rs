use chrono::{DateTime, NaiveDateTime};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::{AgentSummary, CallItem, CallSummary, WorstItem};
use crate::app::use_api;
use crate::components::error_banner::ErrorBanner;
use crate::components::filter_bar::FilterBar;
use crate::components::metric_card::MetricCard;
use crate::error::DashboardError;
use crate::filters::context::use_filters;
use crate::format::{format_agent_name, format_percent, performance_tier};
use crate::pages::dashboard::describe_worst_item;
use crate::sync::FetchSequence;

/// Call timestamps as `dd/mm/yyyy hh:mm`; unparseable values are shown as sent.
pub fn format_call_time(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return at.format("%d/%m/%Y %H:%M").to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map(|at| at.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Everything the report shows above the item breakdown.
#[derive(Debug, Clone, Default)]
struct AgentReport {
    summary: AgentSummary,
    worst: Option<WorstItem>,
    calls: Vec<CallSummary>,
}

#[component]
fn CallItemList(items: Vec<CallItem>) -> impl IntoView {
    if items.is_empty() {
        return view! { <p class="empty-state">"No items recorded for this call."</p> }.into_any();
    }
    view! {
        <ul class="call-items">
            {items
                .into_iter()
                .map(|item| {
                    let outcome = item.outcome;
                    view! {
                        <li class="call-item">
                            <span class="call-item-label" title=item.category.clone()>{item.label()}</span>
                            <span class=format!("call-item-outcome {}", outcome.css_class())>
                                {outcome.label()}
                            </span>
                        </li>
                    }
                })
                .collect::<Vec<_>>()}
        </ul>
    }
    .into_any()
}

/// Per-agent report: summary, worst item and evaluated calls.
#[component]
pub fn AgentDetailPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let sequence = StoredValue::new(FetchSequence::new());
    let item_sequence = StoredValue::new(FetchSequence::new());
    let filters = use_filters();
    let params = use_params_map();
    let agent_id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));

    let (report, set_report) = signal::<Option<AgentReport>>(None);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<DashboardError>>(None);

    let (open_call, set_open_call) = signal::<Option<i64>>(None);
    let (items, set_items) = signal::<Option<Vec<CallItem>>>(None);
    let (items_error, set_items_error) = signal::<Option<String>>(None);

    let load = move || {
        let ticket = sequence.with_value(|s| s.next());
        let id = agent_id.get_untracked();
        let filter = filters.filter.get_untracked();
        let api = api.get_value();
        set_open_call.set(None);
        set_items.set(None);
        set_loading.set(true);
        spawn_local(async move {
            let summary = api.agent_summary(&id, &filter).await;
            let worst = api.agent_worst_item(&id, &filter).await;
            let calls = api.agent_calls(&id, &filter).await;
            if !sequence.with_value(|s| s.is_latest(ticket)) {
                debug!("Dropping stale report for agent {}", id);
                return;
            }
            match (summary, worst, calls) {
                (Ok(summary), Ok(worst), Ok(calls)) => {
                    set_error.set(None);
                    set_report.set(Some(AgentReport { summary, worst, calls }));
                }
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                    warn!("Report for agent {} failed: {}", id, e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        filters.filter.track();
        agent_id.track();
        load();
    });

    let toggle_call = move |evaluation_id: i64| {
        if open_call.get_untracked() == Some(evaluation_id) {
            item_sequence.with_value(|s| s.next());
            set_open_call.set(None);
            set_items.set(None);
            return;
        }
        let ticket = item_sequence.with_value(|s| s.next());
        let api = api.get_value();
        set_open_call.set(Some(evaluation_id));
        set_items.set(None);
        set_items_error.set(None);
        spawn_local(async move {
            let result = api.call_items(evaluation_id).await;
            if !item_sequence.with_value(|s| s.is_latest(ticket)) {
                return;
            }
            match result {
                Ok(list) => set_items.set(Some(list)),
                Err(e) => {
                    warn!("Items for evaluation {} failed: {}", evaluation_id, e);
                    set_items_error.set(Some(String::from(e)));
                }
            }
        });
    };

    view! {
        <div class="page agent-detail-page">
            <a class="back-link" href="/agents">"← Agents"</a>
            <h2>{move || report.with(|r| match r {
                Some(r) => format_agent_name(&r.summary),
                None => agent_id.get(),
            })}</h2>
            <FilterBar />

            {move || error.get().map(|e| view! {
                <ErrorBanner error=e on_retry=Callback::new(move |_: ()| load()) />
            })}

            {move || match report.get() {
                None => {
                    let message = if loading.get() { "Loading..." } else { "No report for this agent." };
                    view! { <p class="empty-state">{message}</p> }.into_any()
                }
                Some(report) => {
                    let tone = report
                        .summary
                        .average
                        .map(|a| performance_tier(a).css_class().to_string())
                        .unwrap_or_default();
                    let (worst_label, worst_detail) = describe_worst_item(report.worst.as_ref());
                    let calls = report.calls;
                    view! {
                        <div class="metric-grid">
                            <MetricCard label="Average score" value=format_percent(report.summary.average) tone=tone />
                            <MetricCard label="Calls evaluated" value=report.summary.total_calls.to_string() />
                            <MetricCard label="Worst item" value=worst_label detail=worst_detail />
                        </div>

                        <section class="card">
                            <h3>"Evaluated calls"</h3>
                            <Show
                                when={
                                    let empty = calls.is_empty();
                                    move || !empty
                                }
                                fallback=|| view! { <p class="empty-state">"No calls in this period."</p> }
                            >
                                <table class="data-table calls-table">
                                    <thead>
                                        <tr>
                                            <th>"Call"</th>
                                            <th>"Date"</th>
                                            <th>"Score"</th>
                                            <th>"Status"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {calls
                                            .clone()
                                            .into_iter()
                                            .map(|call| {
                                                let evaluation_id = call.evaluation_id;
                                                let tier = call
                                                    .score
                                                    .map(|s| performance_tier(s).css_class())
                                                    .unwrap_or_default();
                                                let when = call
                                                    .called_at
                                                    .as_deref()
                                                    .map(format_call_time)
                                                    .unwrap_or_else(|| "–".to_string());
                                                let is_open = move || open_call.get() == Some(evaluation_id);
                                                view! {
                                                    <tr
                                                        class="clickable"
                                                        class:selected=is_open
                                                        on:click=move |_| toggle_call(evaluation_id)
                                                    >
                                                        <td>{call.call_id.clone()}</td>
                                                        <td>{when}</td>
                                                        <td class=tier>{format_percent(call.score)}</td>
                                                        <td>{call.status.clone().unwrap_or_default()}</td>
                                                    </tr>
                                                    <Show when=is_open>
                                                        <tr class="call-items-row">
                                                            <td colspan="4">
                                                                {move || match (items.get(), items_error.get()) {
                                                                    (_, Some(message)) => view! {
                                                                        <p class="error-text">{message}</p>
                                                                    }.into_any(),
                                                                    (Some(list), None) => view! {
                                                                        <CallItemList items=list />
                                                                    }.into_any(),
                                                                    (None, None) => view! {
                                                                        <p class="empty-state">"Loading items..."</p>
                                                                    }.into_any(),
                                                                }}
                                                            </td>
                                                        </tr>
                                                    </Show>
                                                }
                                            })
                                            .collect::<Vec<_>>()}
                                    </tbody>
                                </table>
                            </Show>
                        </section>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
