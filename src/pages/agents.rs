use std::cmp::Ordering;

use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api::AgentSummary;
use crate::app::use_api;
use crate::components::error_banner::ErrorBanner;
use crate::components::filter_bar::FilterBar;
use crate::error::DashboardError;
use crate::filters::context::use_filters;
use crate::format::{format_agent_name, format_percent, performance_tier};
use crate::sync::FetchSequence;

/// Best average first; agents without a score go last. Stable for ties.
pub fn rank_agents(agents: &mut [AgentSummary]) {
    agents.sort_by(|a, b| match (a.average, b.average) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[component]
pub fn AgentsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let sequence = StoredValue::new(FetchSequence::new());
    let filters = use_filters();

    let (agents, set_agents) = signal::<Vec<AgentSummary>>(vec![]);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<DashboardError>>(None);

    let load = move || {
        let ticket = sequence.with_value(|s| s.next());
        let filter = filters.filter.get_untracked();
        let api = api.get_value();
        set_loading.set(true);
        spawn_local(async move {
            let result = api.agents(&filter).await;
            if !sequence.with_value(|s| s.is_latest(ticket)) {
                return;
            }
            match result {
                Ok(mut list) => {
                    rank_agents(&mut list);
                    set_error.set(None);
                    set_agents.set(list);
                }
                Err(e) => {
                    warn!("Agent ranking failed: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        filters.filter.track();
        load();
    });

    view! {
        <div class="page agents-page">
            <h2>"Agents"</h2>
            <FilterBar />

            {move || error.get().map(|e| view! {
                <ErrorBanner error=e on_retry=Callback::new(move |_: ()| load()) />
            })}

            <Show
                when=move || !agents.with(|a| a.is_empty())
                fallback=move || {
                    let message = if loading.get() { "Loading..." } else { "No agents evaluated in this period." };
                    view! { <p class="empty-state">{message}</p> }
                }
            >
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Agent"</th>
                            <th>"Average"</th>
                            <th>"Calls"</th>
                            <th>"Last evaluation"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || agents
                            .get()
                            .into_iter()
                            .map(|agent| {
                                let tier = agent
                                    .average
                                    .map(|a| performance_tier(a).css_class())
                                    .unwrap_or_default();
                                view! {
                                    <tr>
                                        <td>
                                            <a href=format!("/agents/{}", urlencoding::encode(agent.agent_id.trim()))>
                                                {format_agent_name(&agent)}
                                            </a>
                                        </td>
                                        <td class=tier>{format_percent(agent.average)}</td>
                                        <td>{agent.total_calls}</td>
                                        <td>{agent.last_evaluation.clone().unwrap_or_else(|| "–".to_string())}</td>
                                    </tr>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </tbody>
                </table>
            </Show>
        </div>
    }
}
