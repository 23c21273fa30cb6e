use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api::{Kpis, TrendPoint, WorstItem};
use crate::app::use_api;
use crate::components::error_banner::ErrorBanner;
use crate::components::filter_bar::FilterBar;
use crate::components::metric_card::MetricCard;
use crate::components::trend_bars::TrendBars;
use crate::error::DashboardError;
use crate::filters::context::use_filters;
use crate::format::{format_criterion_label, format_percent, performance_tier};
use crate::sync::FetchSequence;

/// Label and detail line for the worst-item card.
pub(crate) fn describe_worst_item(worst: Option<&WorstItem>) -> (String, String) {
    match worst.filter(|w| !w.is_empty()) {
        Some(item) => (
            format_criterion_label(Some(&item.category), None),
            format!(
                "{} of {} non-conforming ({})",
                item.non_conforming,
                item.evaluated,
                format_percent(Some(item.non_conforming_rate))
            ),
        ),
        None => ("–".to_string(), "No non-conformities".to_string()),
    }
}

fn kpi_cards(kpis: Kpis) -> impl IntoView {
    let tone = kpis
        .average_score
        .map(|score| performance_tier(score).css_class().to_string());
    let (worst_label, worst_detail) = describe_worst_item(kpis.worst_item.as_ref());

    view! {
        <div class="metric-grid">
            <MetricCard
                label="Average score"
                value=format_percent(kpis.average_score)
                tone=tone.unwrap_or_default()
            />
            <MetricCard label="Calls evaluated" value=kpis.total_calls.to_string() />
            <MetricCard label="Worst item" value=worst_label detail=worst_detail />
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let sequence = StoredValue::new(FetchSequence::new());
    let filters = use_filters();

    let (kpis, set_kpis) = signal::<Option<Kpis>>(None);
    let (trend, set_trend) = signal::<Vec<TrendPoint>>(vec![]);
    let (error, set_error) = signal::<Option<DashboardError>>(None);

    let load = move || {
        let ticket = sequence.with_value(|s| s.next());
        let filter = filters.filter.get_untracked();
        let api = api.get_value();
        spawn_local(async move {
            let kpis = api.kpis(&filter).await;
            let trend = api.trend(&filter).await;
            if !sequence.with_value(|s| s.is_latest(ticket)) {
                return;
            }
            match (kpis, trend) {
                (Ok(kpis), Ok(trend)) => {
                    set_error.set(None);
                    set_kpis.set(Some(kpis));
                    set_trend.set(trend);
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Dashboard load failed: {}", e);
                    set_error.set(Some(e));
                }
            }
        });
    };

    Effect::new(move |_| {
        filters.filter.track();
        load();
    });

    view! {
        <div class="page dashboard-page">
            <h2>"Dashboard"</h2>
            <FilterBar />

            {move || error.get().map(|e| view! {
                <ErrorBanner error=e on_retry=Callback::new(move |_: ()| load()) />
            })}

            {move || match kpis.get() {
                Some(k) => kpi_cards(k).into_any(),
                None => view! { <p class="empty-state">"Loading..."</p> }.into_any(),
            }}

            <section class="card">
                <h3>"Score trend"</h3>
                {move || view! { <TrendBars points=trend.get() /> }}
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_worst_item() {
        let item = WorstItem {
            category: "confirmacao_aceite".to_string(),
            non_conforming: 3,
            evaluated: 40,
            non_conforming_rate: 7.5,
        };
        let (label, detail) = describe_worst_item(Some(&item));
        assert_eq!(label, format_criterion_label(Some("confirmacao_aceite"), None));
        assert!(detail.starts_with("3 of 40 non-conforming"));

        let (label, _) = describe_worst_item(Some(&WorstItem::default()));
        assert_eq!(label, "–");
        assert_eq!(describe_worst_item(None).1, "No non-conformities");
    }
}
