use leptos::prelude::*;

use crate::api::TrendPoint;
use crate::format::{format_percent, performance_tier};

/// Average score per period as a plain CSS bar chart.
#[component]
pub fn TrendBars(points: Vec<TrendPoint>) -> impl IntoView {
    if points.is_empty() {
        return view! { <p class="empty-state">"No evaluations in this period."</p> }.into_any();
    }

    view! {
        <div class="trend-bars">
            {points
                .into_iter()
                .map(|point| {
                    let height = format!("height: {:.0}%", point.average.clamp(0.0, 100.0));
                    let bar_class = format!("trend-bar {}", performance_tier(point.average).css_class());
                    let title = format!("{}: {}", point.period, format_percent(Some(point.average)));
                    view! {
                        <div class="trend-column" title=title>
                            <div class=bar_class style=height></div>
                            <span class="trend-label">{point.period}</span>
                        </div>
                    }
                })
                .collect::<Vec<_>>()}
        </div>
    }
    .into_any()
}
