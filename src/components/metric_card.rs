use leptos::prelude::*;

/// A single headline number on the dashboard.
#[component]
pub fn MetricCard(
    #[prop(into)] label: String,
    #[prop(into)] value: String,
    /// Secondary line under the value.
    #[prop(optional, into)]
    detail: Option<String>,
    /// Extra class for the value, e.g. a performance tier.
    #[prop(optional, into)]
    tone: Option<String>,
) -> impl IntoView {
    let value_class = match tone {
        Some(tone) => format!("metric-value {}", tone),
        None => "metric-value".to_string(),
    };

    view! {
        <div class="metric-card">
            <span class="metric-label">{label}</span>
            <span class=value_class>{value}</span>
            {detail.map(|d| view! { <span class="metric-detail">{d}</span> })}
        </div>
    }
}
