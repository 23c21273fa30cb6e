use leptos::prelude::*;

use crate::error::DashboardError;

/// Inline error with a retry button for transient failures.
#[component]
pub fn ErrorBanner(error: DashboardError, #[prop(into)] on_retry: Callback<()>) -> impl IntoView {
    let retryable = error.is_retryable();
    let message = String::from(error);

    view! {
        <div class="error-banner">
            <span class="status-text status-error">{message}</span>
            <Show when=move || retryable>
                <button class="btn btn-secondary btn-small" on:click=move |_| on_retry.run(())>
                    "Retry"
                </button>
            </Show>
        </div>
    }
}
