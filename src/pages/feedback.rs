use leptos::prelude::*;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::FeedbackScope;
use crate::app::{use_api, use_config};
use crate::components::agent_group_panel::AgentGroupPanel;
use crate::components::error_banner::ErrorBanner;
use crate::components::filter_bar::FilterBar;
use crate::error::DashboardError;
use crate::feedback::{FeedbackAction, FeedbackPages, FeedbackStatus, PageRequest, RecordQuery};
use crate::filters::context::use_filters;
use crate::session::use_session;
use crate::sync::{FetchSequence, FetchTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Load {
    /// First page for a new filter.
    Fresh,
    /// Next page appended to what is loaded.
    More,
    /// Authoritative reload after a mutation.
    Refresh,
}

#[component]
pub fn FeedbackPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let sequence = StoredValue::new(FetchSequence::new());
    let page_size = use_config().page_size;
    let filters = use_filters();
    let session = use_session();

    let (pages, set_pages) = signal(FeedbackPages::new(page_size));
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<DashboardError>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (status_filter, set_status_filter) = signal::<Option<FeedbackStatus>>(None);
    let (search, set_search) = signal(String::new());

    let fetch = move |ticket: FetchTicket, request: PageRequest, load: Load| {
        let api = api.get_value();
        let filter = filters.filter.get_untracked();
        let scope = FeedbackScope {
            agent_id: session.session.with_untracked(|s| s.agent_scope()),
            status: None,
        };
        set_loading.set(true);
        spawn_local(async move {
            let result = api.list_feedback(request, &filter, &scope).await;
            if !sequence.with_value(|s| s.is_latest(ticket)) {
                debug!("Dropping stale feedback page at offset {}", request.offset);
                return;
            }
            match result {
                Ok(records) => {
                    set_error.set(None);
                    set_pages.update(|p| match load {
                        Load::Fresh | Load::More => p.append(records),
                        Load::Refresh => p.replace(records),
                    });
                }
                Err(e) => {
                    warn!("Feedback listing failed: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    let reload = move || {
        let ticket = sequence.with_value(|s| s.next());
        let fresh = FeedbackPages::new(page_size);
        let first = fresh.refresh_request();
        set_pages.set(fresh);
        fetch(ticket, first, Load::Fresh);
    };

    // Refetch from the first page whenever the filter or the session changes
    Effect::new(move |_| {
        filters.filter.track();
        session.session.track();
        reload();
    });

    let load_more = move |_| {
        if loading.get_untracked() {
            return;
        }
        if let Some(request) = pages.with_untracked(|p| p.next_request()) {
            fetch(sequence.with_value(|s| s.current()), request, Load::More);
        }
    };

    let on_action = Callback::new(move |(id, action): (i64, FeedbackAction)| {
        let allowed = pages.with_untracked(|p| {
            session
                .session
                .with_untracked(|s| s.authorize(p.records(), id, &action))
        });
        if let Err(e) = allowed {
            set_notice.set(Some(String::from(e)));
            return;
        }

        let api = api.get_value();
        spawn_local(async move {
            match api.perform(id, &action).await {
                Ok(()) => {
                    set_pages.update(|p| {
                        p.patch(id, &action);
                    });
                    set_notice.set(Some(format!("Feedback {} saved ({}).", id, action.label())));
                    let request = pages.with_untracked(|p| p.refresh_request());
                    fetch(sequence.with_value(|s| s.current()), request, Load::Refresh);
                }
                Err(e) => set_notice.set(Some(format!("Could not {} feedback: {}", action.label(), e))),
            }
        });
    });

    let groups = Memo::new(move |_| {
        let query = RecordQuery {
            status: status_filter.get(),
            origin: None,
            search: search.get(),
        };
        pages.with(|p| p.groups(&query))
    });
    let counts = Memo::new(move |_| pages.with(|p| p.counts()));

    view! {
        <div class="page feedback-page">
            <h2>"Feedback"</h2>
            <p class="page-description">
                "Criterion-level feedback by agent and evaluation. Agents with the most pending items come first."
            </p>

            <FilterBar />

            <div class="feedback-toolbar">
                <div class="status-tabs">
                    <button
                        class=move || if status_filter.get().is_none() { "tab active" } else { "tab" }
                        on:click=move |_| set_status_filter.set(None)
                    >
                        {move || format!("All ({})", counts.get().total)}
                    </button>
                    {FeedbackStatus::ALL
                        .iter()
                        .map(|&status| {
                            view! {
                                <button
                                    class=move || if status_filter.get() == Some(status) { "tab active" } else { "tab" }
                                    on:click=move |_| set_status_filter.set(Some(status))
                                >
                                    {move || format!("{} ({})", status.label(), counts.get().get(status))}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
                <input
                    type="search"
                    class="input search-input"
                    placeholder="Search agent, criterion or comment"
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
            </div>

            {move || notice.get().map(|n| view! {
                <div class="notice" on:click=move |_| set_notice.set(None)>{n}</div>
            })}

            {move || error.get().map(|e| view! {
                <ErrorBanner error=e on_retry=Callback::new(move |_: ()| reload()) />
            })}

            {move || {
                let groups = groups.get();
                if groups.is_empty() {
                    let message = if loading.get() { "Loading feedback..." } else { "No feedback for this filter." };
                    view! { <p class="empty-state">{message}</p> }.into_any()
                } else {
                    groups
                        .into_iter()
                        .map(|group| view! { <AgentGroupPanel group=group on_action=on_action /> })
                        .collect::<Vec<_>>()
                        .into_any()
                }
            }}

            <Show when=move || !pages.with(|p| p.is_exhausted() || p.is_empty())>
                <button class="btn btn-secondary load-more" disabled=move || loading.get() on:click=load_more>
                    {move || if loading.get() { "Loading..." } else { "Load more" }}
                </button>
            </Show>
        </div>
    }
}
