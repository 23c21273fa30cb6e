use leptos::prelude::*;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::FeedbackScope;
use crate::app::{use_api, use_config};
use crate::components::error_banner::ErrorBanner;
use crate::components::feedback_row::FeedbackRow;
use crate::error::DashboardError;
use crate::feedback::{FeedbackAction, FeedbackPages, FeedbackStatus, PageRequest, RecordQuery};
use crate::filters::context::use_filters;
use crate::format::format_agent_name;
use crate::session::use_session;
use crate::sync::{FetchSequence, FetchTicket};

/// Review queue of contested feedback for monitors.
#[component]
pub fn ContestationsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let sequence = StoredValue::new(FetchSequence::new());
    let page_size = use_config().page_size;
    let filters = use_filters();
    let session = use_session();

    let (pages, set_pages) = signal(FeedbackPages::new(page_size));
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<DashboardError>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);

    let can_review = move || session.session.with(|s| s.can_review());

    // `replace` is set for post-mutation refreshes; pages otherwise append
    let fetch = move |ticket: FetchTicket, request: PageRequest, replace: bool| {
        let filter = filters.filter.get_untracked();
        let scope = FeedbackScope {
            agent_id: None,
            status: Some(FeedbackStatus::InReview),
        };
        let api = api.get_value();
        set_loading.set(true);
        spawn_local(async move {
            let result = api.list_feedback(request, &filter, &scope).await;
            if !sequence.with_value(|s| s.is_latest(ticket)) {
                debug!("Dropping stale contestation page at offset {}", request.offset);
                return;
            }
            match result {
                Ok(records) => {
                    set_error.set(None);
                    set_pages.update(|p| {
                        if replace {
                            p.replace(records)
                        } else {
                            p.append(records)
                        }
                    });
                }
                Err(e) => {
                    warn!("Contestation queue failed: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    let reload = move || {
        if !session.session.with_untracked(|s| s.can_review()) {
            return;
        }
        let ticket = sequence.with_value(|s| s.next());
        let fresh = FeedbackPages::new(page_size);
        let first = fresh.refresh_request();
        set_pages.set(fresh);
        fetch(ticket, first, false);
    };

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
            fetch(sequence.with_value(|s| s.current()), request, false);
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
                    set_notice.set(Some(format!("Contestation on feedback {} resolved.", id)));
                    let request = pages.with_untracked(|p| p.refresh_request());
                    fetch(sequence.with_value(|s| s.current()), request, true);
                }
                Err(e) => set_notice.set(Some(format!("Could not {} feedback: {}", action.label(), e))),
            }
        });
    });

    // Resolved items drop out until the refetch lands
    let queue = Memo::new(move |_| {
        let query = RecordQuery {
            status: Some(FeedbackStatus::InReview),
            ..RecordQuery::default()
        };
        pages.with(|p| p.groups(&query))
    });

    view! {
        <div class="page contestations-page">
            <h2>"Contestations"</h2>
            <p class="page-description">"Feedback contested by agents and waiting for a monitor's decision."</p>

            <Show
                when=can_review
                fallback=|| view! { <p class="empty-state">"Only monitors can review contestations."</p> }
            >
                {move || notice.get().map(|n| view! {
                    <div class="notice" on:click=move |_| set_notice.set(None)>{n}</div>
                })}

                {move || error.get().map(|e| view! {
                    <ErrorBanner error=e on_retry=Callback::new(move |_: ()| reload()) />
                })}

                {move || {
                    let groups = queue.get();
                    if groups.is_empty() {
                        let message = if loading.get() { "Loading..." } else { "No open contestations." };
                        return view! { <p class="empty-state">{message}</p> }.into_any();
                    }
                    groups
                        .into_iter()
                        .map(|group| {
                            let name = format_agent_name(&group);
                            let records: Vec<_> = group.records().cloned().collect();
                            view! {
                                <section class="contestation-group">
                                    <h3>{name}</h3>
                                    {records
                                        .into_iter()
                                        .map(|record| view! {
                                            <FeedbackRow record=record on_action=on_action reviewing=true />
                                        })
                                        .collect::<Vec<_>>()}
                                </section>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}

                <Show when=move || !pages.with(|p| p.is_exhausted() || p.is_empty())>
                    <button class="btn btn-secondary load-more" disabled=move || loading.get() on:click=load_more>
                        {move || if loading.get() { "Loading..." } else { "Load more" }}
                    </button>
                </Show>
            </Show>
        </div>
    }
}
