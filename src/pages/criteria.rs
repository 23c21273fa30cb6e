use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::{optional_text, Criterion, CriterionInput};
use crate::app::use_api;
use crate::components::error_banner::ErrorBanner;
use crate::error::DashboardError;
use crate::format::{format_criterion_label, sort_by_category};
use crate::session::use_session;

/// Parse the weight field; blank means no weight.
fn parse_weight(raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.replace(',', ".").parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(Some(w)),
        _ => Err(format!("\"{}\" is not a valid weight.", raw)),
    }
}

#[component]
pub fn CriteriaPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let session = use_session();

    let (criteria, set_criteria) = signal::<Vec<Criterion>>(vec![]);
    let (error, set_error) = signal::<Option<DashboardError>>(None);
    let (status, set_status) = signal::<Option<String>>(None);

    let (editing, set_editing) = signal::<Option<i64>>(None);
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (category, set_category) = signal(String::new());
    let (weight, set_weight) = signal(String::new());
    let (active, set_active) = signal(true);

    let refresh = move || {
        let api = api.get_value();
        spawn_local(async move {
            match api.criteria().await {
                Ok(mut list) => {
                    sort_by_category(&mut list, |c| c.category.as_deref().unwrap_or(""));
                    set_error.set(None);
                    set_criteria.set(list);
                }
                Err(e) => {
                    warn!("Could not load criteria: {}", e);
                    set_error.set(Some(e));
                }
            }
        });
    };

    Effect::new(move |_| {
        if session.session.with(|s| s.can_administer()) {
            refresh();
        }
    });

    let clear_form = move || {
        set_editing.set(None);
        set_name.set(String::new());
        set_description.set(String::new());
        set_category.set(String::new());
        set_weight.set(String::new());
        set_active.set(true);
    };

    let start_edit = move |criterion: &Criterion| {
        let input = CriterionInput::from(criterion);
        set_editing.set(Some(criterion.id));
        set_name.set(input.name);
        set_description.set(input.description.unwrap_or_default());
        set_category.set(input.category.unwrap_or_default());
        set_weight.set(input.weight.map(|w| w.to_string()).unwrap_or_default());
        set_active.set(input.active);
    };

    let save = move |_| {
        let weight = match parse_weight(&weight.get_untracked()) {
            Ok(w) => w,
            Err(message) => {
                set_status.set(Some(message));
                return;
            }
        };
        let input = CriterionInput {
            name: name.get_untracked().trim().to_string(),
            description: optional_text(&description.get_untracked()),
            category: optional_text(&category.get_untracked()),
            weight,
            active: active.get_untracked(),
        };
        if input.name.is_empty() {
            set_status.set(Some("Criterion name is required.".to_string()));
            return;
        }
        let target = editing.get_untracked();
        let api = api.get_value();
        spawn_local(async move {
            let result = match target {
                Some(id) => api.update_criterion(id, &input).await,
                None => api.create_criterion(&input).await,
            };
            match result {
                Ok(()) => {
                    info!("Saved criterion {}", input.name);
                    set_status.set(Some(format!("Saved \"{}\".", input.name)));
                    clear_form();
                    refresh();
                }
                Err(e) => set_status.set(Some(format!("Save failed: {}", e))),
            }
        });
    };

    let remove = move |id: i64| {
        let api = api.get_value();
        spawn_local(async move {
            match api.delete_criterion(id).await {
                Ok(()) => {
                    set_status.set(Some("Criterion deleted.".to_string()));
                    refresh();
                }
                Err(e) => set_status.set(Some(format!("Delete failed: {}", e))),
            }
        });
    };

    view! {
        <div class="page admin-page">
            <h2>"Criteria"</h2>
            <Show
                when=move || session.session.with(|s| s.can_administer())
                fallback=|| view! { <p class="empty-state">"Administrator access required."</p> }
            >
                {move || error.get().map(|e| view! {
                    <ErrorBanner error=e on_retry=Callback::new(move |_: ()| refresh()) />
                })}
                {move || status.get().map(|s| view! { <div class="notice">{s}</div> })}

                <section class="card admin-form">
                    <h3>{move || if editing.get().is_some() { "Edit criterion" } else { "New criterion" }}</h3>
                    <input
                        type="text"
                        class="input"
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                    <textarea
                        class="input"
                        placeholder="Description"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    ></textarea>
                    <input
                        type="text"
                        class="input"
                        placeholder="Category key, e.g. abordagem"
                        prop:value=move || category.get()
                        on:input=move |ev| set_category.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        class="input"
                        placeholder="Weight"
                        prop:value=move || weight.get()
                        on:input=move |ev| set_weight.set(event_target_value(&ev))
                    />
                    <label class="checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || active.get()
                            on:change=move |ev| set_active.set(event_target_checked(&ev))
                        />
                        "Active"
                    </label>
                    <div class="form-actions">
                        <button class="btn btn-primary" on:click=save>"Save"</button>
                        <Show when=move || editing.get().is_some()>
                            <button class="btn btn-secondary" on:click=move |_| clear_form()>"Cancel"</button>
                        </Show>
                    </div>
                </section>

                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Criterion"</th>
                            <th>"Category"</th>
                            <th>"Weight"</th>
                            <th>"Active"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || criteria
                            .get()
                            .into_iter()
                            .map(|criterion| {
                                let id = criterion.id;
                                let label = format_criterion_label(
                                    criterion.category.as_deref(),
                                    criterion.description.as_deref().or(Some(criterion.name.as_str())),
                                );
                                let stored = StoredValue::new(criterion.clone());
                                view! {
                                    <tr class:inactive={!criterion.active}>
                                        <td title=criterion.name.clone()>{label}</td>
                                        <td>{criterion.category.clone().unwrap_or_default()}</td>
                                        <td>{criterion.weight.map(|w| w.to_string()).unwrap_or_default()}</td>
                                        <td>{if criterion.active { "Yes" } else { "No" }}</td>
                                        <td class="row-actions">
                                            <button
                                                class="btn btn-small btn-secondary"
                                                on:click=move |_| stored.with_value(|c| start_edit(c))
                                            >
                                                "Edit"
                                            </button>
                                            <button class="btn btn-small btn-danger" on:click=move |_| remove(id)>
                                                "Delete"
                                            </button>
                                        </td>
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
