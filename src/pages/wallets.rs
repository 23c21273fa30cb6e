use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::{optional_text, Wallet, WalletInput};
use crate::app::use_api;
use crate::components::error_banner::ErrorBanner;
use crate::error::DashboardError;
use crate::session::use_session;

#[component]
pub fn WalletsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let session = use_session();

    let (wallets, set_wallets) = signal::<Vec<Wallet>>(vec![]);
    let (error, set_error) = signal::<Option<DashboardError>>(None);
    let (status, set_status) = signal::<Option<String>>(None);

    // Form state; `editing` holds the id of the wallet being changed
    let (editing, set_editing) = signal::<Option<i64>>(None);
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (active, set_active) = signal(true);

    let refresh = move || {
        let api = api.get_value();
        spawn_local(async move {
            match api.wallets().await {
                Ok(list) => {
                    set_error.set(None);
                    set_wallets.set(list);
                }
                Err(e) => {
                    warn!("Could not load wallets: {}", e);
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
        set_active.set(true);
    };

    let start_edit = move |wallet: &Wallet| {
        let input = WalletInput::from(wallet);
        set_editing.set(Some(wallet.id));
        set_name.set(input.name);
        set_description.set(input.description.unwrap_or_default());
        set_active.set(input.active);
    };

    let save = move |_| {
        let input = WalletInput {
            name: name.get_untracked().trim().to_string(),
            description: optional_text(&description.get_untracked()),
            active: active.get_untracked(),
        };
        if input.name.is_empty() {
            set_status.set(Some("Wallet name is required.".to_string()));
            return;
        }
        let target = editing.get_untracked();
        let api = api.get_value();
        spawn_local(async move {
            let result = match target {
                Some(id) => api.update_wallet(id, &input).await,
                None => api.create_wallet(&input).await,
            };
            match result {
                Ok(()) => {
                    info!("Saved wallet {}", input.name);
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
            match api.delete_wallet(id).await {
                Ok(()) => {
                    set_status.set(Some("Wallet deleted.".to_string()));
                    refresh();
                }
                Err(e) => set_status.set(Some(format!("Delete failed: {}", e))),
            }
        });
    };

    view! {
        <div class="page admin-page">
            <h2>"Wallets"</h2>
            <Show
                when=move || session.session.with(|s| s.can_administer())
                fallback=|| view! { <p class="empty-state">"Administrator access required."</p> }
            >
                {move || error.get().map(|e| view! {
                    <ErrorBanner error=e on_retry=Callback::new(move |_: ()| refresh()) />
                })}
                {move || status.get().map(|s| view! { <div class="notice">{s}</div> })}

                <section class="card admin-form">
                    <h3>{move || if editing.get().is_some() { "Edit wallet" } else { "New wallet" }}</h3>
                    <input
                        type="text"
                        class="input"
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        class="input"
                        placeholder="Description"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.set(event_target_value(&ev))
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
                            <th>"Name"</th>
                            <th>"Description"</th>
                            <th>"Active"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || wallets
                            .get()
                            .into_iter()
                            .map(|wallet| {
                                let id = wallet.id;
                                let stored = StoredValue::new(wallet.clone());
                                view! {
                                    <tr class:inactive={!wallet.active}>
                                        <td>{wallet.name}</td>
                                        <td>{wallet.description.unwrap_or_default()}</td>
                                        <td>{if wallet.active { "Yes" } else { "No" }}</td>
                                        <td class="row-actions">
                                            <button
                                                class="btn btn-small btn-secondary"
                                                on:click=move |_| stored.with_value(|w| start_edit(w))
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
