use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::{optional_text, UserAccount, UserInput};
use crate::app::use_api;
use crate::components::error_banner::ErrorBanner;
use crate::error::DashboardError;
use crate::session::use_session;

/// User accounts. The backend has no delete; deactivate instead.
#[component]
pub fn UsersPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let session = use_session();

    let (users, set_users) = signal::<Vec<UserAccount>>(vec![]);
    let (error, set_error) = signal::<Option<DashboardError>>(None);
    let (status, set_status) = signal::<Option<String>>(None);

    let (editing, set_editing) = signal::<Option<i64>>(None);
    let (username, set_username) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (active, set_active) = signal(true);

    let refresh = move || {
        let api = api.get_value();
        spawn_local(async move {
            match api.users().await {
                Ok(list) => {
                    set_error.set(None);
                    set_users.set(list);
                }
                Err(e) => {
                    warn!("Could not load users: {}", e);
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
        set_username.set(String::new());
        set_full_name.set(String::new());
        set_active.set(true);
    };

    let start_edit = move |user: &UserAccount| {
        let input = UserInput::from(user);
        set_editing.set(Some(user.id));
        set_username.set(input.username);
        set_full_name.set(input.full_name.unwrap_or_default());
        set_active.set(input.active);
    };

    let save = move |_| {
        let input = UserInput {
            username: username.get_untracked().trim().to_string(),
            full_name: optional_text(&full_name.get_untracked()),
            active: active.get_untracked(),
        };
        if input.username.is_empty() {
            set_status.set(Some("Username is required.".to_string()));
            return;
        }
        let target = editing.get_untracked();
        let api = api.get_value();
        spawn_local(async move {
            let result = match target {
                Some(id) => api.update_user(id, &input).await,
                None => api.create_user(&input).await,
            };
            match result {
                Ok(()) => {
                    info!("Saved user {}", input.username);
                    set_status.set(Some(format!("Saved \"{}\".", input.username)));
                    clear_form();
                    refresh();
                }
                Err(e) => set_status.set(Some(format!("Save failed: {}", e))),
            }
        });
    };

    view! {
        <div class="page admin-page">
            <h2>"Users"</h2>
            <Show
                when=move || session.session.with(|s| s.can_administer())
                fallback=|| view! { <p class="empty-state">"Administrator access required."</p> }
            >
                {move || error.get().map(|e| view! {
                    <ErrorBanner error=e on_retry=Callback::new(move |_: ()| refresh()) />
                })}
                {move || status.get().map(|s| view! { <div class="notice">{s}</div> })}

                <section class="card admin-form">
                    <h3>{move || if editing.get().is_some() { "Edit user" } else { "New user" }}</h3>
                    <input
                        type="text"
                        class="input"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        class="input"
                        placeholder="Full name"
                        prop:value=move || full_name.get()
                        on:input=move |ev| set_full_name.set(event_target_value(&ev))
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
                            <th>"Username"</th>
                            <th>"Name"</th>
                            <th>"Permissions"</th>
                            <th>"Active"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || users
                            .get()
                            .into_iter()
                            .map(|user| {
                                let stored = StoredValue::new(user.clone());
                                view! {
                                    <tr class:inactive={!user.active}>
                                        <td>{user.username}</td>
                                        <td>{user.full_name.unwrap_or_default()}</td>
                                        <td>{user.permissions.join(", ")}</td>
                                        <td>{if user.active { "Yes" } else { "No" }}</td>
                                        <td class="row-actions">
                                            <button
                                                class="btn btn-small btn-secondary"
                                                on:click=move |_| stored.with_value(|u| start_edit(u))
                                            >
                                                "Edit"
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
