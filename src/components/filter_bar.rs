use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api::Wallet;
use crate::app::use_api;
use crate::filters::context::use_filters;
use crate::filters::period::{Period, PRESETS};
use crate::filters::FilterPatch;

/// Date range, wallet and active-only controls bound to the shared filter.
#[component]
pub fn FilterBar(#[prop(default = true)] show_wallet: bool) -> impl IntoView {
    let filters = use_filters();
    let (wallets, set_wallets) = signal::<Vec<Wallet>>(vec![]);

    if show_wallet {
        let api = use_api();
        spawn_local(async move {
            match api.wallets().await {
                Ok(list) => set_wallets.set(list.into_iter().filter(|w| w.active).collect()),
                Err(e) => warn!("Could not load wallets for the filter: {}", e),
            }
        });
    }

    let active_preset = move || {
        let today = chrono::Local::now().date_naive();
        filters.filter.with(|f| Period::detect(f, today))
    };

    view! {
        <div class="filter-bar">
            <div class="filter-presets">
                {PRESETS
                    .iter()
                    .map(|&period| {
                        let class = move || {
                            if active_preset() == Some(period) {
                                "btn btn-small btn-preset active"
                            } else {
                                "btn btn-small btn-preset"
                            }
                        };
                        view! {
                            <button class=class on:click=move |_| filters.apply_period(period)>
                                {period.label()}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>

            <label class="filter-field">
                <span>"From"</span>
                <input
                    type="date"
                    class="input"
                    prop:value=move || filters.filter.with(|f| f.start.clone().unwrap_or_default())
                    on:change=move |ev| filters.update(FilterPatch::start(event_target_value(&ev)))
                />
            </label>
            <label class="filter-field">
                <span>"To"</span>
                <input
                    type="date"
                    class="input"
                    prop:value=move || filters.filter.with(|f| f.end.clone().unwrap_or_default())
                    on:change=move |ev| filters.update(FilterPatch::end(event_target_value(&ev)))
                />
            </label>

            {show_wallet.then(|| view! {
                <label class="filter-field">
                    <span>"Wallet"</span>
                    <select
                        class="input"
                        on:change=move |ev| filters.update(FilterPatch::wallet(event_target_value(&ev)))
                    >
                        <option value="" selected=move || filters.filter.with(|f| f.wallet.is_none())>
                            "All wallets"
                        </option>
                        {move || wallets.get().into_iter().map(|w| {
                            let label = w.name.clone();
                            let value = w.name.clone();
                            let selected_name = w.name;
                            view! {
                                <option
                                    value=value
                                    selected=move || filters.filter.with(|f| f.wallet.as_deref() == Some(selected_name.as_str()))
                                >
                                    {label}
                                </option>
                            }
                        }).collect::<Vec<_>>()}
                    </select>
                </label>
            })}

            <label class="filter-check">
                <input
                    type="checkbox"
                    prop:checked=move || filters.filter.with(|f| f.active_only.unwrap_or(false))
                    on:change=move |ev| filters.update(FilterPatch::active_only(event_target_checked(&ev)))
                />
                "Active only"
            </label>

            <button class="btn btn-secondary btn-small" on:click=move |_| filters.reset()>
                "Reset"
            </button>
        </div>
    }
}
