use leptos::prelude::*;

use crate::session::use_session;

#[component]
pub fn Sidebar() -> impl IntoView {
    let session = use_session();
    let can_review = move || session.session.with(|s| s.can_review());
    let can_administer = move || session.session.with(|s| s.can_administer());
    let user_name = move || {
        session
            .session
            .with(|s| s.user().map(|u| u.display_name().to_string()))
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"CallQA"</h1>
                <p class="sidebar-subtitle">"Quality Monitoring"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/" class="nav-link">"Dashboard"</a>
                </li>
                <li class="nav-item">
                    <a href="/agents" class="nav-link">"Agents"</a>
                </li>
                <li class="nav-item">
                    <a href="/feedback" class="nav-link">"Feedback"</a>
                </li>
                <Show when=can_review>
                    <li class="nav-item">
                        <a href="/contestations" class="nav-link">"Contestations"</a>
                    </li>
                </Show>
            </ul>

            <Show when=can_administer>
                <p class="nav-section">"Administration"</p>
                <ul class="nav-list">
                    <li class="nav-item">
                        <a href="/admin/wallets" class="nav-link">"Wallets"</a>
                    </li>
                    <li class="nav-item">
                        <a href="/admin/criteria" class="nav-link">"Criteria"</a>
                    </li>
                    <li class="nav-item">
                        <a href="/admin/users" class="nav-link">"Users"</a>
                    </li>
                </ul>
            </Show>

            <div class="sidebar-footer">
                {move || match user_name() {
                    Some(name) => view! { <span class="sidebar-user">{name}</span> }.into_any(),
                    None => view! { <span class="sidebar-user muted">"Not signed in"</span> }.into_any(),
                }}
            </div>
        </nav>
    }
}
