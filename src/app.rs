use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::components::sidebar::Sidebar;
use crate::config::AppConfig;
use crate::filters::context::FilterContext;
use crate::pages::agent_detail::AgentDetailPage;
use crate::pages::agents::AgentsPage;
use crate::pages::contestations::ContestationsPage;
use crate::pages::criteria::CriteriaPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::feedback::FeedbackPage;
use crate::pages::users::UsersPage;
use crate::pages::wallets::WalletsPage;
use crate::session::SessionContext;

pub fn use_api() -> ApiClient {
    expect_context::<ApiClient>()
}

pub fn use_config() -> AppConfig {
    expect_context::<AppConfig>()
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let client = ApiClient::new(&config);
    provide_context(config);
    provide_context(client.clone());
    FilterContext::provide();
    let session = SessionContext::provide();

    // Resolve the signed-in user on mount
    Effect::new(move |_| {
        let client = client.clone();
        spawn_local(async move {
            match client.current_user().await {
                Ok(user) => {
                    info!("Signed in as {} ({:?})", user.username, user.role());
                    session.sign_in(user);
                }
                Err(e) => warn!("Could not load the current user: {}", e),
            }
        });
    });

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=DashboardPage />
                        <Route path=path!("/agents") view=AgentsPage />
                        <Route path=path!("/agents/:id") view=AgentDetailPage />
                        <Route path=path!("/feedback") view=FeedbackPage />
                        <Route path=path!("/contestations") view=ContestationsPage />
                        <Route path=path!("/admin/wallets") view=WalletsPage />
                        <Route path=path!("/admin/criteria") view=CriteriaPage />
                        <Route path=path!("/admin/users") view=UsersPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
