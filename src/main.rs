use callqa::app::App;
use callqa::config::AppConfig;
use callqa::logging;
use leptos::prelude::*;

fn main() {
    let config = AppConfig::from_build_env();
    logging::init(&config.log_level);
    tracing::info!("Starting dashboard against {}", config.api_base);

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
