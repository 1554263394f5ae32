use std::sync::Arc;

use deal_proxy::config::{load_config, print_schema};
use deal_proxy::startup;
use deal_proxy::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    if std::env::args().skip(1).any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    if let Err(e) = startup::run(config).await {
        error!(
            event_name = "server.failed",
            event_domain = "server",
            "Server error: {}",
            e
        );
        std::process::exit(1);
    }
}
