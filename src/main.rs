use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_server::app::builtin;
use app_server::cli::Cli;
use app_server::lifecycle::startup;
use app_server::AppRegistry;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut registry = AppRegistry::new();
    registry.register("demo", builtin::demo_module());

    if let Err(err) = startup::run(cli, registry).await {
        tracing::error!(error = %err, "server failed");
        std::process::exit(1);
    }
}
