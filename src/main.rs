use clap::Parser;
use dose_count::utils::{logger, validation::Validate};
use dose_count::web::{router, AppState};
use dose_count::{CliConfig, DeferredWorker, Dispatcher, InMemoryCache, InMemoryTaskStore, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting dose-count server");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "Dispatch domain [1, {}], synchronous up to {}",
        settings.max_total,
        settings.sync_threshold
    );

    let cache = Arc::new(InMemoryCache::new());
    let (store, creations) = InMemoryTaskStore::with_notifications(settings.queue_capacity);
    let store = Arc::new(store);

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&cache),
        Arc::clone(&store),
        settings.limits(),
    ));
    let worker = DeferredWorker::new(cache, Arc::clone(&store));
    tokio::spawn(worker.run(creations));

    let app = router(AppState {
        dispatcher,
        tasks: store,
    });

    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    tracing::info!("🚀 Listening on http://{}", settings.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
