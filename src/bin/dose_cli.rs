use clap::Parser;
use dose_count::core::dispatcher::{DEFAULT_MAX_TOTAL, DEFAULT_SYNC_THRESHOLD};
use dose_count::domain::model::TaskCreated;
use dose_count::domain::ports::TaskStore;
use dose_count::utils::logger;
use dose_count::{
    DeferredWorker, DispatchLimits, DispatchOutcome, Dispatcher, InMemoryCache, InMemoryTaskStore,
};
use std::sync::Arc;

/// One-shot query against fresh in-memory stores. Exercises the same
/// dispatch and deferral paths as the server; a deferred result is driven
/// to completion in-process instead of being left for a poller.
#[derive(Parser)]
#[command(name = "dose-cli")]
#[command(about = "Count ordered 1-or-2 pill dose sequences for one total")]
struct Args {
    /// Total number of pills
    #[arg(short, long)]
    total: u32,

    /// Largest accepted total
    #[arg(long, default_value_t = DEFAULT_MAX_TOTAL)]
    max_total: u32,

    /// Largest total computed synchronously
    #[arg(long, default_value_t = DEFAULT_SYNC_THRESHOLD)]
    sync_threshold: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let cache = Arc::new(InMemoryCache::new());
    let (store, mut creations) = InMemoryTaskStore::with_notifications(1);
    let store = Arc::new(store);

    let dispatcher = Dispatcher::new(
        Arc::clone(&cache),
        Arc::clone(&store),
        DispatchLimits {
            max_total: args.max_total,
            sync_threshold: args.sync_threshold,
        },
    );

    match dispatcher.handle(args.total).await {
        Ok(DispatchOutcome::Completed(count)) => {
            println!("✅ {} pills: {} dosing sequences", args.total, count);
        }
        Ok(DispatchOutcome::Deferred(task_id)) => {
            tracing::info!("Total {} deferred as task {}", args.total, task_id);

            let worker = DeferredWorker::new(cache, Arc::clone(&store));
            if let Some(event) = creations.recv().await {
                worker
                    .react(TaskCreated {
                        id: event.id,
                        total: event.total,
                    })
                    .await;
            }

            match store.fetch(task_id).await? {
                Some(task) => match task.result {
                    Some(count) => {
                        println!(
                            "✅ {} pills: {} dosing sequences (task {} {})",
                            args.total, count, task.id, task.status
                        );
                    }
                    None => {
                        eprintln!("❌ Task {} finished without a result", task.id);
                        std::process::exit(1);
                    }
                },
                None => {
                    eprintln!("❌ Task {} disappeared from the store", task_id);
                    std::process::exit(1);
                }
            }
        }
        Ok(DispatchOutcome::Invalid) => {
            eprintln!(
                "❌ Total must be between 1 and {} (got {})",
                args.max_total, args.total
            );
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!("❌ Dispatch failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
