//! Stoke sweeper daemon
//!
//! Connects to Redis, runs the decay sweep on a fixed interval and shuts
//! down cleanly on ctrl-c. Request-side operations are served by the
//! embedding HTTP layer through the `Engagement` facade; this binary only
//! provides the periodic trigger.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stoke::ranking::RankingIndex;
use stoke::store::KvStore;
use stoke::{spawn_decay_task, Args, DecaySweeper, RedisStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stoke={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Stoke - engagement scoring engine");
    info!("======================================");
    info!("Redis: {}", args.redis_url);
    info!("Decay interval: {}s", args.decay_interval_secs);
    info!("Decay page size: {}", args.decay_page_size);
    info!("======================================");

    let redis = match RedisStore::connect(&args.redis_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Redis connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn KvStore> = Arc::new(redis.clone());
    let ranking = RankingIndex::new(Arc::clone(&store));
    let sweeper = Arc::new(
        DecaySweeper::new(store, ranking).with_page_size(args.decay_page_size),
    );

    let decay_task = spawn_decay_task(sweeper, Duration::from_secs(args.decay_interval_secs));
    info!("Decay task running, next sweep in {}s", args.decay_interval_secs);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    decay_task.abort();
    redis.close();
    info!("Stoke stopped");

    Ok(())
}
