//! RelayKV Server Binary
//!
//! Accepts producer connections and applies their commands with a worker pool.

use std::sync::Arc;

use clap::Parser;
use relaykv::config::OutputTarget;
use relaykv::sink::{self, OutputSink};
use relaykv::transport::{MemoryQueue, QueueListener};
use relaykv::{Config, Dispatcher, SharedStore};
use tracing_subscriber::{fmt, EnvFilter};

/// RelayKV Server
#[derive(Parser, Debug)]
#[command(name = "relaykv-server")]
#[command(about = "Queue-driven in-memory key-value store")]
#[command(version)]
struct Args {
    /// Listen address for producers (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5672")]
    listen: String,

    /// Output file for command results ("-" for stdout)
    #[arg(short, long, default_value = "output.txt")]
    output: String,

    /// Show debug information
    #[arg(short, long)]
    debug: bool,

    /// Number of workers applying commands
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Maximum concurrent producer connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    tracing::info!("RelayKV Server v{}", relaykv::VERSION);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .workers(args.workers)
        .output(OutputTarget::from_arg(&args.output))
        .debug(args.debug)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Output: {:?}", config.output);
    tracing::info!("Workers: {}", config.workers);

    let sink: Arc<dyn OutputSink> = match sink::open(&config.output) {
        Ok(s) => Arc::from(s),
        Err(e) => {
            tracing::error!("Failed to open output: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(SharedStore::new());

    // Only the listener publishes; once it stops, workers drain and exit
    let queue = MemoryQueue::new();
    let inbound = queue.subscribe();
    let listener = match QueueListener::bind(&config, queue.publisher()) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    drop(queue);

    let dispatcher = match Dispatcher::start(config.workers, store, sink, inbound) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Failed to start dispatcher: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = listener.run() {
        tracing::error!("Listener error: {}", e);
        std::process::exit(1);
    }

    let stats = dispatcher.join();
    tracing::info!("Server stopped after {} messages", stats.received);
}
