//! RelayKV CLI Producer
//!
//! Publishes a single command to a RelayKV server.

use clap::Parser;
use relaykv::protocol::CommandKind;
use relaykv::transport::TcpPublisher;
use relaykv::{CommandRequest, Producer, RelayError};
use tracing_subscriber::{fmt, EnvFilter};

/// RelayKV CLI
#[derive(Parser, Debug)]
#[command(name = "relaykv-cli")]
#[command(about = "Publish a command to a RelayKV server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5672")]
    server: String,

    /// Action: add, get, remove or list
    #[arg(short, long, value_parser = parse_action)]
    action: CommandKind,

    /// Key parameter used by add, get and remove
    #[arg(short, long)]
    key: Option<String>,

    /// Value parameter used by add
    #[arg(short, long)]
    value: Option<String>,
}

fn parse_action(s: &str) -> Result<CommandKind, String> {
    s.parse().map_err(|e: RelayError| e.to_string())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let request = CommandRequest {
        kind: args.action,
        key: args.key,
        value: args.value,
    };

    // Reject bad input before connecting
    let command = match request.build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let publisher = match TcpPublisher::connect(&args.server) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let producer = Producer::new(publisher);
    if let Err(e) = producer.submit(&command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Published {} command", command.kind());
}
