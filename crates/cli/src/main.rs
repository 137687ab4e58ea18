// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use nodepulse_cli::commands::{endpoint, status, watch};

#[derive(Parser)]
#[command(name = "nodepulse")]
#[command(about = "NodePulse - live health of a Bitcoin node behind a dashboard backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect once, wait for the first snapshot and print a health report.
    /// Exits non-zero when the node is out of sync or nothing arrived.
    Status {
        /// Dashboard backend origin, e.g. http://localhost:8080
        #[arg(long, short, env = "NODEPULSE_URL", default_value = "http://127.0.0.1:8080")]
        url: String,

        /// Seconds to wait for the first snapshot
        #[arg(long, default_value_t = 15)]
        timeout_secs: u64,
    },
    /// Print the health report on every snapshot
    Watch {
        #[arg(long, short, env = "NODEPULSE_URL", default_value = "http://127.0.0.1:8080")]
        url: String,
    },
    /// Show the WebSocket and config URLs derived from a page URL
    Endpoint {
        #[arg(long, short)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { url, timeout_secs } => {
            if !status::run(&url, timeout_secs).await? {
                std::process::exit(2);
            }
            Ok(())
        }
        Commands::Watch { url } => watch::run(&url).await,
        Commands::Endpoint { url } => endpoint::run(&url),
    }
}
