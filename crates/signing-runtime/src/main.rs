//! `signing-runtime` binary.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use signing_runtime::{init_tracing, run_self_check, RuntimeConfig, RuntimeContainer};

#[derive(Parser)]
#[command(name = "signing-runtime")]
#[command(about = "Countersign document signing and identity attestation runtime", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration and ledger mode (signing key redacted)
    Config,

    /// Attest two parties and have both sign one document
    SelfCheck,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.telemetry).context("failed to initialize logging")?;

    match cli.command {
        Commands::Config => {
            let summary = serde_json::to_string_pretty(&config.summary())?;
            println!("{summary}");
        }
        Commands::SelfCheck => {
            let container =
                RuntimeContainer::new(config).context("failed to select ledger strategy")?;

            let report = match run_self_check(&container).await {
                Ok(report) => report,
                Err(e) => {
                    error!(kind = %e.kind(), retryable = e.is_retryable(), "self-check failed");
                    println!("{}", serde_json::to_string_pretty(&e.body())?);
                    bail!("self-check failed: {e}");
                }
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.passed() {
                bail!("self-check completed but verification failed");
            }
        }
    }

    Ok(())
}
