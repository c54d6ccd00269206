//! Fellowship report - balances and identities of the Polkadot Technical Fellowship.

mod bootstrap;
mod output;

use clap::Parser;
use color_eyre::Result;
use fellows_core::AppConfig;
use fellows_core::config::{load_config, load_config_from};
use output::{Output, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Fellowship report - ranks, names and balances of the Polkadot Technical Fellowship.
#[derive(Parser, Debug)]
#[command(name = "fellows")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to read instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Relay chain RPC endpoint URL (for balances)
    #[arg(long = "relay-url")]
    relay_url: Option<String>,

    /// People chain RPC endpoint URL (for identity data)
    #[arg(long = "people-url")]
    people_url: Option<String>,

    /// Collectives chain RPC endpoint URL (for fellowship membership)
    #[arg(long = "collectives-url")]
    collectives_url: Option<String>,

    /// Test network RPC endpoint URL
    #[arg(long = "testnet-url")]
    testnet_url: Option<String>,

    /// Account to report on before the member table
    #[arg(short, long)]
    address: Option<String>,

    /// Per-query timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Members looked up concurrently
    #[arg(long = "batch-size")]
    batch_size: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Do not connect to the test network
    #[arg(long)]
    skip_testnet: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Overlay command-line values onto the loaded configuration.
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = &self.relay_url {
            config.endpoints.relay = url.clone();
        }
        if let Some(url) = &self.people_url {
            config.endpoints.people = url.clone();
        }
        if let Some(url) = &self.collectives_url {
            config.endpoints.collectives = url.clone();
        }
        if let Some(url) = &self.testnet_url {
            config.endpoints.testnet = url.clone();
        }
        if let Some(address) = &self.address {
            config.address = address.clone();
        }
        if let Some(timeout) = self.timeout {
            config.query_timeout_secs = Some(timeout);
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        config
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("fellows_cli={}", level).parse()?)
        .add_directive(format!("fellows_chain={}", level).parse()?)
        .add_directive(format!("fellows_core={}", level).parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    init_logging(args.verbose)?;

    let file_config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let config = args.apply(file_config);
    config.validate()?;

    let out = Output::new(args.format);
    // The failure itself is reported by color-eyre on exit
    let outcome = bootstrap::run(&config, !args.skip_testnet, out).await;
    out.line("\nExecution complete\n");
    outcome
}
