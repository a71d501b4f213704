mod config;

use clap::{Args, Parser, Subcommand};
use config::{Config, ConfigError, LoggingConfig, MetricsConfig};
use metrics_exporter_statsd::StatsdBuilder;
use std::future::Future;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bff", about = "Product page aggregator and catalog backend")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Serve the aggregation endpoints
    Bff(CommandArgs),
    /// Serve the seeded catalog backend
    Catalog(CommandArgs),
}

#[derive(Args)]
struct CommandArgs {
    #[arg(long)]
    config: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("config file has no `{0}` section")]
    MissingSection(&'static str),
    #[error("invalid bff config: {0}")]
    InvalidBff(#[from] aggregator::config::ValidationError),
    #[error("invalid catalog config: {0}")]
    InvalidCatalog(#[from] catalog::config::ValidationError),
    #[error("could not set up metrics: {0}")]
    Metrics(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Bff(#[from] aggregator::errors::BffError),
    #[error(transparent)]
    Catalog(#[from] catalog::CatalogApiError),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        CliCommand::Bff(args) | CliCommand::Catalog(args) => &args.config,
    };
    let config = Config::from_file(config_path)?;

    let _sentry_guard = init_logging(config.common.logging.as_ref());
    if let Some(metrics_config) = &config.common.metrics {
        init_metrics(metrics_config, service_name(&cli.command))?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        CliCommand::Bff(_) => {
            let bff_config = config.bff.ok_or(CliError::MissingSection("bff"))?;
            bff_config.validate()?;
            tracing::info!("Starting bff");
            runtime.block_on(run_until_shutdown(aggregator::run(bff_config)))
        }
        CliCommand::Catalog(_) => {
            let catalog_config = config
                .catalog
                .ok_or(CliError::MissingSection("catalog"))?;
            catalog_config.validate()?;
            tracing::info!("Starting catalog");
            runtime.block_on(run_until_shutdown(catalog::run(catalog_config)))
        }
    }
}

fn service_name(command: &CliCommand) -> &'static str {
    match command {
        CliCommand::Bff(_) => "bff",
        CliCommand::Catalog(_) => "catalog",
    }
}

/// Installs the fmt subscriber and, with a DSN configured, the sentry client and layer.
fn init_logging(logging: Option<&LoggingConfig>) -> Option<sentry::ClientInitGuard> {
    let guard = logging.map(|logging| {
        sentry::init((
            logging.sentry_dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(guard.as_ref().map(|_| sentry::integrations::tracing::layer()))
        .init();

    guard
}

fn init_metrics(metrics: &MetricsConfig, prefix: &str) -> Result<(), CliError> {
    let recorder = StatsdBuilder::from(metrics.statsd_host.clone(), metrics.statsd_port)
        .build(Some(prefix))
        .map_err(|e| CliError::Metrics(e.to_string()))?;

    metrics::set_global_recorder(recorder).map_err(|e| CliError::Metrics(e.to_string()))?;
    tracing::info!(
        host = %metrics.statsd_host,
        port = metrics.statsd_port,
        "Statsd exporter installed"
    );
    Ok(())
}

async fn run_until_shutdown<E>(service: impl Future<Output = Result<(), E>>) -> Result<(), CliError>
where
    CliError: From<E>,
{
    tokio::select! {
        result = service => result.map_err(CliError::from),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            Ok(())
        }
    }
}
