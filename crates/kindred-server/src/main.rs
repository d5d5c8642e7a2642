mod exit;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

use crate::exit::{exit_code_for, report_error};
use kindred_config::{self as config, AppConfig};
use kindred_core::time::{local_offset, now_utc};
use kindred_server::push::{dispatch_new_action_alerts, sender_from_config};
use kindred_server::state::{ApiSettings, AppState};
use kindred_server::build_router;
use kindred_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "kindred", version, about = "kindred relationship tracker")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Apply pending database migrations and exit
    Migrate,
    /// Send new-action push alerts once
    Push,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Overrides `[server] bind` from the config file
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        verbose: _,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    match config::resolve_config_path(config_path) {
        Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
        Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
        Err(err) => debug!(error = %err, "config unavailable"),
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    match command {
        Command::Serve(args) => serve(store, &app_config, args),
        Command::Migrate => {
            let version = store.schema_version().with_context(|| "read schema version")?;
            println!("schema version {version}");
            Ok(())
        }
        Command::Push => push(&store, &app_config),
    }
}

fn serve(store: Store, app_config: &AppConfig, args: ServeArgs) -> Result<()> {
    let bind = args.bind.unwrap_or(app_config.server.bind);
    let state = AppState::new(store, ApiSettings::from(app_config));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .with_context(|| format!("bind {bind}"))?;
        info!(%bind, "listening");
        axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .with_context(|| "serve http")
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn push(store: &Store, app_config: &AppConfig) -> Result<()> {
    if !app_config.push.enabled {
        info!("push disabled, nothing to send");
        return Ok(());
    }
    let sender = sender_from_config(&app_config.push)?;
    let offset = app_config.utc_offset.unwrap_or_else(local_offset);
    let summary = dispatch_new_action_alerts(store, sender.as_ref(), now_utc(), offset)?;
    println!(
        "push: {} delivered, {} failed, {} skipped",
        summary.delivered, summary.failed, summary.skipped
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
