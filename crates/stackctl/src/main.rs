use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stackctl_core::iaas::{
    create_network_area_wait_handler, create_network_wait_handler,
    delete_network_area_wait_handler, delete_network_wait_handler,
    update_network_area_wait_handler, update_network_wait_handler,
};
use stackctl_core::skcf::{
    create_or_update_cluster_wait_handler, delete_cluster_wait_handler,
    disable_service_wait_handler, enable_service_wait_handler,
};
use stackctl_core::{Config, StackitClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod wait;

use cli::{
    Cli, ClusterCommands, Commands, NetworkAreaCommands, NetworkCommands, ServiceCommands,
    WaitArgs,
};
use wait::Polling;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute_command(&cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(wait::exit_code(&e));
    }
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "stackctl=warn,stackctl_core=warn",
            1 => "stackctl=info,stackctl_core=info",
            2 => "stackctl=debug,stackctl_core=debug",
            _ => "stackctl=trace,stackctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config_file {
        Some(path) => {
            let path = PathBuf::from(path);
            debug!("Loading config from explicit path: {:?}", path);
            Config::load_from_path(&path)?
        }
        None => {
            debug!("Loading config from default location");
            Config::load()?
        }
    };

    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(region) = &cli.region {
        config.region = region.clone();
    }
    Ok(config)
}

/// Cancel `token` on the first Ctrl-C
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling wait");
            token.cancel();
        }
    });
}

async fn execute_command(cli: &Cli) -> Result<()> {
    trace!("Executing command: {:?}", cli.command);

    if let Commands::ConfigPath = cli.command {
        let path = match &cli.config_file {
            Some(path) => PathBuf::from(path),
            None => Config::config_path()?,
        };
        println!("{}", path.display());
        return Ok(());
    }

    let config = load_config(cli)?;
    let endpoints = config.endpoints()?;
    debug!(skcf = %endpoints.skcf, iaas = %endpoints.iaas, "Resolved endpoints");
    let client = StackitClient::new(endpoints, config.token.clone())
        .context("Failed to create STACKIT client")?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let settings = config.wait;
    let progress = !cli.quiet;
    let cluster =
        |args: &WaitArgs| Polling::resolve(args, settings.interval(), settings.cluster_timeout());
    let service =
        |args: &WaitArgs| Polling::resolve(args, settings.interval(), settings.service_timeout());
    let network =
        |args: &WaitArgs| Polling::resolve(args, settings.interval(), settings.network_timeout());

    match &cli.command {
        Commands::Cluster(command) => match command {
            ClusterCommands::WaitReady { target, wait } => {
                let handle =
                    create_or_update_cluster_wait_handler(&client, &target.project, &target.name);
                wait::run(handle, cluster(wait), &cancel, progress).await
            }
            ClusterCommands::WaitDeleted { target, wait } => {
                let handle = delete_cluster_wait_handler(&client, &target.project, &target.name);
                wait::run(handle, cluster(wait), &cancel, progress).await
            }
        },
        Commands::Service(command) => match command {
            ServiceCommands::WaitEnabled { project, wait } => {
                let handle = enable_service_wait_handler(&client, project);
                wait::run(handle, service(wait), &cancel, progress).await
            }
            ServiceCommands::WaitDisabled { project, wait } => {
                let handle = disable_service_wait_handler(&client, project);
                wait::run(handle, service(wait), &cancel, progress).await
            }
        },
        Commands::NetworkArea(command) => match command {
            NetworkAreaCommands::WaitCreated { target, wait } => {
                let handle =
                    create_network_area_wait_handler(&client, &target.organization, &target.area);
                wait::run(handle, network(wait), &cancel, progress).await
            }
            NetworkAreaCommands::WaitUpdated { target, wait } => {
                let handle =
                    update_network_area_wait_handler(&client, &target.organization, &target.area);
                wait::run(handle, network(wait), &cancel, progress).await
            }
            NetworkAreaCommands::WaitDeleted { target, wait } => {
                let handle =
                    delete_network_area_wait_handler(&client, &target.organization, &target.area);
                wait::run(handle, network(wait), &cancel, progress).await
            }
        },
        Commands::Network(command) => match command {
            NetworkCommands::WaitCreated { target, wait } => {
                let handle = create_network_wait_handler(&client, &target.project, &target.network);
                wait::run(handle, network(wait), &cancel, progress).await
            }
            NetworkCommands::WaitUpdated { target, wait } => {
                let handle = update_network_wait_handler(&client, &target.project, &target.network);
                wait::run(handle, network(wait), &cancel, progress).await
            }
            NetworkCommands::WaitDeleted { target, wait } => {
                let handle = delete_network_wait_handler(&client, &target.project, &target.network);
                wait::run(handle, network(wait), &cancel, progress).await
            }
        },
        Commands::ConfigPath => Ok(()),
    }
}
