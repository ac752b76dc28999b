//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};

/// Wait for asynchronous STACKIT operations to finish
#[derive(Parser, Debug)]
#[command(name = "stackctl")]
#[command(
    version,
    about = "Wait for asynchronous STACKIT operations to finish"
)]
#[command(long_about = "
Wait for asynchronous STACKIT operations to finish

Each command polls a resource's status until the operation reaches a terminal
state, then prints the final resource as JSON. Ctrl-C stops the wait.

EXAMPLES:
    # Wait until a cluster is healthy
    stackctl cluster wait-ready --project PROJECT_ID --name my-cluster

    # Wait until a network is gone, giving up after two minutes
    stackctl network wait-deleted --project PROJECT_ID --network NETWORK_ID --timeout 120

    # Wait for a network area update, polling every second
    stackctl network-area wait-updated --organization ORG_ID --area AREA_ID --interval 1

Exit status is 0 on success, 1 when the operation or a status read failed,
124 on timeout and 130 when cancelled.
")]
pub struct Cli {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "STACKCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Bearer token, overrides the configured one
    #[arg(long, global = true, env = "STACKIT_SERVICE_ACCOUNT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// STACKIT region, overrides the configured one
    #[arg(long, global = true, env = "STACKIT_REGION")]
    pub region: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide the progress spinner
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// SKCF cluster operations
    #[command(subcommand)]
    Cluster(ClusterCommands),

    /// SKCF service enablement
    #[command(subcommand)]
    Service(ServiceCommands),

    /// IaaS network area operations
    #[command(subcommand)]
    NetworkArea(NetworkAreaCommands),

    /// IaaS network operations
    #[command(subcommand)]
    Network(NetworkCommands),

    /// Show the resolved configuration file path
    ConfigPath,
}

/// Polling overrides shared by every wait command
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Maximum time to wait in seconds [default: from config]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Polling interval in seconds [default: from config]
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ClusterTarget {
    /// Project ID
    #[arg(long)]
    pub project: String,

    /// Cluster name
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct NetworkAreaTarget {
    /// Organization ID
    #[arg(long)]
    pub organization: String,

    /// Network area ID
    #[arg(long)]
    pub area: String,
}

#[derive(Args, Debug, Clone)]
pub struct NetworkTarget {
    /// Project ID
    #[arg(long)]
    pub project: String,

    /// Network ID
    #[arg(long)]
    pub network: String,
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// Wait until a created or updated cluster is healthy
    WaitReady {
        #[command(flatten)]
        target: ClusterTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait until a cluster no longer appears in the project
    WaitDeleted {
        #[command(flatten)]
        target: ClusterTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// Wait until the service is enabled for a project
    WaitEnabled {
        /// Project ID
        #[arg(long)]
        project: String,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait until the service is disabled for a project
    WaitDisabled {
        /// Project ID
        #[arg(long)]
        project: String,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum NetworkAreaCommands {
    /// Wait until a network area is created
    WaitCreated {
        #[command(flatten)]
        target: NetworkAreaTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait until a network area update has settled
    WaitUpdated {
        #[command(flatten)]
        target: NetworkAreaTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait until a network area is deleted
    WaitDeleted {
        #[command(flatten)]
        target: NetworkAreaTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum NetworkCommands {
    /// Wait until a network is created
    WaitCreated {
        #[command(flatten)]
        target: NetworkTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait until a network update has settled
    WaitUpdated {
        #[command(flatten)]
        target: NetworkTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait until a network is deleted
    WaitDeleted {
        #[command(flatten)]
        target: NetworkTarget,
        #[command(flatten)]
        wait: WaitArgs,
    },
}
