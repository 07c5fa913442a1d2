//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// neutron-harness - drive and observe Neutron cross-chain test environments
#[derive(Parser, Debug)]
#[command(name = "neutron-harness")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to harness.yaml (defaults to $HARNESS_CONFIG_DIR or the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the latest block height of a chain
    Height(HeightArgs),

    /// Wait until a chain has produced N more blocks
    WaitBlocks(WaitBlocksArgs),

    /// Wait for an interchain query result at or above a remote height
    WaitQuery(WaitQueryArgs),

    /// Wait until a contract has recorded an exact number of transfers
    WaitTransfers(WaitTransfersArgs),

    /// Wait for the acknowledgement of an interchain transaction
    WaitAck(WaitAckArgs),

    /// Pause part of the environment (requires a fault backend)
    Pause(FaultArgs),

    /// Resume a paused part of the environment
    Unpause(FaultArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Which chain a command talks to
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChainArg {
    #[default]
    Neutron,
    Counterparty,
}

#[derive(Args, Debug)]
pub struct HeightArgs {
    #[arg(long, value_enum, default_value_t)]
    pub chain: ChainArg,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WaitBlocksArgs {
    /// Number of new blocks to wait for
    pub blocks: u64,

    #[arg(long, value_enum, default_value_t)]
    pub chain: ChainArg,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Attempt budget shared by the poll-based commands
#[derive(Args, Debug, Clone, Copy)]
pub struct PollArgs {
    /// Maximum number of fetches, one Neutron block apart (defaults to polling.max-attempts)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WaitQueryArgs {
    /// Registered interchain query id
    pub query_id: u64,

    /// Minimum remote height the submitted result must be for
    #[arg(long)]
    pub height: u64,

    #[command(flatten)]
    pub poll: PollArgs,
}

#[derive(Args, Debug)]
pub struct WaitTransfersArgs {
    /// Contract name from the config, or a bech32 address
    #[arg(long)]
    pub contract: String,

    /// Exact number of transfers to wait for
    #[arg(long)]
    pub expected: u64,

    #[command(flatten)]
    pub poll: PollArgs,
}

#[derive(Args, Debug)]
pub struct WaitAckArgs {
    /// Contract name from the config, or a bech32 address
    #[arg(long)]
    pub contract: String,

    /// Interchain account id the transaction was sent through
    #[arg(long)]
    pub ica_id: String,

    /// Sequence number of the IBC packet
    #[arg(long)]
    pub sequence: u64,

    #[command(flatten)]
    pub poll: PollArgs,
}

#[derive(Args, Debug)]
pub struct FaultArgs {
    /// Logical target from faults.containers (e.g. relayer)
    pub target: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}
