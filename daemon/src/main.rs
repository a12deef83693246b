//! Volt daemon: entry point for running a tangle node.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use volt_node::{init_logging, LogFormat, NodeConfig, VoltNode};
use volt_tips::TipStrategy;
use volt_work::PowVariant;

#[derive(Parser)]
#[command(name = "volt-daemon", about = "Volt energy-trading tangle node")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VOLT_CONFIG")]
    config: Option<PathBuf>,

    /// Node identifier (trade sender, genesis prefix, radio address).
    #[arg(long, env = "VOLT_NODE_ID")]
    node_id: Option<String>,

    /// Gossip listen address, e.g. "0.0.0.0:8080".
    #[arg(long, env = "VOLT_LISTEN_ADDR")]
    listen: Option<String>,

    /// Gossip peers (comma-separated: "10.0.0.2,10.0.0.3:9000").
    #[arg(long, env = "VOLT_PEERS", value_delimiter = ',')]
    peers: Vec<String>,

    /// weakest, unweighted_random_walk, weighted_random_walk,
    /// greedy_weighted_walk or mcmc.
    #[arg(long, env = "VOLT_TIP_STRATEGY")]
    tip_strategy: Option<TipStrategy>,

    /// standard, counter_mode, clockwork or feistel.
    #[arg(long, env = "VOLT_POW_VARIANT")]
    pow_variant: Option<PowVariant>,

    /// Leading zero hex characters required of a work hash.
    #[arg(long, env = "VOLT_POW_DIFFICULTY")]
    difficulty: Option<u32>,

    /// Milliseconds between producer rounds.
    #[arg(long, env = "VOLT_PRODUCE_INTERVAL_MS")]
    produce_interval_ms: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VOLT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOLT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Node operations.
    #[command(name = "node")]
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node until SIGINT or SIGTERM.
    Run,
    /// Print the effective configuration as TOML and exit.
    Config,
}

impl Cli {
    /// File settings (or defaults), with flags and env vars layered on top.
    fn resolve_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => NodeConfig::default(),
        };

        if let Some(node_id) = &self.node_id {
            config.node_id = node_id.clone();
        }
        if let Some(listen) = &self.listen {
            config.listen_addr = listen.clone();
        }
        if !self.peers.is_empty() {
            config.peers = self.peers.clone();
        }
        if let Some(strategy) = self.tip_strategy {
            config.tip_strategy = strategy;
        }
        if let Some(variant) = self.pow_variant {
            config.pow_variant = variant;
        }
        if let Some(difficulty) = self.difficulty {
            config.pow_difficulty = difficulty;
        }
        if let Some(interval) = self.produce_interval_ms {
            config.produce_interval_ms = interval;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Command::Node { action } => match action {
            NodeAction::Config => {
                print!("{}", config.to_toml_string()?);
            }
            NodeAction::Run => {
                init_logging(config.log_format, &config.log_level)?;
                if let Some(path) = &cli.config {
                    tracing::info!("Loaded config from {}", path.display());
                }
                if !config.peers.is_empty() {
                    tracing::info!("Gossip peers: {}", config.peers.join(", "));
                }
                if config.radio.enabled {
                    tracing::warn!("this build has no radio driver, radio gossip stays off");
                }

                let mut node = VoltNode::tcp_only(config)?;
                node.run().await?;
                tracing::info!("Volt daemon exited cleanly");
            }
        },
    }

    Ok(())
}
