//! Node configuration with TOML file support.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use volt_network::{RadioTiming, BROADCAST_DESTINATION};
use volt_tips::{TipSelector, TipStrategy, DEFAULT_MCMC_ALPHA};
use volt_work::{PowVariant, WorkConfig, DEFAULT_CLOCKWORK_ROUNDS, MAX_ATTEMPTS};

use crate::{LogFormat, NodeError};

/// Configuration for a Volt node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Identifier used as sender of produced trades, genesis id prefix and
    /// radio address.
    #[serde(default = "default_node_id")]
    pub node_id: String,

    /// Address the gossip listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Gossip peers (`host` or `host:port`).
    #[serde(default)]
    pub peers: Vec<String>,

    #[serde(default)]
    pub tip_strategy: TipStrategy,

    /// Bias of the MCMC walk; ignored by other strategies.
    #[serde(default = "default_mcmc_alpha")]
    pub mcmc_alpha: f64,

    #[serde(default)]
    pub pow_variant: PowVariant,

    /// Leading zero hex characters required of a work hash.
    #[serde(default = "default_pow_difficulty")]
    pub pow_difficulty: u32,

    #[serde(default = "default_pow_max_attempts")]
    pub pow_max_attempts: u64,

    #[serde(default = "default_clockwork_rounds")]
    pub clockwork_rounds: u32,

    /// Pause between two producer rounds.
    #[serde(default = "default_produce_interval_ms")]
    pub produce_interval_ms: u64,

    #[serde(default)]
    pub trade: TradeConfig,

    #[serde(default)]
    pub radio: RadioConfig,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Shape of the trades the producer drafts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeConfig {
    #[serde(default = "default_receiver")]
    pub receiver: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_price_per_unit")]
    pub price_per_unit: f64,
    /// Traded amounts are drawn uniformly from `min_amount..=max_amount`.
    #[serde(default = "default_min_amount")]
    pub min_amount: f64,
    #[serde(default = "default_max_amount")]
    pub max_amount: f64,
}

/// Packet radio settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Node id that outbound radio snapshots are addressed to.
    #[serde(default = "default_radio_destination")]
    pub destination: String,
    #[serde(default = "default_packet_interval_ms")]
    pub packet_interval_ms: u64,
    #[serde(default = "default_reassembly_timeout_ms")]
    pub reassembly_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_node_id() -> String {
    "node_A".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_mcmc_alpha() -> f64 {
    DEFAULT_MCMC_ALPHA
}

fn default_pow_difficulty() -> u32 {
    3
}

fn default_pow_max_attempts() -> u64 {
    MAX_ATTEMPTS
}

fn default_clockwork_rounds() -> u32 {
    DEFAULT_CLOCKWORK_ROUNDS
}

fn default_produce_interval_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_receiver() -> String {
    "node_B".to_string()
}

fn default_unit() -> String {
    "kWh".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_price_per_unit() -> f64 {
    0.12
}

fn default_min_amount() -> f64 {
    1.0
}

fn default_max_amount() -> f64 {
    10.0
}

fn default_radio_destination() -> String {
    BROADCAST_DESTINATION.to_string()
}

fn default_packet_interval_ms() -> u64 {
    450
}

fn default_reassembly_timeout_ms() -> u64 {
    5_000
}

fn default_poll_interval_ms() -> u64 {
    10
}

/// Characters the ledger line codec splits on.
const LEDGER_SEPARATORS: [char; 5] = [',', ';', '[', ']', '\n'];
/// Ledger separators plus the gossip field separator.
const NODE_ID_SEPARATORS: [char; 6] = [',', ';', '[', ']', '\n', ' '];

fn check_text(field: &str, value: &str, separators: &[char]) -> Result<(), NodeError> {
    if value.contains(separators) {
        return Err(NodeError::Config(format!(
            "{field} {value:?} contains a ledger or gossip separator"
        )));
    }
    Ok(())
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.node_id.trim().is_empty() {
            return Err(NodeError::Config("node_id must not be empty".into()));
        }
        check_text("node_id", &self.node_id, &NODE_ID_SEPARATORS)?;
        check_text("radio.destination", &self.radio.destination, &NODE_ID_SEPARATORS)?;
        check_text("trade.receiver", &self.trade.receiver, &LEDGER_SEPARATORS)?;
        check_text("trade.unit", &self.trade.unit, &LEDGER_SEPARATORS)?;
        check_text("trade.currency", &self.trade.currency, &LEDGER_SEPARATORS)?;
        if self.pow_difficulty > volt_work::MAX_DIFFICULTY {
            return Err(NodeError::Config(format!(
                "pow_difficulty {} exceeds {}",
                self.pow_difficulty,
                volt_work::MAX_DIFFICULTY
            )));
        }
        if !(self.mcmc_alpha.is_finite() && self.mcmc_alpha >= 0.0) {
            return Err(NodeError::Config("mcmc_alpha must be a non-negative number".into()));
        }
        let trade = &self.trade;
        if !(trade.min_amount.is_finite()
            && trade.max_amount.is_finite()
            && trade.min_amount <= trade.max_amount)
        {
            return Err(NodeError::Config(
                "trade amount range must satisfy min_amount <= max_amount".into(),
            ));
        }
        // Sampling panics on a span wider than f64 can hold.
        if !(trade.max_amount - trade.min_amount).is_finite() {
            return Err(NodeError::Config(
                "trade amount range is too wide to sample from".into(),
            ));
        }
        if self.produce_interval_ms == 0 || self.radio.poll_interval_ms == 0 {
            return Err(NodeError::Config("intervals must be positive".into()));
        }
        Ok(())
    }

    pub fn tip_selector(&self) -> TipSelector {
        TipSelector::new(self.tip_strategy).with_alpha(self.mcmc_alpha)
    }

    pub fn work_config(&self) -> WorkConfig {
        WorkConfig::new(self.pow_variant)
            .with_max_attempts(self.pow_max_attempts)
            .with_clockwork_rounds(self.clockwork_rounds)
    }

    pub fn produce_interval(&self) -> Duration {
        Duration::from_millis(self.produce_interval_ms)
    }
}

impl RadioConfig {
    pub fn timing(&self) -> RadioTiming {
        RadioTiming {
            packet_interval: Duration::from_millis(self.packet_interval_ms),
            reassembly_timeout: Duration::from_millis(self.reassembly_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            listen_addr: default_listen_addr(),
            peers: Vec::new(),
            tip_strategy: TipStrategy::default(),
            mcmc_alpha: default_mcmc_alpha(),
            pow_variant: PowVariant::default(),
            pow_difficulty: default_pow_difficulty(),
            pow_max_attempts: default_pow_max_attempts(),
            clockwork_rounds: default_clockwork_rounds(),
            produce_interval_ms: default_produce_interval_ms(),
            trade: TradeConfig::default(),
            radio: RadioConfig::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            receiver: default_receiver(),
            unit: default_unit(),
            currency: default_currency(),
            price_per_unit: default_price_per_unit(),
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
        }
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            destination: default_radio_destination(),
            packet_interval_ms: default_packet_interval_ms(),
            reassembly_timeout_ms: default_reassembly_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.pow_difficulty, 3);
        assert_eq!(config.tip_strategy, TipStrategy::Weakest);
        assert_eq!(config.trade.unit, "kWh");
        assert_eq!(config.radio.timing(), RadioTiming::default());
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            node_id = "meter_7"
            peers = ["10.0.0.2", "10.0.0.3:9000"]
            tip_strategy = "mcmc"
            mcmc_alpha = 0.5
            pow_variant = "feistel"

            [trade]
            price_per_unit = 0.2

            [radio]
            enabled = true
            destination = "node_B"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.node_id, "meter_7");
        assert_eq!(config.peers.len(), 2);
        assert_eq!(config.tip_selector().strategy, TipStrategy::Mcmc);
        assert_eq!(config.work_config().variant, PowVariant::Feistel);
        assert_eq!(config.trade.price_per_unit, 0.2);
        assert_eq!(config.trade.currency, "USD"); // default
        assert!(config.radio.enabled);
        assert_eq!(config.radio.packet_interval_ms, 450); // default
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let result = NodeConfig::from_toml_str(r#"tip_strategy = "lottery""#);
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn separator_in_node_id_is_rejected() {
        let result = NodeConfig::from_toml_str(r#"node_id = "a,b""#);
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn inverted_amount_range_is_rejected() {
        let toml = "[trade]\nmin_amount = 5.0\nmax_amount = 1.0\n";
        assert!(NodeConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn separator_in_trade_fields_is_rejected() {
        for toml in [
            "[trade]\nreceiver = \"node,B\"",
            "[trade]\nunit = \"k;Wh\"",
            "[trade]\ncurrency = \"[USD]\"",
        ] {
            let err = NodeConfig::from_toml_str(toml).unwrap_err();
            assert!(matches!(err, NodeError::Config(_)), "{toml}: {err}");
        }
        // Spaces are fine inside a ledger field.
        assert!(NodeConfig::from_toml_str("[trade]\nreceiver = \"node B\"").is_ok());
    }

    #[test]
    fn radio_destination_with_space_is_rejected() {
        assert!(NodeConfig::from_toml_str("[radio]\ndestination = \"node B\"").is_err());
    }

    #[test]
    fn amount_range_wider_than_f64_is_rejected() {
        let toml = "[trade]\nmin_amount = -1e308\nmax_amount = 1e308";
        let err = NodeConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("too wide"), "{err}");
        assert!(NodeConfig::from_toml_str("[trade]\nmin_amount = 0.0\nmax_amount = 1e308").is_ok());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/volt.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
