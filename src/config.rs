use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::domain::{Balance, TokenFormat};
use crate::staking::AmountRules;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub staking: StakingConfig,
    #[serde(default)]
    pub claim: ClaimConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Name presented to the wallet extension
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Node websocket endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
}

fn default_app_name() -> String {
    "InvArch Tinkernet Staking".to_string()
}

fn default_rpc_url() -> String {
    "wss://tinkernet-rpc.dwellir.com".to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            rpc_url: default_rpc_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Existential deposit in planck
    #[serde(default = "default_existential_deposit")]
    pub existential_deposit: Balance,
}

fn default_symbol() -> String {
    "VARCH".to_string()
}

fn default_decimals() -> u32 {
    12
}

fn default_existential_deposit() -> Balance {
    Balance(1_000_000_000)
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimals: default_decimals(),
            existential_deposit: default_existential_deposit(),
        }
    }
}

impl TokenConfig {
    pub fn format(&self) -> TokenFormat {
        TokenFormat {
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakingConfig {
    /// Minimum stake/unstake amount in whole tokens
    #[serde(default = "default_min_stake")]
    pub min_stake: Decimal,
}

fn default_min_stake() -> Decimal {
    Decimal::from(50)
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            min_stake: default_min_stake(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClaimConfig {
    /// Restake claimed rewards unless overridden on the command line
    #[serde(default)]
    pub auto_restake: bool,
    /// Dry-run fee model: flat part, in planck
    #[serde(default)]
    pub simulated_base_fee: Balance,
    /// Dry-run fee model: per-call part, in planck
    #[serde(default)]
    pub simulated_fee_per_call: Balance,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("claim.auto_restake", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("OCIF_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (OCIF__CHAIN__RPC_URL, etc.)
            .add_source(
                Environment::with_prefix("OCIF")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn amount_rules(&self) -> AmountRules {
        AmountRules {
            min_amount: self.staking.min_stake,
            decimals: self.token.decimals,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            token: TokenConfig::default(),
            staking: StakingConfig::default(),
            claim: ClaimConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
