//! OSS Rewards configuration file handling
//!
//! Provides default configuration generation and loading for the operator CLI.
//! Configuration files are TOML and, by default, live next to the platform
//! state under the user's data directory.
//!
//! ## Operator vs Governance Configuration
//!
//! `[token]`, `[voting]` and `[rewards]` seed the platform at `init`. After
//! that the live voting and reward policies belong to the platform state and
//! only change through an owner `update_policy` command; editing this file
//! does not touch an initialized platform.

use oss_rewards::config::{PlatformConfig, TokenConfig};
use oss_rewards::registry::{RewardPolicy, VotingPolicy};
use oss_rewards::transport::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// File name of the platform snapshot inside the data directory
const STATE_FILE: &str = "state.cbor";

/// OSS Rewards operator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OssConfig {
    /// Where platform state and deployment records live
    #[serde(default)]
    pub state: StateConfig,

    /// Network identification for deployment records
    #[serde(default)]
    pub network: NetworkConfig,

    /// Token parameters used at genesis
    #[serde(default)]
    pub token: TokenConfig,

    /// Initial voting policy
    #[serde(default)]
    pub voting: VotingPolicy,

    /// Initial reward policy
    #[serde(default)]
    pub rewards: RewardPolicy,

    /// Submission retry for transient transport failures
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// State storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Data directory; relative paths are resolved against the config file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_network_name")]
    pub name: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_network_name() -> String {
    "localhost".to_string()
}

fn default_chain_id() -> u64 {
    31337
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network_name(),
            chain_id: default_chain_id(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for OssConfig {
    fn default() -> Self {
        Self {
            state: StateConfig::default(),
            network: NetworkConfig::default(),
            token: TokenConfig::default(),
            voting: VotingPolicy::default(),
            rewards: RewardPolicy::default(),
            retry: RetryPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl OssConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: OssConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load the file if present, otherwise defaults
    pub fn load_or_default(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    #[allow(dead_code)]
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, contents)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// Genesis parameters for a new platform
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            token: self.token.clone(),
            voting: self.voting,
            rewards: self.rewards,
        }
    }

    /// Data directory, resolved against the config file location
    pub fn data_dir(&self, config_path: &Path) -> PathBuf {
        if self.state.data_dir.is_absolute() {
            self.state.data_dir.clone()
        } else {
            config_dir(config_path).join(&self.state.data_dir)
        }
    }

    /// Platform snapshot location
    pub fn state_path(&self, config_path: &Path) -> PathBuf {
        self.data_dir(config_path).join(STATE_FILE)
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        r#"# OSS Rewards Configuration (Operator Settings)
#
# [token], [voting] and [rewards] seed the platform at `init` only.
# Afterwards the live policies are part of the platform state and change
# through `update_policy`, signed by the token owner.

[state]
# Data directory for state.cbor and deployments/ (relative to this file)
data_dir = "."

[network]
name = "localhost"
chain_id = 31337

[token]
name = "Open Source Rewards"
symbol = "OSS"
decimals = 18
# Whole tokens
initial_supply = 10000000
max_supply = 100000000

[voting]
# Votes required before a contribution is finalized
quorum = 3
# Approval share of votes cast, in basis points (5000 = 50%); ties reject
approval_threshold_bps = 5000

[rewards]
# Extra reward proportional to the approval margin, in basis points
margin_bonus_bps = 0

[rewards.base]
# Whole tokens per approved contribution
bug_fix = 200
feature = 300
security = 500
documentation = 275
performance = 350
research = 400

[retry]
max_attempts = 10
delay = "10s"

[logging]
# Log level: trace, debug, info, warn, error (RUST_LOG overrides)
level = "info"
"#
        .to_string()
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
            }
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Get the default config file path
///
/// - Linux: ~/.local/share/oss-rewards/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("oss-rewards")
        .join("config.toml")
}

/// Resolve `--config`, falling back to the default location
pub fn resolve_config_path(config: Option<&str>) -> PathBuf {
    config.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Log level to use before any command runs
pub fn log_level(config_path: &Path) -> String {
    OssConfig::load_or_default(config_path)
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| default_log_level())
}
