//! Deployment record.
//!
//! Written once by `init` to `<data dir>/deployments/<network>.json` and read
//! back by `status`. The layout is plain JSON so other tooling can pick up the
//! component addresses.

use crate::account::Account;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::info;

/// Component name of the token ledger.
pub const TOKEN_COMPONENT: &str = "OSSToken";

/// Component name of the contribution registry.
pub const REWARDS_COMPONENT: &str = "OSSRewards";

/// Deterministic account of a named component.
pub fn component_account(name: &str) -> Account {
    Account::from_identity(name)
}

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("deployment record already exists at '{0}'")]
    AlreadyExists(PathBuf),

    #[error("no deployment record at '{0}'")]
    NotFound(PathBuf),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid deployment record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Address of one deployed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub address: Account,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub network: String,
    pub chain_id: u64,
    pub deployer: Account,
    /// RFC 3339, UTC.
    pub timestamp: String,
    /// Crate version that performed the deployment.
    pub version: String,
    pub components: BTreeMap<String, ComponentRecord>,
}

impl DeploymentRecord {
    pub fn new(
        network: &str,
        chain_id: u64,
        deployer: Account,
        token: Account,
        rewards: Account,
        at: SystemTime,
    ) -> Self {
        let mut components = BTreeMap::new();
        components.insert(TOKEN_COMPONENT.to_string(), ComponentRecord { address: token });
        components.insert(REWARDS_COMPONENT.to_string(), ComponentRecord { address: rewards });

        Self {
            network: network.to_string(),
            chain_id,
            deployer,
            timestamp: humantime::format_rfc3339_seconds(at).to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            components,
        }
    }

    pub fn component(&self, name: &str) -> Option<Account> {
        self.components.get(name).map(|c| c.address)
    }

    /// `<dir>/deployments/<network>.json`
    pub fn path_for(dir: &Path, network: &str) -> PathBuf {
        dir.join("deployments").join(format!("{}.json", network))
    }

    /// Write the record. Refuses to replace an existing one.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, DeploymentError> {
        let path = Self::path_for(dir, &self.network);
        if path.exists() {
            return Err(DeploymentError::AlreadyExists(path));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DeploymentError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| DeploymentError::Io {
            path: path.clone(),
            source,
        })?;

        info!(network = %self.network, path = %path.display(), "deployment record written");
        Ok(path)
    }

    pub fn load(dir: &Path, network: &str) -> Result<Self, DeploymentError> {
        let path = Self::path_for(dir, network);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DeploymentError::NotFound(path))
            }
            Err(source) => return Err(DeploymentError::Io { path, source }),
        };
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn record() -> DeploymentRecord {
        DeploymentRecord::new(
            "localhost",
            31337,
            Account::from_identity("deployer"),
            component_account(TOKEN_COMPONENT),
            component_account(REWARDS_COMPONENT),
            UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        )
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        assert_eq!(record().timestamp, "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = record().save(temp_dir.path()).unwrap();
        assert_eq!(path, temp_dir.path().join("deployments").join("localhost.json"));

        let loaded = DeploymentRecord::load(temp_dir.path(), "localhost").unwrap();
        assert_eq!(loaded, record());
        assert_eq!(
            loaded.component(REWARDS_COMPONENT),
            Some(component_account(REWARDS_COMPONENT))
        );
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        record().save(temp_dir.path()).unwrap();
        assert!(matches!(
            record().save(temp_dir.path()),
            Err(DeploymentError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_load_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            DeploymentRecord::load(temp_dir.path(), "sepolia"),
            Err(DeploymentError::NotFound(_))
        ));
    }

    #[test]
    fn test_json_layout() {
        let json: serde_json::Value = serde_json::to_value(record()).unwrap();
        assert_eq!(json["network"], "localhost");
        assert_eq!(json["chain_id"], 31337);
        assert!(json["components"]["OSSToken"]["address"]
            .as_str()
            .unwrap()
            .starts_with("0x"));
    }
}
