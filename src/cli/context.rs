//! Shared plumbing for subcommands: config resolution, state loading,
//! command submission and persistence.

use super::config::{resolve_config_path, OssConfig};
use oss_rewards::account::{self, Account};
use oss_rewards::platform::{Command, Platform, Receipt};
use oss_rewards::store::{is_lock_contended, SnapshotStore};
use oss_rewards::token::{format_amount, parse_amount, Amount};
use oss_rewards::transport::{submit_with_retry, LocalTransport};
use std::path::PathBuf;

pub struct Context {
    pub config_path: PathBuf,
    pub config: OssConfig,
    pub store: SnapshotStore,
}

impl Context {
    pub fn load(config: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = resolve_config_path(config);
        let config = OssConfig::load_or_default(&config_path)?;
        let store = SnapshotStore::new(config.state_path(&config_path));
        Ok(Self {
            config_path,
            config,
            store,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir(&self.config_path)
    }

    pub fn platform(&self) -> Result<Platform, Box<dyn std::error::Error>> {
        Ok(self.store.load()?)
    }

    /// Build a command against the current state, submit it as `identity`
    /// and persist the result. The state lock is held from load to save.
    pub async fn submit<F>(
        &self,
        identity: &str,
        build: F,
    ) -> Result<(Receipt, Platform), Box<dyn std::error::Error>>
    where
        F: FnOnce(&Platform) -> Result<Command, Box<dyn std::error::Error>>,
    {
        let caller = account::resolve(identity);
        let _lock = self
            .config
            .retry
            .run(|| async { self.store.lock() }, is_lock_contended)
            .await?;

        let platform = self.platform()?;
        let loaded_sequence = platform.sequence();
        let command = build(&platform)?;
        let transport = LocalTransport::new(platform);

        let receipt = submit_with_retry(&transport, &self.config.retry, &caller, command).await?;

        let platform = transport.into_inner().await;
        self.store.commit(&platform, loaded_sequence)?;

        println!("✅ Committed #{} (tx {})", receipt.sequence, receipt.tx_id);
        Ok((receipt, platform))
    }
}

pub fn parse_account(input: &str) -> Account {
    account::resolve(input)
}

pub fn parse_tokens(platform: &Platform, input: &str) -> Result<Amount, Box<dyn std::error::Error>> {
    Ok(parse_amount(input, platform.ledger().decimals())?)
}

pub fn display_tokens(platform: &Platform, amount: Amount) -> String {
    let ledger = platform.ledger();
    format!("{} {}", format_amount(amount, ledger.decimals()), ledger.symbol())
}
