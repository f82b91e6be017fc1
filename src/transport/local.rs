//! In-process transport.

use super::traits::{Transport, TransportResult};
use crate::account::Account;
use crate::platform::{unix_now, Command, Platform, Receipt};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shares one `Platform` between tasks. Submissions hold the lock for the
/// whole command, so commands commit in lock-acquisition order.
#[derive(Clone)]
pub struct LocalTransport {
    platform: Arc<Mutex<Platform>>,
}

impl LocalTransport {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform: Arc::new(Mutex::new(platform)),
        }
    }

    /// Copy of the current state, for queries.
    pub async fn snapshot(&self) -> Platform {
        self.platform.lock().await.clone()
    }

    /// Take the state back once all clones are done submitting.
    pub async fn into_inner(self) -> Platform {
        match Arc::try_unwrap(self.platform) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().await.clone(),
        }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn submit(&self, caller: &Account, command: Command) -> TransportResult<Receipt> {
        let mut platform = self.platform.lock().await;
        Ok(platform.execute(caller, command, unix_now())?)
    }
}
