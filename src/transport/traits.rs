//! Transport trait abstraction.

use crate::account::Account;
use crate::error::LedgerError;
use crate::platform::{Command, Receipt};
use async_trait::async_trait;

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The platform evaluated the command and refused it.
    #[error("command rejected: {0}")]
    Rejected(#[from] LedgerError),

    /// The platform could not be reached; the command was not applied.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Submits commands to a platform on behalf of a caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, caller: &Account, command: Command) -> TransportResult<Receipt>;
}
