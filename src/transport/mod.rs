//! Command transport.
//!
//! Callers reach the platform through a [`Transport`]. The in-process
//! [`LocalTransport`] serialises every submission behind one lock; remote
//! adapters report connectivity problems as [`TransportError::Unavailable`],
//! which [`RetryPolicy`] retries a bounded number of times. Ledger rejections
//! are never retried.

pub mod local;
pub mod retry;
pub mod traits;

pub use local::LocalTransport;
pub use retry::{is_transport_error_retryable, submit_with_retry, RetryPolicy};
pub use traits::{Transport, TransportError, TransportResult};
