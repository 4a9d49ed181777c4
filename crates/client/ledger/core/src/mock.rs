//! Mock ledger client for testing and offline play.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::traits::{LedgerTransport, TransportError, WalletProvider};
use crate::types::{TxIntent, TxSignature};

/// Failure the mock injects on the next submissions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Every submission confirms.
    #[default]
    None,
    InsufficientFunds,
    Cancelled,
    Unreachable,
}

/// In-memory ledger transport.
///
/// Confirms submissions with synthetic signatures and records every intent
/// it sees, so tests can assert on the exact traffic. A [`FailureMode`] can
/// be switched on to exercise each degraded path.
pub struct MockLedgerClient {
    mode: Mutex<FailureMode>,
    counter: AtomicU64,
    submitted: Mutex<Vec<TxIntent>>,
}

impl MockLedgerClient {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(FailureMode::None),
            counter: AtomicU64::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_failure(mode: FailureMode) -> Self {
        let client = Self::new();
        client.set_failure(mode);
        client
    }

    /// Switches the failure injected on subsequent submissions.
    pub fn set_failure(&self, mode: FailureMode) {
        *self.mode.lock().unwrap() = mode;
    }

    /// Intents that reached the transport, in submission order.
    pub fn submitted(&self) -> Vec<TxIntent> {
        self.submitted.lock().unwrap().clone()
    }

    fn next_signature(&self) -> TxSignature {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        TxSignature(format!("mock_sig_{n:08}"))
    }
}

impl Default for MockLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The mock doubles as its own wallet: signing is a no-op and submission
/// goes straight to the transport path.
#[async_trait]
impl WalletProvider for MockLedgerClient {
    fn address(&self) -> &str {
        "mock_wallet"
    }

    async fn sign_and_submit(&self, intent: &TxIntent) -> Result<TxSignature, TransportError> {
        self.submit(intent.clone()).await
    }
}

#[async_trait]
impl LedgerTransport for MockLedgerClient {
    async fn submit(&self, intent: TxIntent) -> Result<TxSignature, TransportError> {
        tracing::debug!(kind = intent.kind(), "mock ledger received intent");
        self.submitted.lock().unwrap().push(intent);

        match *self.mode.lock().unwrap() {
            FailureMode::None => Ok(self.next_signature()),
            FailureMode::InsufficientFunds => Err(TransportError::InsufficientFunds {
                required: 5000,
                available: 0,
            }),
            FailureMode::Cancelled => Err(TransportError::Cancelled),
            FailureMode::Unreachable => {
                Err(TransportError::Network("mock transport offline".into()))
            }
        }
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        match *self.mode.lock().unwrap() {
            FailureMode::Unreachable => {
                Err(TransportError::Network("mock transport offline".into()))
            }
            _ => Ok(()),
        }
    }

    fn network(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DegradedReason;

    #[tokio::test]
    async fn confirms_and_records_intents() {
        let client = MockLedgerClient::new();

        let sig = client
            .submit(TxIntent::CreateProfile { wallet: "w".into() })
            .await
            .unwrap();
        assert!(sig.as_str().starts_with("mock_sig_"));

        let submitted = client.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].kind(), "create_profile");
    }

    #[tokio::test]
    async fn signatures_are_unique_and_ordered() {
        let client = MockLedgerClient::new();
        let a = client
            .submit(TxIntent::SyncProfile { wallet: "w".into() })
            .await
            .unwrap();
        let b = client
            .submit(TxIntent::SyncProfile { wallet: "w".into() })
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn failure_modes_classify_as_expected() {
        let cases = [
            (FailureMode::InsufficientFunds, DegradedReason::InsufficientFunds),
            (FailureMode::Cancelled, DegradedReason::Cancelled),
            (FailureMode::Unreachable, DegradedReason::Unreachable),
        ];

        for (mode, expected) in cases {
            let client = MockLedgerClient::with_failure(mode);
            let err = client
                .submit(TxIntent::SyncProfile { wallet: "w".into() })
                .await
                .unwrap_err();
            assert_eq!(err.classify(), expected);
        }
    }

    #[tokio::test]
    async fn wallet_path_reaches_the_transport() {
        let client = MockLedgerClient::new();
        assert_eq!(client.address(), "mock_wallet");

        let sig = client
            .sign_and_submit(&TxIntent::CreateProfile { wallet: "w".into() })
            .await
            .unwrap();
        assert!(sig.as_str().starts_with("mock_sig_"));
        assert_eq!(client.submitted().len(), 1);
    }

    #[tokio::test]
    async fn health_check_fails_only_when_unreachable() {
        let client = MockLedgerClient::new();
        assert!(client.health_check().await.is_ok());

        client.set_failure(FailureMode::Unreachable);
        assert!(client.health_check().await.is_err());
    }
}
