//! Ledger transport and wallet traits.

use async_trait::async_trait;

use crate::types::{DegradedReason, TxIntent, TxSignature};

/// Transport layer errors.
///
/// Every variant maps onto a [`DegradedReason`]; the progression layer never
/// surfaces these to the caller, it classifies and falls back.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("user cancelled the transaction")]
    Cancelled,

    #[error("network error: {0}")]
    Network(String),

    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TransportError {
    /// Classifies this failure for the fallback path.
    pub const fn classify(&self) -> DegradedReason {
        match self {
            Self::InsufficientFunds { .. } => DegradedReason::InsufficientFunds,
            Self::Cancelled => DegradedReason::Cancelled,
            Self::Network(_) | Self::TransactionFailed(_) | Self::Config(_) => {
                DegradedReason::Unreachable
            }
        }
    }
}

/// Identity provider: supplies a stable address and an opaque signing
/// capability. The core never inspects cryptographic details.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Stable wallet address for the connected identity.
    fn address(&self) -> &str;

    /// Sign the intent and submit it to the ledger.
    async fn sign_and_submit(&self, intent: &TxIntent) -> Result<TxSignature, TransportError>;
}

/// Stateless request/response interface to the external ledger service.
///
/// Implementations never guarantee success; callers classify failures via
/// [`TransportError::classify`] and degrade. No retries happen at this layer.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Submit one progression intent to the ledger.
    async fn submit(&self, intent: TxIntent) -> Result<TxSignature, TransportError>;

    /// Health check: verify the remote is reachable.
    async fn health_check(&self) -> Result<(), TransportError>;

    /// Network label (e.g. "mainnet", "devnet", "mock").
    fn network(&self) -> &str;
}
