//! Ledger abstraction layer for the quest client.
//!
//! This crate defines how the game talks to an external ledger-backed
//! progression service without committing to any concrete chain or wire
//! format.
//!
//! # Architecture
//!
//! ```text
//! ProgressionService (quest-runtime)
//!          │
//!          ▼
//! LedgerTransport ── submit(TxIntent) -> TxSignature | TransportError
//!          │
//!          ▼
//! WalletProvider ──── address() / sign_and_submit()
//! ```
//!
//! # Design Philosophy
//!
//! - **Intents are tagged unions**: one `TxIntent` variant per progression
//!   operation, so handling is compiler-checked end to end.
//! - **Failures are classified, not retried**: every [`TransportError`]
//!   maps to a [`DegradedReason`], and callers degrade to local persistence
//!   instead of retrying.
//! - **Uniform results**: [`TxStatus`] has the same shape whether the write
//!   was confirmed on-chain or served by the local fallback.

pub mod mock;
pub mod traits;
pub mod types;

pub use mock::{FailureMode, MockLedgerClient};
pub use traits::{LedgerTransport, TransportError, WalletProvider};
pub use types::{DegradedReason, TxIntent, TxSignature, TxStatus};
