//! Common types for ledger interactions.

use serde::{Deserialize, Serialize};

/// Opaque transaction signature returned by a confirmed ledger write.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxSignature(pub String);

impl TxSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One progression event to be recorded on the ledger.
///
/// Exactly one variant per service operation; the receipt echoes the intent
/// back so callers can correlate results without extra bookkeeping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TxIntent {
    UpdateProfile {
        wallet: String,
        level: u32,
        experience: u64,
        reputation: i64,
    },
    CreateUser {
        wallet: String,
        name: String,
    },
    CreateProfile {
        wallet: String,
    },
    CreateMission {
        title: String,
        description: String,
        mission_type: String,
        reward_experience: u64,
    },
    StartMission {
        wallet: String,
        mission_id: String,
    },
    SyncProfile {
        wallet: String,
    },
}

impl TxIntent {
    /// Short tag used for history records and logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpdateProfile { .. } => "update_profile",
            Self::CreateUser { .. } => "create_user",
            Self::CreateProfile { .. } => "create_profile",
            Self::CreateMission { .. } => "create_mission",
            Self::StartMission { .. } => "start_mission",
            Self::SyncProfile { .. } => "sync_profile",
        }
    }
}

/// Why an operation fell back to local persistence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegradedReason {
    /// No remote transport/wallet is configured at all.
    NoRemote,
    /// The wallet lacks the balance to pay for the write.
    InsufficientFunds,
    /// The user declined to authorize the transaction.
    Cancelled,
    /// Transport or timeout failure reaching the remote.
    Unreachable,
}

impl DegradedReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoRemote => "no-remote",
            Self::InsufficientFunds => "insufficient-funds",
            Self::Cancelled => "cancelled",
            Self::Unreachable => "unreachable",
        }
    }
}

/// Outcome of a ledger write, uniform across the real and fallback paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxStatus {
    /// The write landed on the ledger and carries a real signature.
    Confirmed { signature: TxSignature },
    /// The write was served by the local fallback.
    Degraded { reason: DegradedReason },
}

impl TxStatus {
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    pub fn signature(&self) -> Option<&TxSignature> {
        match self {
            Self::Confirmed { signature } => Some(signature),
            Self::Degraded { .. } => None,
        }
    }

    /// Status label used in persisted history entries.
    pub fn label(&self) -> String {
        match self {
            Self::Confirmed { .. } => "confirmed".to_string(),
            Self::Degraded { reason } => format!("degraded:{}", reason.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_distinguish_degraded_reasons() {
        let confirmed = TxStatus::Confirmed {
            signature: TxSignature("sig".into()),
        };
        assert_eq!(confirmed.label(), "confirmed");

        let degraded = TxStatus::Degraded {
            reason: DegradedReason::InsufficientFunds,
        };
        assert_eq!(degraded.label(), "degraded:insufficient-funds");
        assert!(!degraded.is_confirmed());
    }

    #[test]
    fn intent_serializes_with_kind_tag() {
        let intent = TxIntent::StartMission {
            wallet: "w".into(),
            mission_id: "m".into(),
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["kind"], "start_mission");
        assert_eq!(intent.kind(), "start_mission");
    }
}
