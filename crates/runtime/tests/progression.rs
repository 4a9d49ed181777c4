//! Progression service behavior on the confirmed and degraded paths.

use std::sync::Arc;

use ledger_core::{FailureMode, MockLedgerClient};
use quest_runtime::{MemoryStorage, MissionSpec, ProfilePatch, ProgressionService, StorageAdapter};

const WALLET: &str = "wallet_abc123";

fn local_service() -> ProgressionService {
    ProgressionService::new(Arc::new(MemoryStorage::new()))
}

fn ledger_service(mode: FailureMode) -> ProgressionService {
    let storage: Arc<dyn StorageAdapter> = Arc::new(MemoryStorage::new());
    ProgressionService::with_transport(storage, Arc::new(MockLedgerClient::with_failure(mode)))
}

fn patch(level: u32) -> ProfilePatch {
    ProfilePatch {
        level,
        experience: 40,
        reputation: 2,
    }
}

fn spec() -> MissionSpec {
    MissionSpec {
        title: "Craft Burning Blade".into(),
        description: "Successfully crafted Burning Blade".into(),
        mission_type: "crafting".into(),
        reward_experience: 0,
    }
}

#[tokio::test]
async fn degraded_update_still_mirrors_locally() {
    let service = local_service();

    let outcome = service.update_player(WALLET, patch(3)).await;
    assert_eq!(outcome.status.label(), "degraded:no-remote");
    assert!(outcome.id.starts_with("local_tx_"));

    let mirror = service.get_player(WALLET).await.unwrap();
    assert_eq!(mirror.level, 3);
    assert_eq!(mirror.reputation, 2);
    assert_eq!(mirror.last_signature, None);
}

#[tokio::test]
async fn confirmed_update_records_signature() {
    let service = ledger_service(FailureMode::None);

    let outcome = service.update_player(WALLET, patch(4)).await;
    assert!(outcome.status.is_confirmed());
    assert!(outcome.id.starts_with("mock_sig_"));

    let mirror = service.get_player(WALLET).await.unwrap();
    assert!(mirror.last_signature.unwrap().starts_with("mock_sig_"));
}

#[tokio::test]
async fn transport_failures_degrade_with_reason() {
    let cases = [
        (FailureMode::InsufficientFunds, "degraded:insufficient-funds"),
        (FailureMode::Cancelled, "degraded:cancelled"),
        (FailureMode::Unreachable, "degraded:unreachable"),
    ];

    for (mode, expected) in cases {
        let service = ledger_service(mode);
        let outcome = service.update_player(WALLET, patch(2)).await;
        assert_eq!(outcome.status.label(), expected);
        // The mirror update happens regardless of the remote outcome.
        assert_eq!(service.get_player(WALLET).await.unwrap().level, 2);
    }
}

#[tokio::test]
async fn history_is_capped_and_newest_first() {
    let service = local_service().history_capacity(3);

    for level in 1..=5 {
        service.update_player(WALLET, patch(level)).await;
    }

    let history = service.history(WALLET).await;
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].kind, "update_profile");
    assert_eq!(history[0].payload["level"], 5);
    assert_eq!(history[2].payload["level"], 3);
}

#[tokio::test]
async fn mission_ids_distinguish_confirmed_from_local() {
    let confirmed = ledger_service(FailureMode::None)
        .create_mission(WALLET, spec())
        .await;
    assert!(confirmed.id.starts_with("mission_mock_sig_"));

    let degraded = local_service().create_mission(WALLET, spec()).await;
    assert!(degraded.id.starts_with("local_mission_"));
    assert_eq!(degraded.title, "Craft Burning Blade");
    assert!(!degraded.completed);
}

#[tokio::test]
async fn create_user_profile_collects_confirmed_signatures() {
    let service = ledger_service(FailureMode::None);
    let profile = service.create_user_profile(WALLET).await;
    assert_eq!(profile.user_address, format!("user_{WALLET}"));
    assert_eq!(profile.profile_address, format!("profile_{WALLET}"));
    assert_eq!(profile.signatures.len(), 2);

    // The degraded path produces the same shape, just without signatures.
    let local = local_service().create_user_profile(WALLET).await;
    assert!(local.signatures.is_empty());
}

#[tokio::test]
async fn profile_creation_handles_multibyte_wallets() {
    let service = local_service();
    let wallet = "🔥🔥abcd";

    let profile = service.create_user_profile(wallet).await;
    assert_eq!(profile.user_address, format!("user_{wallet}"));
    assert_eq!(profile.profile_address, format!("profile_{wallet}"));
    assert!(service.get_player(wallet).await.is_some());
}

#[tokio::test]
async fn sync_requires_an_existing_mirror() {
    let service = local_service();
    assert!(service.sync_player_data(WALLET).await.is_none());

    service.create_user_profile(WALLET).await;
    service.create_mission(WALLET, spec()).await;

    let snapshot = service.sync_player_data(WALLET).await.unwrap();
    assert_eq!(snapshot.player_id, format!("profile_{WALLET}"));
    assert_eq!(snapshot.missions.len(), 1);
    assert_eq!(snapshot.missions[0].title, "Craft Burning Blade");
}

#[tokio::test]
async fn start_mission_is_recorded_in_history() {
    let service = ledger_service(FailureMode::None);
    let outcome = service.start_mission(WALLET, "mission_1").await;
    assert!(outcome.status.is_confirmed());

    let history = service.history(WALLET).await;
    assert_eq!(history[0].kind, "start_mission");
    assert_eq!(history[0].status, "confirmed");
}
