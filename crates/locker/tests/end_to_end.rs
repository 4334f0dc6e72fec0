//! End-to-end behavior of the locker against a shared store.

use std::sync::Arc;

use proptest::prelude::*;

use locker::store::{MemoryStore, PayloadStore};
use locker::{
    EncryptedPayload, Iterations, Locker, LockerConfig, LockerError, Password, ProtectedRecord,
    SessionKeyManager, SessionStatus, WorkspaceId,
};
use locker_testkit::{ScenarioParams, TestWorkspace, FAST_ITERATIONS};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn fast_config() -> LockerConfig {
    LockerConfig::default().with_iterations(Iterations::new(FAST_ITERATIONS).unwrap())
}

#[tokio::test]
async fn test_protect_reopen_and_reject_wrong_password() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let workspace = WorkspaceId::new("ws-123").unwrap();

    let mut writer = Locker::new(workspace.clone(), Arc::clone(&store), LockerConfig::default());
    assert_eq!(writer.open("hunter2").await.unwrap(), "");
    writer.write("secret note").await.unwrap();
    writer.close();
    assert_eq!(writer.status(), SessionStatus::Locked);
    assert!(writer.plaintext().is_none());

    let mut reader = Locker::new(workspace.clone(), Arc::clone(&store), LockerConfig::default());
    assert_eq!(reader.open("hunter2").await.unwrap(), "secret note");
    reader.close();

    let mut intruder = Locker::new(workspace, Arc::clone(&store), LockerConfig::default());
    let err = intruder.open("wrong").await.unwrap_err();
    assert!(err.is_authentication_failure());
    assert_eq!(intruder.status(), SessionStatus::Locked);
    assert!(intruder.plaintext().is_none());

    // A failed unlock never replaces the existing record.
    let mut again = Locker::new(
        WorkspaceId::new("ws-123").unwrap(),
        Arc::clone(&store),
        LockerConfig::default(),
    );
    assert_eq!(again.open("hunter2").await.unwrap(), "secret note");
}

#[tokio::test]
async fn test_seeded_record_opens_with_its_own_params() {
    init_tracing();
    let fixture = TestWorkspace::new();
    let store = Arc::new(fixture.seeded_store("seeded note"));

    // The configured default is expensive; the record says otherwise.
    let mut locker = Locker::new(fixture.workspace.clone(), store, LockerConfig::default());
    assert_eq!(locker.open("hunter2").await.unwrap(), "seeded note");
    assert_eq!(locker.session().kdf_params(), Some(&fixture.kdf));
}

#[tokio::test]
async fn test_workspaces_are_isolated() {
    let store = Arc::new(MemoryStore::new());

    let mut a = Locker::new(WorkspaceId::new("ws-A").unwrap(), Arc::clone(&store), fast_config());
    a.open("hunter2").await.unwrap();
    a.write("only in A").await.unwrap();

    let mut b = Locker::new(WorkspaceId::new("ws-B").unwrap(), Arc::clone(&store), fast_config());
    assert_eq!(b.open("hunter2").await.unwrap(), "");
    b.write("only in B").await.unwrap();

    // A's payload moved under B's workspace does not open with the same password.
    let a_record = store.load(a.workspace()).await.unwrap().unwrap();
    store.save(b.workspace(), &a_record).await.unwrap();
    b.close();
    let err = b.open("hunter2").await.unwrap_err();
    assert!(err.is_authentication_failure());
}

#[tokio::test]
async fn test_tampered_record_locks_on_refresh() {
    let fixture = TestWorkspace::new();
    let store = Arc::new(fixture.seeded_store("original"));

    let mut locker = Locker::new(fixture.workspace.clone(), Arc::clone(&store), fast_config());
    assert_eq!(locker.open("hunter2").await.unwrap(), "original");

    let other = TestWorkspace::named("ws-123", "someone-else");
    store.save(&fixture.workspace, &other.record("forged")).await.unwrap();

    let err = locker.refresh().await.unwrap_err();
    assert!(err.is_authentication_failure());
    assert_eq!(locker.status(), SessionStatus::Locked);
    assert!(locker.plaintext().is_none());
}

#[tokio::test]
async fn test_corrupt_record_is_a_store_error() {
    let fixture = TestWorkspace::new();
    let store = Arc::new(MemoryStore::new());
    store.put_raw(&fixture.workspace, "not json").unwrap();

    let mut locker = Locker::new(fixture.workspace.clone(), store, fast_config());
    let err = locker.open("hunter2").await.unwrap_err();
    assert!(matches!(err, LockerError::Store(_)));
    assert_eq!(locker.status(), SessionStatus::Locked);
}

#[tokio::test]
async fn test_damaged_payload_fails_like_wrong_password() {
    let fixture = TestWorkspace::new();
    let good = fixture.record("secret note");
    let damaged = ProtectedRecord::new(
        EncryptedPayload::new(good.payload().ciphertext(), &good.payload().iv()[..12]),
        *good.kdf(),
    );
    let store = Arc::new(MemoryStore::new());
    store.save(&fixture.workspace, &damaged).await.unwrap();

    for password in ["hunter2", "wrong"] {
        let mut locker = Locker::new(fixture.workspace.clone(), Arc::clone(&store), fast_config());
        let err = locker.open(password).await.unwrap_err();
        assert!(err.is_authentication_failure(), "{}: {}", password, err);
        assert_eq!(locker.status(), SessionStatus::Locked);
    }
}

#[tokio::test]
async fn test_reopen_after_close_requires_password_again() {
    let store = Arc::new(MemoryStore::new());
    let mut locker = Locker::new(WorkspaceId::new("ws-1").unwrap(), store, fast_config());

    locker.open("hunter2").await.unwrap();
    locker.write("v1").await.unwrap();
    locker.close();
    assert!(matches!(locker.write("v2").await, Err(LockerError::Locked)));

    assert!(locker.open("wrong").await.unwrap_err().is_authentication_failure());
    assert_eq!(locker.open("hunter2").await.unwrap(), "v1");
    assert!(matches!(
        locker.open("hunter2").await,
        Err(LockerError::AlreadyUnlocked)
    ));
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_session_round_trip(params: ScenarioParams) {
        let config = LockerConfig { kdf: params.kdf };
        let plaintext = params.plaintext.clone();

        let (opened, status_after_close) = runtime().block_on(async move {
            let mut writer = SessionKeyManager::new(config);
            writer.unlock(&params.password, &params.workspace, None).await.unwrap();
            let payload = writer.edit(params.plaintext).unwrap();
            writer.close();
            let status = writer.status();

            let mut reader = SessionKeyManager::new(config);
            let opened = reader
                .unlock(&params.password, &params.workspace, Some(&payload))
                .await
                .unwrap()
                .to_string();
            (opened, status)
        });

        prop_assert_eq!(opened, plaintext);
        prop_assert_eq!(status_after_close, SessionStatus::Locked);
    }

    #[test]
    fn prop_wrong_password_never_unlocks(params in any::<ScenarioParams>(), suffix in "[a-z]{1,8}") {
        let config = LockerConfig { kdf: params.kdf };
        let wrong = Password::new(format!("x{}", suffix)).unwrap();
        prop_assume!(wrong.as_bytes() != params.password.as_bytes());

        let (failed, status) = runtime().block_on(async move {
            let mut writer = SessionKeyManager::new(config);
            writer.unlock(&params.password, &params.workspace, None).await.unwrap();
            let payload = writer.edit(params.plaintext).unwrap();

            let mut reader = SessionKeyManager::new(config);
            let failed = reader
                .unlock(&wrong, &params.workspace, Some(&payload))
                .await
                .unwrap_err()
                .is_authentication_failure();
            (failed, reader.status())
        });

        prop_assert!(failed);
        prop_assert_eq!(status, SessionStatus::Locked);
    }
}
