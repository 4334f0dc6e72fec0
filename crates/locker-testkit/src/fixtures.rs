//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use locker_core::{
    derive_with_params, DerivedKey, EncryptedPayload, Iterations, KdfParams, Password,
    ProtectedRecord, WorkspaceId,
};
use locker_store::MemoryStore;

/// Iteration count used by fixtures. Real sessions use the default.
pub const FAST_ITERATIONS: u32 = 1_000;

/// A workspace with a known password and cheap derivation parameters.
#[derive(Debug, Clone)]
pub struct TestWorkspace {
    pub workspace: WorkspaceId,
    pub password: Password,
    pub kdf: KdfParams,
}

impl TestWorkspace {
    /// The `hunter2` / `ws-123` fixture used throughout the test suite.
    pub fn new() -> Self {
        Self::named("ws-123", "hunter2")
    }

    /// Create a fixture for an arbitrary workspace and password.
    pub fn named(workspace: &str, password: &str) -> Self {
        Self {
            workspace: WorkspaceId::new(workspace).expect("fixture workspace id"),
            password: Password::new(password).expect("fixture password"),
            kdf: KdfParams::with_iterations(fast_iterations()),
        }
    }

    /// Derive this fixture's key.
    pub fn key(&self) -> DerivedKey {
        derive_with_params(&self.password, &self.workspace, &self.kdf, true)
            .expect("fixture key derivation")
    }

    /// Encrypt `plaintext` under this fixture's key.
    pub fn seal(&self, plaintext: &str) -> EncryptedPayload {
        EncryptedPayload::seal(&self.key(), plaintext).expect("fixture encryption")
    }

    /// A record holding `plaintext`, tagged with this fixture's parameters.
    pub fn record(&self, plaintext: &str) -> ProtectedRecord {
        ProtectedRecord::new(self.seal(plaintext), self.kdf)
    }

    /// A memory store already holding a record for this workspace.
    pub fn seeded_store(&self, plaintext: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let json = self.record(plaintext).to_json().expect("fixture record json");
        store
            .put_raw(&self.workspace, json)
            .expect("fresh store is not poisoned");
        store
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixtures for several workspaces sharing one password.
pub fn multi_workspace_fixtures(count: usize) -> Vec<TestWorkspace> {
    (0..count)
        .map(|i| TestWorkspace::named(&format!("ws-{}", i), "hunter2"))
        .collect()
}

fn fast_iterations() -> Iterations {
    Iterations::new(FAST_ITERATIONS).expect("non-zero")
}
