//! Store trait: the abstract interface for protected record persistence.
//!
//! The locker never persists anything itself. Whoever owns the workspace
//! document implements this trait; the locker hands it opaque records.

use async_trait::async_trait;
use locker_core::{ProtectedRecord, WorkspaceId};

use crate::error::Result;

/// Result of saving a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// No record existed for the workspace.
    Created,
    /// An existing record was replaced wholesale.
    Replaced,
}

/// Async interface for storing one protected record per workspace.
///
/// Records are opaque: implementations must store and return them
/// unchanged and must never attempt to interpret the ciphertext.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Load the record for a workspace, if one exists.
    async fn load(&self, workspace: &WorkspaceId) -> Result<Option<ProtectedRecord>>;

    /// Save a record, replacing any previous one.
    async fn save(&self, workspace: &WorkspaceId, record: &ProtectedRecord) -> Result<SaveResult>;

    /// Remove the record for a workspace. Returns true if one existed.
    async fn remove(&self, workspace: &WorkspaceId) -> Result<bool>;

    /// Check whether a record exists.
    ///
    /// The default loads the record; backends should override it with a
    /// plain key lookup so a corrupt record still counts as present.
    async fn contains(&self, workspace: &WorkspaceId) -> Result<bool> {
        Ok(self.load(workspace).await?.is_some())
    }
}
