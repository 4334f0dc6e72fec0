//! In-memory implementation of the PayloadStore trait.
//!
//! Primarily for tests. Records are kept as serialized JSON so that every
//! load exercises the same encode/decode path a real backend would.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use locker_core::{ProtectedRecord, WorkspaceId};

use crate::error::{Result, StoreError};
use crate::traits::{PayloadStore, SaveResult};

/// In-memory store. All data is lost when the store is dropped.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<WorkspaceId, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Raw stored JSON for a workspace, as a backend would see it.
    pub fn raw(&self, workspace: &WorkspaceId) -> Result<Option<String>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(workspace).cloned())
    }

    /// Overwrite the stored JSON directly, bypassing validation.
    pub fn put_raw(&self, workspace: &WorkspaceId, json: impl Into<String>) -> Result<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(workspace.clone(), json.into());
        Ok(())
    }
}

#[async_trait]
impl PayloadStore for MemoryStore {
    async fn load(&self, workspace: &WorkspaceId) -> Result<Option<ProtectedRecord>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        match records.get(workspace) {
            Some(json) => Ok(Some(ProtectedRecord::from_json(json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, workspace: &WorkspaceId, record: &ProtectedRecord) -> Result<SaveResult> {
        let json = record.to_json()?;
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;

        let result = match records.insert(workspace.clone(), json) {
            Some(_) => SaveResult::Replaced,
            None => SaveResult::Created,
        };
        tracing::debug!(workspace = %workspace, ?result, "saved protected record");
        Ok(result)
    }

    async fn remove(&self, workspace: &WorkspaceId) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(records.remove(workspace).is_some())
    }

    async fn contains(&self, workspace: &WorkspaceId) -> Result<bool> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.contains_key(workspace))
    }
}
