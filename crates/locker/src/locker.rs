//! The Locker: a session bound to one workspace and a record store.
//!
//! The session never persists anything; this type is the glue that loads
//! the workspace's record before unlocking and saves a new one after every
//! edit. Each saved record carries the parameters its key was derived
//! under, so records outlive changes to the configured defaults.

use std::sync::Arc;

use locker_core::{Password, ProtectedRecord, WorkspaceId};
use locker_store::{PayloadStore, SaveResult};
use zeroize::Zeroizing;

use crate::config::LockerConfig;
use crate::error::{LockerError, Result};
use crate::session::{SessionKeyManager, SessionStatus};

/// A password-protected text slot for one workspace.
pub struct Locker<S: PayloadStore> {
    workspace: WorkspaceId,
    store: Arc<S>,
    session: SessionKeyManager,
}

impl<S: PayloadStore> Locker<S> {
    /// Create a locked locker over a shared store.
    pub fn new(workspace: WorkspaceId, store: Arc<S>, config: LockerConfig) -> Self {
        Self {
            workspace,
            store,
            session: SessionKeyManager::new(config),
        }
    }

    /// The workspace this locker is bound to.
    pub fn workspace(&self) -> &WorkspaceId {
        &self.workspace
    }

    /// The store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying session.
    pub fn session(&self) -> &SessionKeyManager {
        &self.session
    }

    /// Current session status.
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// The decrypted plaintext, while unlocked.
    pub fn plaintext(&self) -> Option<&str> {
        self.session.plaintext()
    }

    /// Whether a protected record exists for this workspace.
    pub async fn has_record(&self) -> Result<bool> {
        Ok(self.store.contains(&self.workspace).await?)
    }

    /// Unlock with a password.
    ///
    /// An empty password is rejected before anything is loaded or derived.
    /// If a record exists, the password must decrypt it; otherwise the
    /// locker opens empty and the first [`write`](Self::write) creates it.
    pub async fn open(&mut self, password: &str) -> Result<&str> {
        let password = Password::new(password)?;
        if self.session.is_unlocked() {
            return Err(LockerError::AlreadyUnlocked);
        }

        match self.store.load(&self.workspace).await? {
            Some(record) => {
                self.session
                    .unlock_with_params(
                        &password,
                        &self.workspace,
                        *record.kdf(),
                        Some(record.payload()),
                    )
                    .await
            }
            None => self.session.unlock(&password, &self.workspace, None).await,
        }
    }

    /// Replace the protected text and persist the new record.
    ///
    /// The held plaintext only changes once the store accepts the record; a
    /// failed save leaves the session showing what is actually persisted.
    pub async fn write(&mut self, plaintext: impl Into<String>) -> Result<SaveResult> {
        let plaintext = Zeroizing::new(plaintext.into());
        let payload = self.session.seal_pending(&plaintext)?;
        let kdf = *self.session.kdf_params().ok_or(LockerError::Locked)?;
        let record = ProtectedRecord::new(payload, kdf);

        let result = self.store.save(&self.workspace, &record).await?;
        self.session.commit(plaintext);
        Ok(result)
    }

    /// Re-read the protected text from the store.
    ///
    /// If the record has vanished the held plaintext is returned unchanged.
    /// A record the held key cannot verify locks the locker.
    pub async fn refresh(&mut self) -> Result<&str> {
        if !self.session.is_unlocked() {
            return Err(LockerError::Locked);
        }

        match self.store.load(&self.workspace).await? {
            Some(record) => self.session.refresh_decrypt(record.payload()),
            None => {
                tracing::debug!(workspace = %self.workspace, "no record to refresh from");
                self.session.plaintext().ok_or(LockerError::Locked)
            }
        }
    }

    /// Discard the key and plaintext. The stored record is untouched.
    pub fn close(&mut self) {
        self.session.close();
    }
}
