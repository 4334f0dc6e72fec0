//! The session key manager: lock/unlock/re-encrypt state machine.
//!
//! A session holds a derived key only while it is unlocked. The whole state
//! is the explicit value [`SessionState`]; there is no ambient state, so the
//! machine is testable without any UI harness.
//!
//! ```text
//!            unlock()                    decrypt ok / no payload
//!  Locked ───────────▶ Unlocking ─────────────────────────────▶ Unlocked
//!    ▲                    │                                        │
//!    │   decrypt failed   │                                        │ edit() → new payload
//!    └────────────────────┘                                        │ refresh_decrypt()
//!    ▲                                                             │
//!    └──────────── close() / refresh_decrypt() failed ─────────────┘
//! ```

use std::fmt;

use locker_core::{
    derive_with_params, CryptoError, DerivedKey, EncryptedPayload, KdfParams, Password,
    WorkspaceId,
};
use zeroize::Zeroizing;

use crate::config::LockerConfig;
use crate::error::{LockerError, Result};

/// Keys are only derived in extractable form when raw export is compiled in.
const EXTRACTABLE: bool = cfg!(feature = "dev-key-export");

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// No key held.
    #[default]
    Locked,
    /// A key derivation is in flight. Observed only if an `unlock` future
    /// was dropped before completing; a new `unlock` restarts.
    Unlocking,
    /// A key and the decrypted plaintext are held.
    Unlocked,
}

/// The explicit session value: `{status, key, plaintext}`.
#[derive(Default)]
pub struct SessionState {
    status: SessionStatus,
    key: Option<DerivedKey>,
    plaintext: Option<Zeroizing<String>>,
}

impl SessionState {
    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether a key is held.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// The decrypted plaintext, while unlocked.
    pub fn plaintext(&self) -> Option<&str> {
        self.plaintext.as_ref().map(|p| p.as_str())
    }

    fn unlocked(key: DerivedKey, plaintext: String) -> Self {
        Self {
            status: SessionStatus::Unlocked,
            key: Some(key),
            plaintext: Some(Zeroizing::new(plaintext)),
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("status", &self.status)
            .field("key", &self.key)
            .field("plaintext_len", &self.plaintext.as_ref().map(|p| p.len()))
            .finish()
    }
}

/// Drives a single session's state machine.
///
/// Each manager exclusively owns its key material. Every transition takes
/// `&mut self`, so two competing unlocks on one session cannot be issued.
#[derive(Default)]
pub struct SessionKeyManager {
    config: LockerConfig,
    state: SessionState,
    /// Parameters the held key was derived under.
    kdf: Option<KdfParams>,
    #[cfg(feature = "dev-key-export")]
    exported: Option<Zeroizing<String>>,
}

impl SessionKeyManager {
    /// Create a locked session.
    pub fn new(config: LockerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &LockerConfig {
        &self.config
    }

    /// The explicit session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    /// Whether the session is unlocked.
    pub fn is_unlocked(&self) -> bool {
        self.state.status == SessionStatus::Unlocked
    }

    /// The decrypted plaintext, while unlocked.
    pub fn plaintext(&self) -> Option<&str> {
        self.state.plaintext()
    }

    /// Parameters the held key was derived under, while unlocked.
    pub fn kdf_params(&self) -> Option<&KdfParams> {
        self.kdf.as_ref()
    }

    /// Unlock with the configured derivation parameters.
    ///
    /// With an `existing` payload the derived key must decrypt it, otherwise
    /// the session stays locked and the key is discarded. Without one,
    /// unlocking always succeeds with an empty plaintext.
    pub async fn unlock(
        &mut self,
        password: &Password,
        workspace: &WorkspaceId,
        existing: Option<&EncryptedPayload>,
    ) -> Result<&str> {
        let params = self.config.kdf;
        self.unlock_with_params(password, workspace, params, existing)
            .await
    }

    /// Unlock with explicit derivation parameters, e.g. those recorded next
    /// to a persisted payload.
    pub async fn unlock_with_params(
        &mut self,
        password: &Password,
        workspace: &WorkspaceId,
        params: KdfParams,
        existing: Option<&EncryptedPayload>,
    ) -> Result<&str> {
        if self.is_unlocked() {
            return Err(LockerError::AlreadyUnlocked);
        }

        self.discard();
        self.state.status = SessionStatus::Unlocking;

        tracing::debug!(
            workspace = %workspace,
            iterations = %params.iterations,
            "deriving session key"
        );
        let key = match derive_off_executor(password, workspace, params).await {
            Ok(key) => key,
            Err(e) => {
                self.state.status = SessionStatus::Locked;
                return Err(e);
            }
        };

        tracing::debug!(workspace = %workspace, "session key derived");

        let plaintext = match existing {
            Some(payload) => match payload.open(&key) {
                Ok(plaintext) => plaintext,
                Err(e) => {
                    drop(key);
                    self.state.status = SessionStatus::Locked;
                    if e.is_authentication_failure() {
                        tracing::warn!(workspace = %workspace, "unlock rejected: {}", e);
                    }
                    return Err(e.into());
                }
            },
            None => {
                tracing::debug!(workspace = %workspace, "no existing payload, starting empty");
                String::new()
            }
        };

        self.state = SessionState::unlocked(key, plaintext);
        self.kdf = Some(params);
        tracing::info!(workspace = %workspace, "locker unlocked");

        Ok(self.state.plaintext().unwrap_or_default())
    }

    /// Replace the plaintext and encrypt it under the held key with a fresh
    /// IV. The caller persists the returned payload.
    pub fn edit(&mut self, plaintext: impl Into<String>) -> Result<EncryptedPayload> {
        let plaintext = Zeroizing::new(plaintext.into());
        let payload = self.seal_pending(&plaintext)?;
        self.commit(plaintext);
        Ok(payload)
    }

    /// Encrypt under the held key without touching the held plaintext.
    pub(crate) fn seal_pending(&self, plaintext: &str) -> Result<EncryptedPayload> {
        Ok(EncryptedPayload::seal(self.held_key()?, plaintext)?)
    }

    /// Replace the held plaintext after its payload has been accepted.
    pub(crate) fn commit(&mut self, plaintext: Zeroizing<String>) {
        if self.is_unlocked() {
            self.state.plaintext = Some(plaintext);
        }
    }

    /// Re-read the plaintext from the currently persisted payload.
    ///
    /// Any failure to read the payload back locks the session and discards
    /// the key, exactly as a failed unlock would.
    pub fn refresh_decrypt(&mut self, persisted: &EncryptedPayload) -> Result<&str> {
        let key = self.held_key()?;
        match persisted.open(key) {
            Ok(plaintext) => {
                self.state.plaintext = Some(Zeroizing::new(plaintext));
                Ok(self.state.plaintext().unwrap_or_default())
            }
            Err(e) => {
                if e.is_authentication_failure() {
                    tracing::warn!("refresh rejected, locking session: {}", e);
                } else {
                    tracing::debug!("refresh failed, locking session: {}", e);
                }
                self.close();
                Err(e.into())
            }
        }
    }

    /// Discard the key, any exported key material and the plaintext.
    ///
    /// Persisted ciphertext is untouched. Closing a locked session is a no-op.
    pub fn close(&mut self) {
        let was_locked = self.state.status == SessionStatus::Locked;
        self.discard();
        self.state.status = SessionStatus::Locked;
        if !was_locked {
            tracing::info!("locker closed");
        }
    }

    /// Export the raw key as base64 for developer inspection.
    #[cfg(feature = "dev-key-export")]
    pub fn export_key(&mut self) -> Result<&str> {
        let exported = self.held_key()?.export()?;
        Ok(self.exported.insert(exported).as_str())
    }

    fn held_key(&self) -> Result<&DerivedKey> {
        match (&self.state.status, &self.state.key) {
            (SessionStatus::Unlocked, Some(key)) => Ok(key),
            _ => Err(LockerError::Locked),
        }
    }

    fn discard(&mut self) {
        self.state.key = None;
        self.state.plaintext = None;
        self.kdf = None;
        #[cfg(feature = "dev-key-export")]
        {
            self.exported = None;
        }
    }
}

impl fmt::Debug for SessionKeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeyManager")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("kdf", &self.kdf)
            .finish_non_exhaustive()
    }
}

/// Run PBKDF2 on the blocking pool so the async executor stays responsive.
async fn derive_off_executor(
    password: &Password,
    workspace: &WorkspaceId,
    params: KdfParams,
) -> Result<DerivedKey> {
    let password = password.clone();
    let workspace = workspace.clone();
    let key = tokio::task::spawn_blocking(move || {
        derive_with_params(&password, &workspace, &params, EXTRACTABLE)
    })
    .await
    .map_err(|e| CryptoError::EnvironmentUnavailable(format!("key derivation task failed: {}", e)))??;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use locker_core::{seal, Iterations, Iv};

    fn config() -> LockerConfig {
        LockerConfig::default().with_iterations(Iterations::new(1_000).unwrap())
    }

    fn pw(s: &str) -> Password {
        Password::new(s).unwrap()
    }

    fn ws(s: &str) -> WorkspaceId {
        WorkspaceId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_first_unlock_starts_empty() {
        let mut session = SessionKeyManager::new(config());
        assert_eq!(session.status(), SessionStatus::Locked);

        let plaintext = session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        assert_eq!(plaintext, "");
        assert_eq!(session.status(), SessionStatus::Unlocked);
        assert!(session.state().has_key());
    }

    #[tokio::test]
    async fn test_edit_then_unlock_fresh_session() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        let payload = session.edit("secret note").unwrap();
        assert_eq!(session.plaintext(), Some("secret note"));

        let mut fresh = SessionKeyManager::new(config());
        let plaintext = fresh
            .unlock(&pw("hunter2"), &ws("ws-1"), Some(&payload))
            .await
            .unwrap();
        assert_eq!(plaintext, "secret note");
    }

    #[tokio::test]
    async fn test_wrong_password_stays_locked() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        let payload = session.edit("secret note").unwrap();

        let mut fresh = SessionKeyManager::new(config());
        let err = fresh
            .unlock(&pw("wrong"), &ws("ws-1"), Some(&payload))
            .await
            .unwrap_err();

        assert!(err.is_authentication_failure());
        assert_eq!(fresh.status(), SessionStatus::Locked);
        assert!(!fresh.state().has_key());
        assert_eq!(fresh.plaintext(), None);
    }

    #[tokio::test]
    async fn test_other_workspace_cannot_unlock() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-A"), None).await.unwrap();
        let payload = session.edit("secret").unwrap();

        let mut other = SessionKeyManager::new(config());
        let err = other
            .unlock(&pw("hunter2"), &ws("ws-B"), Some(&payload))
            .await
            .unwrap_err();
        assert!(err.is_authentication_failure());
    }

    #[tokio::test]
    async fn test_unlock_twice_rejected() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        let err = session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap_err();
        assert!(matches!(err, LockerError::AlreadyUnlocked));
        assert!(session.is_unlocked());
    }

    #[tokio::test]
    async fn test_edit_produces_fresh_payloads() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();

        let a = session.edit("same").unwrap();
        let b = session.edit("same").unwrap();
        assert_ne!(a.iv(), b.iv());
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_close_then_edit_rejected() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        let payload = session.edit("note").unwrap();

        session.close();
        assert_eq!(session.status(), SessionStatus::Locked);
        assert!(!session.state().has_key());
        assert_eq!(session.plaintext(), None);
        assert!(session.kdf_params().is_none());

        assert!(matches!(session.edit("more"), Err(LockerError::Locked)));
        assert!(matches!(
            session.refresh_decrypt(&payload),
            Err(LockerError::Locked)
        ));

        // Idempotent.
        session.close();
        assert_eq!(session.status(), SessionStatus::Locked);
    }

    #[tokio::test]
    async fn test_refresh_decrypt_picks_up_new_payload() {
        let mut writer = SessionKeyManager::new(config());
        writer.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        let first = writer.edit("v1").unwrap();

        let mut reader = SessionKeyManager::new(config());
        reader
            .unlock(&pw("hunter2"), &ws("ws-1"), Some(&first))
            .await
            .unwrap();

        let second = writer.edit("v2").unwrap();
        assert_eq!(reader.refresh_decrypt(&second).unwrap(), "v2");
        assert!(reader.is_unlocked());
    }

    #[tokio::test]
    async fn test_refresh_decrypt_failure_locks() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();

        let mut stranger = SessionKeyManager::new(config());
        stranger.unlock(&pw("other"), &ws("ws-1"), None).await.unwrap();
        let foreign = stranger.edit("not yours").unwrap();

        let err = session.refresh_decrypt(&foreign).unwrap_err();
        assert!(err.is_authentication_failure());
        assert_eq!(session.status(), SessionStatus::Locked);
        assert!(!session.state().has_key());
    }

    #[tokio::test]
    async fn test_refresh_decrypt_malformed_payload_locks() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-123"), None).await.unwrap();
        let good = session.edit("secret note").unwrap();

        let cut_iv = EncryptedPayload::new(good.ciphertext(), &good.iv()[..12]);
        let err = session.refresh_decrypt(&cut_iv).unwrap_err();
        assert!(err.is_authentication_failure());
        assert_eq!(session.status(), SessionStatus::Locked);
        assert!(!session.state().has_key());
        assert_eq!(session.plaintext(), None);
    }

    #[tokio::test]
    async fn test_refresh_decrypt_non_utf8_payload_locks() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();

        let key = derive_with_params(&pw("hunter2"), &ws("ws-1"), &config().kdf, false).unwrap();
        let iv = Iv::generate().unwrap();
        let sealed = seal(&key, &[0xff, 0xfe], &iv).unwrap();
        let binary = EncryptedPayload::new(STANDARD.encode(sealed), iv.to_base64());

        let err = session.refresh_decrypt(&binary).unwrap_err();
        assert!(err.is_input_validation());
        assert_eq!(session.status(), SessionStatus::Locked);
        assert!(!session.state().has_key());
    }

    #[tokio::test]
    async fn test_dropped_unlock_leaves_unlocking_then_restarts() {
        let mut session = SessionKeyManager::new(LockerConfig::default());
        let password = pw("hunter2");
        let workspace = ws("ws-1");

        let timed_out = tokio::time::timeout(
            Duration::ZERO,
            session.unlock(&password, &workspace, None),
        )
        .await
        .is_err();
        assert!(timed_out);

        assert_eq!(session.status(), SessionStatus::Unlocking);
        assert!(!session.state().has_key());
        assert!(matches!(session.edit("x"), Err(LockerError::Locked)));

        let plaintext = session
            .unlock_with_params(&password, &workspace, config().kdf, None)
            .await
            .unwrap();
        assert_eq!(plaintext, "");
        assert!(session.is_unlocked());
    }

    #[tokio::test]
    async fn test_unlock_with_recorded_params() {
        let slow = KdfParams::with_iterations(Iterations::new(2_000).unwrap());

        let mut writer = SessionKeyManager::new(config());
        writer
            .unlock_with_params(&pw("hunter2"), &ws("ws-1"), slow, None)
            .await
            .unwrap();
        let payload = writer.edit("note").unwrap();
        assert_eq!(writer.kdf_params(), Some(&slow));

        // Configured defaults do not match the payload.
        let mut reader = SessionKeyManager::new(config());
        assert!(reader
            .unlock(&pw("hunter2"), &ws("ws-1"), Some(&payload))
            .await
            .unwrap_err()
            .is_authentication_failure());

        let plaintext = reader
            .unlock_with_params(&pw("hunter2"), &ws("ws-1"), slow, Some(&payload))
            .await
            .unwrap();
        assert_eq!(plaintext, "note");
    }

    #[tokio::test]
    async fn test_session_debug_redacts_plaintext() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        session.edit("top secret words").unwrap();

        let debug = format!("{:?}", session);
        assert!(!debug.contains("top secret words"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[cfg(not(feature = "dev-key-export"))]
    #[tokio::test]
    async fn test_keys_not_extractable_by_default() {
        let mut session = SessionKeyManager::new(config());
        session.unlock(&pw("hunter2"), &ws("ws-1"), None).await.unwrap();
        assert!(!session.held_key().unwrap().is_extractable());
    }

    #[cfg(feature = "dev-key-export")]
    #[tokio::test]
    async fn test_export_key_when_enabled() {
        let mut session = SessionKeyManager::new(config());
        assert!(matches!(session.export_key(), Err(LockerError::Locked)));

        session.unlock(&pw("hunter2"), &ws("ws-123"), None).await.unwrap();
        assert_eq!(
            session.export_key().unwrap(),
            "FoKuuNWaqsnQzCTloP3OhovV83QxuBg3zc4+jmy0VlY="
        );

        session.close();
        assert!(session.exported.is_none());
    }
}
