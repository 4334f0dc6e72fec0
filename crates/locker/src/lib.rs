//! # Locker
//!
//! Client-side, workspace-scoped protection of a piece of text. The text is
//! encrypted under a key stretched from a password; neither the plaintext
//! nor the password ever leaves the process. Only two base64 strings,
//! `ciphertext` and `iv`, are handed to storage.
//!
//! ## Key Concepts
//!
//! - **Session**: holds a derived key only between unlock and close.
//! - **Locked / Unlocking / Unlocked**: the only session states. There is no
//!   timeout; closing is always explicit.
//! - **Record**: the persisted payload plus the parameters its key was
//!   derived under.
//!
//! A wrong password and corrupted data fail identically, and a failed
//! unlock of an existing record never falls through to "start a new secret".
//! There is no password recovery: losing the password loses the text.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use locker::{Locker, LockerConfig};
//! use locker::core::WorkspaceId;
//! use locker::store::MemoryStore;
//!
//! async fn example() {
//!     let store = Arc::new(MemoryStore::new());
//!     let workspace = WorkspaceId::new("ws-123").unwrap();
//!     let mut locker = Locker::new(workspace, store, LockerConfig::default());
//!
//!     locker.open("hunter2").await.unwrap();
//!     locker.write("secret note").await.unwrap();
//!     locker.close();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `locker::core` - Salt, key derivation, cipher, envelope
//! - `locker::store` - Storage seam and in-memory store

pub mod config;
pub mod error;
pub mod locker;
pub mod session;

pub use locker_core as core;
pub use locker_store as store;

pub use config::LockerConfig;
pub use error::{LockerError, Result};
pub use locker::Locker;
pub use session::{SessionKeyManager, SessionState, SessionStatus};

pub use locker_core::{
    CryptoError, EncryptedPayload, Iterations, KdfParams, Password, ProtectedRecord, WorkspaceId,
};
