//! # Locker Core
//!
//! Pure primitives for the workspace locker: salt derivation, password-based
//! key derivation and authenticated encryption.
//!
//! This crate contains no I/O, no storage, no async. It is pure computation
//! over standard primitives (SHA-256, PBKDF2-HMAC-SHA256, AES-256-GCM).
//!
//! ## Pipeline
//!
//! ```text
//! workspace id ──SHA-256("ws:" + id)──▶ Salt
//! password + Salt ──PBKDF2(iterations)──▶ DerivedKey
//! DerivedKey + plaintext ──AES-GCM(fresh IV)──▶ EncryptedPayload { ciphertext, iv }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use locker_core::{derive_session_key, decrypt, encrypt, Iterations, Password, WorkspaceId};
//!
//! let password = Password::new("hunter2").unwrap();
//! let workspace = WorkspaceId::new("ws-123").unwrap();
//! let key = derive_session_key(&password, &workspace, Iterations::new(1_000).unwrap()).unwrap();
//!
//! let payload = encrypt(&key, "secret note").unwrap();
//! let plaintext = decrypt(&key, payload.ciphertext(), payload.iv()).unwrap();
//! assert_eq!(plaintext, "secret note");
//! ```

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod salt;
pub mod types;

pub use cipher::{decrypt, encrypt, open, seal, Iv, IV_LENGTH, TAG_LENGTH};
pub use envelope::{EncryptedPayload, EncryptionFormat, ProtectedRecord};
pub use error::{CryptoError, Result};
pub use kdf::{derive_key, derive_session_key, derive_with_params, DerivedKey, KdfParams, KEY_LENGTH};
pub use salt::{derive_salt, Salt, SaltVersion};
pub use types::{Iterations, Password, WorkspaceId, DEFAULT_ITERATIONS};
