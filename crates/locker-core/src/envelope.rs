//! Encrypted payload envelope and the persisted record.
//!
//! [`EncryptedPayload`] is the two-string artifact a storage collaborator
//! persists. [`ProtectedRecord`] wraps it with the parameters needed to
//! re-derive the key, so that a later change of defaults does not strand
//! old data.

use serde::{Deserialize, Serialize};

use crate::cipher;
use crate::error::Result;
use crate::kdf::{DerivedKey, KdfParams};

/// Format identifier for encrypted payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionFormat {
    /// AES-256-GCM, 96-bit IV, 128-bit tag.
    #[default]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

/// Base64 ciphertext (tag appended) and base64 IV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    ciphertext: String,
    iv: String,
}

impl EncryptedPayload {
    /// Assemble a payload from its two persisted strings.
    pub fn new(ciphertext: impl Into<String>, iv: impl Into<String>) -> Self {
        Self {
            ciphertext: ciphertext.into(),
            iv: iv.into(),
        }
    }

    /// Encrypt plaintext under a fresh IV.
    pub fn seal(key: &DerivedKey, plaintext: &str) -> Result<Self> {
        cipher::encrypt(key, plaintext)
    }

    /// Verify and decrypt.
    pub fn open(&self, key: &DerivedKey) -> Result<String> {
        cipher::decrypt(key, &self.ciphertext, &self.iv)
    }

    /// Base64 ciphertext.
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    /// Base64 IV.
    pub fn iv(&self) -> &str {
        &self.iv
    }

    /// Split into `(ciphertext, iv)`.
    pub fn into_parts(self) -> (String, String) {
        (self.ciphertext, self.iv)
    }
}

/// A payload together with its format and derivation parameters.
///
/// A bare `{"ciphertext", "iv"}` object deserializes as a record with
/// default format and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedRecord {
    /// Encryption algorithm used.
    #[serde(default)]
    pub format: EncryptionFormat,

    /// Key derivation parameters.
    #[serde(default)]
    pub kdf: KdfParams,

    #[serde(flatten)]
    payload: EncryptedPayload,
}

impl ProtectedRecord {
    /// Wrap a payload with the parameters its key was derived under.
    pub fn new(payload: EncryptedPayload, kdf: KdfParams) -> Self {
        Self {
            format: EncryptionFormat::Aes256Gcm,
            kdf,
            payload,
        }
    }

    /// Wrap a payload written before parameters were recorded.
    pub fn legacy(payload: EncryptedPayload) -> Self {
        Self::new(payload, KdfParams::default())
    }

    /// The encrypted payload.
    pub fn payload(&self) -> &EncryptedPayload {
        &self.payload
    }

    /// The derivation parameters.
    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<EncryptedPayload> for ProtectedRecord {
    fn from(payload: EncryptedPayload) -> Self {
        Self::legacy(payload)
    }
}
