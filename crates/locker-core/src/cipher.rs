//! AES-256-GCM authenticated encryption.
//!
//! Every encryption draws a fresh 96-bit IV from the OS RNG. Decryption
//! verifies the 128-bit tag before releasing any plaintext; a wrong key and
//! tampered data fail identically.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroize;

use crate::envelope::EncryptedPayload;
use crate::error::{CryptoError, Result};
use crate::kdf::DerivedKey;

/// IV length in bytes.
pub const IV_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// A 96-bit AES-GCM nonce. Never reused under the same key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Iv([u8; IV_LENGTH]);

impl Iv {
    /// Draw a fresh IV from the OS RNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; IV_LENGTH];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::EnvironmentUnavailable(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; IV_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; IV_LENGTH] {
        &self.0
    }

    /// Encode as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Decode from standard base64.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::InputValidation(format!("iv is not valid base64: {}", e)))?;
        let arr: [u8; IV_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InputValidation(format!(
                "iv must be {} bytes, got {}",
                IV_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iv({})", hex::encode(self.0))
    }
}

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.material()))
}

/// Encrypt raw bytes under an explicit IV.
///
/// The caller is responsible for IV uniqueness; prefer [`encrypt`].
pub fn seal(key: &DerivedKey, plaintext: &[u8], iv: &Iv) -> Result<Vec<u8>> {
    cipher_for(key)
        .encrypt(Nonce::from_slice(&iv.0), plaintext)
        .map_err(|_| CryptoError::InputValidation("plaintext too large to encrypt".to_string()))
}

/// Verify and decrypt raw bytes.
pub fn open(key: &DerivedKey, ciphertext: &[u8], iv: &Iv) -> Result<Vec<u8>> {
    cipher_for(key)
        .decrypt(Nonce::from_slice(&iv.0), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}

/// Encrypt text under a fresh random IV.
pub fn encrypt(key: &DerivedKey, plaintext: &str) -> Result<EncryptedPayload> {
    let iv = Iv::generate()?;
    let ciphertext = seal(key, plaintext.as_bytes(), &iv)?;
    Ok(EncryptedPayload::new(STANDARD.encode(ciphertext), iv.to_base64()))
}

/// Verify and decrypt base64 ciphertext back into text.
///
/// Persisted strings that do not even decode (bad base64, an IV that is not
/// 12 bytes) are corruption and fail exactly like a wrong key.
pub fn decrypt(key: &DerivedKey, ciphertext_b64: &str, iv_b64: &str) -> Result<String> {
    let iv = Iv::from_base64(iv_b64).map_err(|_| CryptoError::AuthenticationFailure)?;
    let ciphertext = STANDARD
        .decode(ciphertext_b64)
        .map_err(|_| CryptoError::AuthenticationFailure)?;

    let plaintext = open(key, &ciphertext, &iv)?;
    String::from_utf8(plaintext).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        CryptoError::InputValidation("decrypted data is not valid UTF-8".to_string())
    })
}
