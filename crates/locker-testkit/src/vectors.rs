//! Golden test vectors for deterministic verification.
//!
//! Expected values were computed with an independent PBKDF2/AES-GCM
//! implementation. Any port of the locker must reproduce them exactly, or
//! payloads written by one side will not open on the other.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use locker_core::{
    derive_key, derive_salt, seal, Iterations, Iv, Password, WorkspaceId,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Workspace id.
    pub workspace_id: &'static str,
    /// Password.
    pub password: &'static str,
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// Expected salt (hex).
    pub expected_salt: &'static str,
    /// Expected raw key (base64).
    pub expected_key: &'static str,
    /// Optional fixed-IV encryption check: (iv, plaintext, ciphertext), base64 except plaintext.
    pub sealed: Option<(&'static str, &'static str, &'static str)>,
}

const WS_123_SALT: &str = "fdc290d7af0fd5c39b42729c19502fad2196cb8fbd459a26584414ccb0700eb5";

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "hunter2 at 1k iterations",
            workspace_id: "ws-123",
            password: "hunter2",
            iterations: 1_000,
            expected_salt: WS_123_SALT,
            expected_key: "FoKuuNWaqsnQzCTloP3OhovV83QxuBg3zc4+jmy0VlY=",
            sealed: Some((
                "AAECAwQFBgcICQoL",
                "secret note",
                "FTVMaTI/ZFuEddBuA0LwwBvC9WAuVIvnzaM4",
            )),
        },
        GoldenVector {
            name: "hunter2 at default iterations",
            workspace_id: "ws-123",
            password: "hunter2",
            iterations: 100_000,
            expected_salt: WS_123_SALT,
            expected_key: "7QT/AemjjNXHYS5W4Bn0qBIjpJa0CdfPiE+iZprSnhM=",
            sealed: None,
        },
        GoldenVector {
            name: "wrong password at 1k iterations",
            workspace_id: "ws-123",
            password: "wrong",
            iterations: 1_000,
            expected_salt: WS_123_SALT,
            expected_key: "ipwbpMSkUQVRrklgEU2HSGhz8ZyItCn5RJ+/Cn/tR9w=",
            sealed: None,
        },
    ]
}

/// Known salts for isolation checks: (workspace id, salt hex).
pub fn salt_vectors() -> Vec<(&'static str, &'static str)> {
    vec![
        ("ws-123", WS_123_SALT),
        (
            "ws-A",
            "403a43ab9668595768bb5310046dd6a552a248a37267df5f4563d97c63a9404d",
        ),
        (
            "ws-B",
            "e773062aaaa650fc026f05ae2080c8d0256f6c622b3b242eb3703dec87935f93",
        ),
    ]
}

/// Outcome of checking one vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorReport {
    /// Vector name.
    pub name: String,
    /// Salt matched.
    pub salt_ok: bool,
    /// Key matched.
    pub key_ok: bool,
    /// Fixed-IV ciphertext matched (true when the vector has none).
    pub sealed_ok: bool,
}

impl VectorReport {
    /// True if every check passed.
    pub fn passed(&self) -> bool {
        self.salt_ok && self.key_ok && self.sealed_ok
    }
}

/// Recompute a vector and compare against its expected outputs.
pub fn verify_vector(vector: &GoldenVector) -> Result<VectorReport, locker_core::CryptoError> {
    let workspace = WorkspaceId::new(vector.workspace_id)?;
    let password = Password::new(vector.password)?;
    let salt = derive_salt(&workspace);
    let key = derive_key(&password, &salt, Iterations::new(vector.iterations)?, true)?;

    let sealed_ok = match vector.sealed {
        Some((iv, plaintext, expected)) => {
            let iv = Iv::from_base64(iv)?;
            let ciphertext = seal(&key, plaintext.as_bytes(), &iv)?;
            STANDARD.encode(ciphertext) == expected
        }
        None => true,
    };

    Ok(VectorReport {
        name: vector.name.to_string(),
        salt_ok: hex::encode(salt.as_bytes()) == vector.expected_salt,
        key_ok: key.export()?.as_str() == vector.expected_key,
        sealed_ok,
    })
}

/// Verify all golden vectors.
pub fn verify_all_vectors() -> Result<Vec<VectorReport>, locker_core::CryptoError> {
    all_vectors().iter().map(verify_vector).collect()
}
