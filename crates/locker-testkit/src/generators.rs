//! Proptest generators for property-based testing.

use proptest::prelude::*;

use locker_core::{Iterations, KdfParams, Password, SaltVersion, WorkspaceId};

/// Generate a non-empty password, including non-ASCII characters.
pub fn password() -> impl Strategy<Value = Password> {
    "\\PC{1,32}".prop_filter_map("password must be non-empty", |s| Password::new(s).ok())
}

/// Generate a workspace id.
pub fn workspace_id() -> impl Strategy<Value = WorkspaceId> {
    "ws-[a-zA-Z0-9_-]{1,24}".prop_map(|s| WorkspaceId::new(s).expect("pattern is never blank"))
}

/// Generate plaintext of at most `max_len` characters.
pub fn plaintext(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..=max_len).prop_map(|chars| chars.into_iter().collect())
}

/// Generate an iteration count small enough to keep property runs fast.
pub fn fast_iterations() -> impl Strategy<Value = Iterations> {
    (1u32..=64).prop_map(|n| Iterations::new(n).expect("range excludes zero"))
}

/// Generate derivation parameters with a fast iteration count.
pub fn kdf_params() -> impl Strategy<Value = KdfParams> {
    fast_iterations().prop_map(|iterations| KdfParams {
        iterations,
        salt_version: SaltVersion::V1,
    })
}

/// Parameters for a single protect/unprotect scenario.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub password: Password,
    pub workspace: WorkspaceId,
    pub kdf: KdfParams,
    pub plaintext: String,
}

impl Arbitrary for ScenarioParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (password(), workspace_id(), kdf_params(), plaintext(256))
            .prop_map(|(password, workspace, kdf, plaintext)| ScenarioParams {
                password,
                workspace,
                kdf,
                plaintext,
            })
            .boxed()
    }
}
