//! # Locker Testkit
//!
//! Testing utilities for the workspace locker.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known salts, keys and ciphertexts for cross-implementation verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A known workspace/password pair with cheap derivation parameters
//!
//! ## Golden Vectors
//!
//! ```rust
//! use locker_testkit::vectors::verify_all_vectors;
//!
//! for report in verify_all_vectors().unwrap() {
//!     assert!(report.passed(), "{}", report.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use locker_testkit::generators::ScenarioParams;
//!
//! proptest! {
//!     #[test]
//!     fn payload_round_trips(params: ScenarioParams) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use locker_testkit::fixtures::TestWorkspace;
//!
//! let fixture = TestWorkspace::new();
//! let store = fixture.seeded_store("secret note");
//! assert_eq!(store.len().unwrap(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_workspace_fixtures, TestWorkspace, FAST_ITERATIONS};
pub use generators::ScenarioParams;
pub use vectors::{all_vectors, salt_vectors, verify_all_vectors, GoldenVector, VectorReport};
