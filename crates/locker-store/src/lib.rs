//! # Locker Store
//!
//! Storage seam for the workspace locker. The locker produces opaque
//! [`ProtectedRecord`](locker_core::ProtectedRecord)s; a [`PayloadStore`]
//! persists one per workspace.
//!
//! ## Key Types
//!
//! - [`PayloadStore`] - The async trait for record persistence
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`SaveResult`] - Whether a save created or replaced a record
//!
//! ## Usage
//!
//! ```rust,no_run
//! use locker_core::WorkspaceId;
//! use locker_store::{MemoryStore, PayloadStore};
//!
//! async fn example() {
//!     let store = MemoryStore::new();
//!     let workspace = WorkspaceId::new("ws-123").unwrap();
//!
//!     // let record: ProtectedRecord = ...;
//!     // store.save(&workspace, &record).await.unwrap();
//!     let loaded = store.load(&workspace).await.unwrap();
//!     assert!(loaded.is_none());
//! }
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{PayloadStore, SaveResult};
