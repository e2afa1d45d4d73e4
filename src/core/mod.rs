//! Core business logic - Framework-agnostic catalog operations.
//!
//! Every function takes a `SeaORM` connection (and the [`FileStore`](crate::storage::FileStore)
//! when files are involved), so an HTTP layer, a CLI or the tests can drive
//! them the same way.

pub mod agency;
pub mod carousel;
pub mod contact;
pub mod gallery;
pub mod listing;
pub(crate) mod ordering;
pub mod plan;
