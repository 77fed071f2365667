//! Adapters: storage backends, the encrypting store and mock collaborators.

pub mod in_memory;
pub mod mock;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod secure_store;
