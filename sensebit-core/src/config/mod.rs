//! Persisted key-value configuration

pub mod store;

pub use store::{ConfigRead, ConfigStorage, ConfigStore, StorageError, MAX_DOCUMENT_LEN};
