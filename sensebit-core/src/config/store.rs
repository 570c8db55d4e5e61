//! Whole-document JSON configuration store
//!
//! The board keeps one JSON object on persistent storage. Every read
//! loads and parses the whole document; every write is a
//! read-merge-rewrite of the whole document. A missing or unreadable
//! document degrades to the empty document instead of surfacing an
//! error to sensor callers.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Largest document the store will load.
pub const MAX_DOCUMENT_LEN: usize = 1024;

/// Errors from the underlying document storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No document has been written yet
    NotFound,
    /// Document larger than the provided buffer
    BufferTooSmall,
    /// Storage operation failed
    Io,
}

/// Backing storage for the configuration document.
///
/// Implementations hold a single document (a file, a flash region) and
/// should replace it atomically on write so a torn write never leaves
/// a half document behind.
pub trait ConfigStorage {
    /// Read the whole document into `buffer`, returning its length.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError>;

    /// Replace the whole document.
    fn write(&mut self, data: &[u8]) -> Result<(), StorageError>;
}

/// Result of a single-key lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigRead {
    /// Key present with a non-null value
    Found(Value),
    /// Document intact, but the key is absent or null
    NotFound,
    /// Document missing, oversized or unparseable
    Unreadable,
}

impl ConfigRead {
    /// The value, if one was found.
    pub fn into_value(self) -> Option<Value> {
        match self {
            ConfigRead::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// Key-value store over one JSON document.
pub struct ConfigStore<S> {
    storage: S,
}

impl<S: ConfigStorage> ConfigStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load and parse the document. Returns the map and whether the
    /// document was intact; any fault yields the empty document.
    fn load(&mut self) -> (Map<String, Value>, bool) {
        let mut buffer = [0u8; MAX_DOCUMENT_LEN];
        let len = match self.storage.read(&mut buffer) {
            Ok(len) => len,
            Err(_) => return (Map::new(), false),
        };

        match serde_json::from_slice::<Value>(&buffer[..len]) {
            Ok(Value::Object(map)) => (map, true),
            Ok(_) | Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("config document unreadable, starting from empty");
                (Map::new(), false)
            }
        }
    }

    /// Look up one key.
    pub fn get(&mut self, key: &str) -> ConfigRead {
        let (mut doc, intact) = self.load();
        if !intact {
            return ConfigRead::Unreadable;
        }
        match doc.remove(key) {
            Some(Value::Null) | None => ConfigRead::NotFound,
            Some(value) => ConfigRead::Found(value),
        }
    }

    /// Set one key, preserving the rest of the document.
    ///
    /// An unreadable document is replaced by one holding only this key.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        let (mut doc, _) = self.load();
        doc.insert(key.to_string(), value);
        let bytes: Vec<u8> =
            serde_json::to_vec(&Value::Object(doc)).map_err(|_| StorageError::Io)?;
        self.storage.write(&bytes)
    }

    /// Overwrite one key with an explicit null, preserving the rest of
    /// the document. A later [`Self::get`] reports the key as not found.
    pub fn clear(&mut self, key: &str) -> Result<(), StorageError> {
        self.set(key, Value::Null)
    }

    /// Look up one key and decode it.
    pub fn get_typed<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.get(key)
            .into_value()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Encode a value and set it under `key`.
    pub fn set_typed<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_value(value).map_err(|_| StorageError::Io)?;
        self.set(key, encoded)
    }
}
