//! Durable key-value storage for session tokens.
//!
//! This module provides the `Storage` trait and three backends:
//! - `FileStorage`: a JSON map on disk, written atomically
//! - `KeyringStorage`: OS-level secure storage via keyring
//! - `MemoryStorage`: an in-process map that does not survive restarts
//!
//! Access is synchronous. Values are plain strings.

pub mod file;
pub mod keychain;
pub mod memory;

use anyhow::Result;

pub use file::FileStorage;
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

pub trait Storage: Send + Sync {
    /// Read a value, `None` if the key was never set or has been removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_storage_delegates() {
        let mut storage: Box<dyn Storage> = Box::new(MemoryStorage::new());
        storage.set("token", "T1").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("T1"));
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }
}
