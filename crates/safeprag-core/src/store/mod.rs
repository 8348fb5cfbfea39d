pub mod backup;
pub mod dir;
pub mod keys;
pub mod memory;
pub mod state;

use crate::error::SafepragError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub use backup::{backup, restore, Backup};
pub use dir::DirStore;
pub use keys::StorageKey;
pub use memory::MemoryStore;

/// String key-value persistence backend.
///
/// Values are JSON text; typed access goes through [`load_json`] and
/// [`save_json`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SafepragError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), SafepragError>;

    /// Removing a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), SafepragError>;

    fn keys(&self) -> Result<Vec<String>, SafepragError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Read a typed value, falling back to `T::default()` when the key is
/// missing or holds something that does not parse.
///
/// Backend read failures are returned, never replaced by the default.
pub fn load_json<T>(store: &dyn KeyValueStore, key: StorageKey) -> Result<T, SafepragError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key.as_str())? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(%key, backend = store.backend_name(), error = %e, "stored value does not parse, using default");
            Ok(T::default())
        }
    }
}

pub fn save_json<T>(store: &mut dyn KeyValueStore, key: StorageKey, value: &T) -> Result<(), SafepragError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key.as_str(), &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Client;

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let clients = vec![Client {
            code: "001".into(),
            name: "Padaria Central".into(),
            ..Default::default()
        }];
        save_json(&mut store, StorageKey::Clients, &clients).unwrap();
        let back: Vec<Client> = load_json(&store, StorageKey::Clients).unwrap();
        assert_eq!(back, clients);
    }

    #[test]
    fn test_missing_key_is_default() {
        let store = MemoryStore::new();
        let clients: Vec<Client> = load_json(&store, StorageKey::Clients).unwrap();
        assert!(clients.is_empty());
    }

    #[test]
    fn test_garbage_is_default() {
        let mut store = MemoryStore::new();
        store.set(StorageKey::Clients.as_str(), "{not json").unwrap();
        let clients: Vec<Client> = load_json(&store, StorageKey::Clients).unwrap();
        assert!(clients.is_empty());
    }

    struct Unreachable;

    impl KeyValueStore for Unreachable {
        fn get(&self, key: &str) -> Result<Option<String>, SafepragError> {
            Err(SafepragError::Store {
                key: key.to_string(),
                reason: "connection reset".into(),
            })
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), SafepragError> {
            Ok(())
        }

        fn delete(&mut self, _key: &str) -> Result<(), SafepragError> {
            Ok(())
        }

        fn keys(&self) -> Result<Vec<String>, SafepragError> {
            Ok(Vec::new())
        }

        fn backend_name(&self) -> &str {
            "unreachable"
        }
    }

    #[test]
    fn test_read_failure_is_returned() {
        let result: Result<Vec<Client>, _> = load_json(&Unreachable, StorageKey::Clients);
        assert!(matches!(result, Err(SafepragError::Store { .. })));
    }
}
