use crate::error::SafepragError;
use crate::store::{KeyValueStore, StorageKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tracing::{info, warn};

pub const BACKUP_VERSION: u32 = 1;

/// A full dump of every known key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub data: BTreeMap<String, serde_json::Value>,
}

/// Dump every known key that holds valid JSON.
pub fn backup(store: &dyn KeyValueStore, at: OffsetDateTime) -> Result<Backup, SafepragError> {
    let mut data = BTreeMap::new();
    for key in store.keys()? {
        if StorageKey::from_name(&key).is_none() {
            continue;
        }
        let Some(raw) = store.get(&key)? else {
            continue;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => {
                data.insert(key, value);
            }
            Err(e) => warn!(%key, error = %e, "skipping unparseable value in backup"),
        }
    }
    info!(keys = data.len(), "created backup");
    Ok(Backup {
        version: BACKUP_VERSION,
        created_at: at,
        data,
    })
}

/// Write every known key of `dump` back into the store, returning how many
/// were restored. Keys absent from the dump are left alone.
pub fn restore(store: &mut dyn KeyValueStore, dump: &Backup) -> Result<usize, SafepragError> {
    if dump.version > BACKUP_VERSION {
        return Err(SafepragError::Store {
            key: "backup".into(),
            reason: format!(
                "backup version {} is newer than supported version {BACKUP_VERSION}",
                dump.version
            ),
        });
    }
    let mut restored = 0;
    for (key, value) in &dump.data {
        if StorageKey::from_name(key).is_none() {
            warn!(%key, "ignoring unknown key in backup");
            continue;
        }
        store.set(key, &serde_json::to_string(value)?)?;
        restored += 1;
    }
    info!(restored, "restored backup");
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn test_backup_skips_unknown_and_garbage() {
        let mut store = MemoryStore::new();
        store.set("safeprag_clients", "[]").unwrap();
        store.set("safeprag_os_counter", "12").unwrap();
        store.set("safeprag_schedules", "{oops").unwrap();
        store.set("something_else", "1").unwrap();

        let dump = backup(&store, datetime!(2024-03-15 12:00 UTC)).unwrap();
        assert_eq!(dump.data.len(), 2);
        assert_eq!(dump.data["safeprag_os_counter"], json!(12));
    }

    #[test]
    fn test_restore_merges() {
        let mut store = MemoryStore::new();
        store.set("safeprag_products", "[]").unwrap();

        let mut data = BTreeMap::new();
        data.insert("safeprag_os_counter".to_string(), json!(7));
        data.insert("legacy_key".to_string(), json!("x"));
        let dump = Backup {
            version: 1,
            created_at: datetime!(2024-03-15 12:00 UTC),
            data,
        };
        assert_eq!(restore(&mut store, &dump).unwrap(), 1);
        assert_eq!(store.get("safeprag_os_counter").unwrap().as_deref(), Some("7"));
        assert_eq!(store.get("safeprag_products").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("legacy_key").unwrap(), None);
    }

    #[test]
    fn test_restore_rejects_newer_version() {
        let mut store = MemoryStore::new();
        let dump = Backup {
            version: 99,
            created_at: datetime!(2024-03-15 12:00 UTC),
            data: BTreeMap::new(),
        };
        assert!(restore(&mut store, &dump).is_err());
    }
}
