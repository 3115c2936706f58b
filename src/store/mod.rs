pub mod favorites;
pub mod history;
pub mod json_store;
pub mod memory;
pub mod ranking;

use std::rc::Rc;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use crate::store::favorites::Favorites;
use crate::store::history::ErrorHistory;
use crate::store::ranking::Ranking;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value persistence port. Values are JSON text.
///
/// `read` never fails: an absent or unreadable key is `None`.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed stores sharing one backend.
#[derive(Clone)]
pub struct Stores {
    pub history: ErrorHistory,
    pub ranking: Ranking,
    pub favorites: Favorites,
}

impl Stores {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self {
            history: ErrorHistory::new(Rc::clone(&backend)),
            ranking: Ranking::new(Rc::clone(&backend)),
            favorites: Favorites::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Rc::new(memory::MemoryStore::new()))
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `<unix millis>-<9 base36 chars>`.
pub(crate) fn new_entry_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{suffix}", Utc::now().timestamp_millis())
}

/// Parse a stored JSON list, treating absence and corruption as empty.
pub(crate) fn load_list<T: serde::de::DeserializeOwned>(
    backend: &dyn KeyValueStore,
    key: &str,
) -> Vec<T> {
    let Some(raw) = backend.read(key) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(e) => {
            log::error!("Discarding unreadable '{key}' data: {e}");
            Vec::new()
        }
    }
}

/// Persist a JSON list. Failures are logged, never surfaced.
pub(crate) fn save_list<T: serde::Serialize>(backend: &dyn KeyValueStore, key: &str, list: &[T]) {
    let result = serde_json::to_string(list)
        .map_err(StoreError::from)
        .and_then(|json| backend.write(key, &json));
    if let Err(e) = result {
        log::error!("Failed to save '{key}': {e}");
    }
}

pub(crate) fn clear_key(backend: &dyn KeyValueStore, key: &str) {
    if let Err(e) = backend.remove(key) {
        log::error!("Failed to clear '{key}': {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn entry_ids_have_millis_and_base36_suffix() {
        let id = new_entry_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 9);
        assert!(suffix.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn corrupt_list_loads_as_empty() {
        let mem = MemoryStore::new();
        mem.write("k", "{not json").unwrap();
        let list: Vec<String> = load_list(&mem, "k");
        assert!(list.is_empty());
    }

    #[test]
    fn missing_list_loads_as_empty() {
        let mem = MemoryStore::new();
        let list: Vec<u32> = load_list(&mem, "absent");
        assert!(list.is_empty());
    }
}
