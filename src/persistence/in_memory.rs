use super::*;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Fake in-memory store.
///
/// Useful for unit-tests, and the default when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<BTreeMap<Key, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> SharedStore {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Store for InMemoryStore {
    fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: Key, value: Value) -> Result<()> {
        self.entries.lock().insert(key, value);
        Ok(())
    }
}
