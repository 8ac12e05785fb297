//! In-memory store
//!
//! This module provides a simple in-memory implementation
//! of the object store, mapping keys to entities.

use std::collections::HashMap;
use crate::core::entity::Entity;
use crate::core::errors::Result;
use crate::core::store::Store;

/// An in-memory object store
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Map of keys to entities
    data: HashMap<String, Entity>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        MemoryStore {
            data: HashMap::new(),
        }
    }
}

impl Store for MemoryStore {
    fn all(&self) -> Vec<&Entity> {
        let mut entities: Vec<(&String, &Entity)> = self.data.iter().collect();
        entities.sort_by(|(ka, a), (kb, b)| {
            a.created_at().cmp(&b.created_at()).then_with(|| ka.cmp(kb))
        });

        entities.into_iter().map(|(_, e)| e).collect()
    }

    fn register(&mut self, entity: Entity) {
        self.data.insert(entity.key(), entity);
    }

    fn get(&self, key: &str) -> Option<&Entity> {
        self.data.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.data.get_mut(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> Option<Entity> {
        self.data.remove(key)
    }

    fn count(&self) -> usize {
        self.data.len()
    }

    fn save(&self) -> Result<()> {
        // No-op for in-memory store
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}
