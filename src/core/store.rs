use crate::core::entity::Entity;
use crate::core::errors::Result;

/// Trait defining the core operations of an object store
pub trait Store: Send + Sync {
    /// All live entities, oldest first
    fn all(&self) -> Vec<&Entity>;

    /// Register a freshly created entity under its key
    fn register(&mut self, entity: Entity);

    /// Get the entity stored under a key
    fn get(&self, key: &str) -> Option<&Entity>;

    /// Get a mutable reference to the entity stored under a key
    fn get_mut(&mut self, key: &str) -> Option<&mut Entity>;

    /// Check if a key exists in the store
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove the entity stored under a key
    fn remove(&mut self, key: &str) -> Option<Entity>;

    /// Count the number of live entities
    fn count(&self) -> usize;

    /// Write the whole population to the snapshot (no-op for in-memory stores)
    fn save(&self) -> Result<()>;

    /// Replace the population with the snapshot contents, if one exists
    fn reload(&mut self) -> Result<()>;
}
