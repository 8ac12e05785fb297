//! HBnB: an object console
//!
//! This crate provides a command interpreter managing users, places,
//! cities, states, reviews and amenities, backed by an object store
//! that keeps a JSON snapshot of every live object.

pub mod core;
pub mod storage;
pub mod console;

// Main types, re-exported for convenience
pub use crate::core::value::Value;
pub use crate::core::class::Class;
pub use crate::core::entity::Entity;
pub use crate::core::store::Store;
pub use crate::core::errors::{Result, StoreError};
pub use storage::{MemoryStore, PersistentStore};
pub use console::{CommandError, Console, Outcome};
