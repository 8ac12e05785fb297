pub mod value;
pub mod class;
pub mod entity;
pub mod store;
pub mod errors;


pub use value::Value;
pub use class::Class;
pub use entity::Entity;
pub use store::Store;
pub use errors::{Result, StoreError};
