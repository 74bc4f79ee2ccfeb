//! In-memory implementations of the collaborator ports.

pub mod content;
pub mod memory_store;

pub use content::InMemoryContentStore;
pub use memory_store::InMemoryStore;
