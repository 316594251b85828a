//! Template stores.

mod memory;

pub use memory::{InMemoryStore, TEMPLATE_EXTENSION};
