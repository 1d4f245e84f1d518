//! Document Index Adapters.

mod in_memory;

pub use in_memory::InMemoryDocumentIndex;
