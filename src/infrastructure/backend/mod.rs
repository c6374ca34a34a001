//! Backend gateway adapters.

mod in_memory;

pub use in_memory::InMemoryBackend;
