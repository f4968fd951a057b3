// storage/mod.rs - Key-value persistence backends

pub mod json_file;
pub mod kv;
pub mod memory;

pub use json_file::JsonFileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
