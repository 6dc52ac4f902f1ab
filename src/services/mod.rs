// External service integrations

pub mod storage;

pub use storage::{MediaObject, MediaService, MemoryObjectStore, ObjectStore, S3ObjectStore};
