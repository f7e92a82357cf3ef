#![forbid(unsafe_code)]

pub mod bank;
pub mod profile;
pub mod repository;
pub mod sqlite;

pub use profile::ProfileStore;
pub use repository::{InMemoryRepository, KeyValueRepository, Storage, StorageError};
