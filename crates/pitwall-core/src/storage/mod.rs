use crate::error::StorageError;

pub mod config;
pub mod keys;
pub mod kv;

type Result<T> = std::result::Result<T, StorageError>;
