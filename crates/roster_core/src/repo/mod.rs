//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value persistence contract consumed by services.
//! - Isolate SQLite and JSON encoding details from use-case orchestration.
//!
//! # Invariants
//! - Documents are stored whole under fixed keys.
//! - Corrupt persisted documents surface as `RepoError::InvalidData`.

pub mod document_store;
pub mod kv_repo;
