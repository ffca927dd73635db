//! # graphforge-storage
//!
//! Artifact encoding and persistence for the GraphForge schema compiler.
//!
//! This crate defines the persistable form of a compiled type graph and the
//! contract any storage backend must satisfy. It does not compile schemas;
//! that is the job of `graphforge-compiler`, which hands a finished graph to
//! [`SchemaEncoder`] and the resulting [`SchemaArtifact`] to a
//! [`SchemaStorage`] implementation.
//!
//! ## Overview
//!
//! The main trait is [`SchemaStorage`], which defines the contract for:
//! - `persist` - all-or-nothing write of an encoded artifact
//! - `exists` - cheap presence check, no full decode
//! - `load` - read the artifact back for execution without recompiling
//!
//! ## Example
//!
//! ```ignore
//! use graphforge_storage::{FileStorage, SchemaEncoder, SchemaStorage};
//!
//! let encoder = SchemaEncoder::new("shop", true);
//! let artifact = encoder.encode(&graph, queries, mutations)?;
//!
//! let storage = FileStorage::new("/var/cache/graphforge/shop.json");
//! if !storage.exists().await {
//!     storage.persist(&artifact).await?;
//! }
//! let loaded = storage.load().await?;
//! ```
//!
//! ## Storage Backends
//!
//! [`FileStorage`] persists the artifact as JSON with a write-to-temp-then-
//! rename discipline, so a cancelled build never leaves a half-written
//! usable artifact. [`MemoryStorage`] keeps the artifact in an in-process
//! slot for embedded use and tests. Both are safe for concurrent readers.

mod artifact;
mod encoder;
mod error;
mod file;
mod memory;
mod symbols;
mod traits;

pub use artifact::{
    EncodedArgument, EncodedField, EncodedResolver, EncodedType, FORMAT_VERSION, SchemaArtifact,
};
pub use encoder::SchemaEncoder;
pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use symbols::SymbolTable;
pub use traits::SchemaStorage;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
