//! # graphforge-compiler
//!
//! The GraphForge schema compiler.
//!
//! This crate compiles a declarative schema configuration into an executable
//! type graph and, optionally, a persisted artifact that later runs load
//! without repeating the compilation. It provides:
//!
//! - Resolver discovery through prioritized provider registries
//! - A plugin pipeline that mutates the type graph in a deterministic order
//! - A recursive nested-input-type builder for filter/sort arguments over
//!   deeply nested (and cyclic) object graphs
//! - Filter-path flattening for the runtime filter-application protocol
//! - A lazy, thread-safe compiled-schema cache
//!
//! ## Overview
//!
//! A [`SchemaConfiguration`] is an opaque, fully-resolved input: the types,
//! model bindings, ordered plugin requests and exposed root types of one
//! schema, identified by its schema key. [`SchemaCompiler::compile`] turns
//! it into a frozen [`CompiledSchema`]; [`SchemaCompiler::ensure_compiled`]
//! short-circuits through a [`SchemaStorage`](graphforge_storage::SchemaStorage)
//! backend when a valid artifact is already present.
//!
//! Compilation is a single-threaded, read-then-write-once batch process.
//! Independent schema keys may compile in parallel as long as each writes
//! to a distinct storage location. The resulting [`CompiledSchema`] is
//! immutable and safe for unlimited concurrent read-only use.
//!
//! ## Modules
//!
//! - [`config`] - Compiler configuration options
//! - [`resolvers`] - Resolver references, providers and discovery
//! - [`plugins`] - Plugin contract, registry and built-in plugins
//! - [`input`] - Nested input builder and filter-path flattening
//! - [`compiler`] - The compiler driver
//! - [`cache`] - Lazy compiled-schema cache
//! - [`error`] - Error types for compilation

pub mod cache;
pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod plugins;
pub mod resolvers;

// Re-export main types
pub use cache::{CacheState, SchemaCache};
pub use compiler::{CompiledSchema, SchemaCompiler, SchemaConfiguration};
pub use config::CompilerConfig;
pub use context::BuildContext;
pub use error::CompileError;
pub use input::{FilterCondition, FilterOperator, NestedInputBuilder, flatten_filter};
pub use plugins::{PluginRegistry, PluginRequest, SchemaPlugin};
pub use resolvers::{ConventionProvider, ExplicitProvider, ResolverProvider, ResolverRegistry};

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
