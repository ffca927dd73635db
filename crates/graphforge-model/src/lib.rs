//! # graphforge-model
//!
//! Type graph model for the GraphForge schema compiler.
//!
//! This crate defines the in-memory representation of a compiled schema:
//! named types, their fields and arguments, type-reference expressions,
//! resolver references, and the bindings that connect graph types to an
//! external data source. It also implements whole-graph validation.
//!
//! ## Overview
//!
//! The central type is [`TypeGraph`], a registry of [`TypeDef`] entries keyed
//! by unique name. The graph is populated from a schema configuration,
//! mutated by the compiler's plugin pipeline, and validated once after the
//! pipeline completes. Between mutations the graph is allowed to be
//! temporarily inconsistent (e.g. a field may reference a type that has not
//! been added yet); [`TypeGraph::validate`] is the single point where
//! referential integrity is enforced.
//!
//! ## Example
//!
//! ```
//! use graphforge_model::{FieldDef, TypeDef, TypeGraph, TypeReference};
//!
//! let mut graph = TypeGraph::new();
//!
//! let mut product = TypeDef::object("Product");
//! product.push_field(FieldDef::new("name", TypeReference::parse("String!")?))?;
//! product.push_field(FieldDef::new(
//!     "relatedProducts",
//!     TypeReference::parse("[Product]")?,
//! ))?;
//!
//! graph.add_type(product)?;
//! graph.validate()?;
//! # Ok::<(), graphforge_model::ModelError>(())
//! ```

mod binding;
mod error;
mod graph;
mod resolver_ref;
mod type_ref;
mod types;

pub use binding::{ModelBinding, ModelBindings, NativeField};
pub use error::ModelError;
pub use graph::{BUILT_IN_SCALARS, TypeGraph, is_built_in_scalar};
pub use resolver_ref::ResolverReference;
pub use type_ref::TypeReference;
pub use types::{ArgumentDef, EnumValueDef, FieldDef, TypeDef, TypeKind, is_valid_name};

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
