//! The type graph registry.
//!
//! [`TypeGraph`] holds every named type of one schema. Mutations during the
//! plugin pipeline may leave the graph temporarily inconsistent; referential
//! integrity is checked once, by [`TypeGraph::validate`], after the pipeline
//! has converged. Iteration order is sorted by type name so that repeated
//! compiles of the same configuration walk and encode the graph identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ModelError;
use crate::type_ref::TypeReference;
use crate::types::{TypeDef, is_valid_name};

/// Scalar names that are always resolvable without a graph entry.
pub const BUILT_IN_SCALARS: [&str; 5] = ["ID", "String", "Int", "Float", "Boolean"];

/// Checks whether a name is one of the built-in scalars.
pub fn is_built_in_scalar(name: &str) -> bool {
    BUILT_IN_SCALARS.contains(&name)
}

/// Registry of all named types in one schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    types: BTreeMap<String, TypeDef>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type to the graph.
    ///
    /// Re-adding a byte-identical definition is an idempotent no-op, so
    /// plugins may register the input types they derive without tracking
    /// whether an earlier pipeline run already did.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateType`] when a different definition is already
    /// registered under the same name, [`ModelError::InvalidName`] when the
    /// name is not a legal identifier.
    pub fn add_type(&mut self, type_def: TypeDef) -> Result<(), ModelError> {
        if !is_valid_name(type_def.name()) {
            return Err(ModelError::InvalidName(type_def.name().to_string()));
        }
        if let Some(existing) = self.types.get(type_def.name()) {
            if *existing == type_def {
                trace!(type_name = %type_def.name(), "Idempotent re-add of identical type");
                return Ok(());
            }
            return Err(ModelError::duplicate_type(type_def.name()));
        }
        trace!(type_name = %type_def.name(), kind = ?type_def.kind(), "Adding type");
        self.types.insert(type_def.name().to_string(), type_def);
        Ok(())
    }

    /// Returns a type by name.
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Returns a mutable type by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypeDef> {
        self.types.get_mut(name)
    }

    /// Removes a type, returning it if present.
    ///
    /// Removal is permitted even while other fields still reference the
    /// type; the inconsistency surfaces at [`validate`](Self::validate).
    pub fn remove_type(&mut self, name: &str) -> Option<TypeDef> {
        let removed = self.types.remove(name);
        if removed.is_some() {
            trace!(type_name = %name, "Removed type");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All types in deterministic (name-sorted) order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// All type names in deterministic order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether a reference target resolves against this graph.
    pub fn resolves(&self, reference: &TypeReference) -> bool {
        is_built_in_scalar(reference.base()) || self.contains(reference.base())
    }

    /// Validates the completed graph.
    ///
    /// Run once, after the plugin pipeline: checks that every field and
    /// argument reference resolves to a known type or built-in scalar, that
    /// union members and declared interfaces exist, and that all names are
    /// legal identifiers.
    ///
    /// # Errors
    ///
    /// [`ModelError::DanglingReference`] naming the offending field and
    /// target, or [`ModelError::InvalidName`].
    pub fn validate(&self) -> Result<(), ModelError> {
        debug!(type_count = self.types.len(), "Validating type graph");

        for type_def in self.types.values() {
            let type_name = type_def.name();

            if let Some(fields) = type_def.fields() {
                for field in fields.values() {
                    if !is_valid_name(&field.name) {
                        return Err(ModelError::InvalidName(format!(
                            "{type_name}.{}",
                            field.name
                        )));
                    }
                    if !self.resolves(&field.type_ref) {
                        return Err(ModelError::dangling_reference(
                            type_name,
                            &field.name,
                            field.type_ref.base(),
                        ));
                    }
                    for argument in &field.arguments {
                        if !self.resolves(&argument.type_ref) {
                            return Err(ModelError::dangling_reference(
                                type_name,
                                format!("{}({})", field.name, argument.name),
                                argument.type_ref.base(),
                            ));
                        }
                    }
                }
            }

            for member in type_def.interfaces() {
                if !self.contains(member) {
                    return Err(ModelError::dangling_reference(
                        type_name,
                        "<interfaces>",
                        member,
                    ));
                }
            }

            if let TypeDef::Union { members, .. } = type_def {
                for member in members {
                    if !self.contains(member) {
                        return Err(ModelError::dangling_reference(
                            type_name,
                            "<members>",
                            member,
                        ));
                    }
                }
            }
        }

        debug!("Type graph validation complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDef;

    fn object_with_field(name: &str, field: &str, target: &str) -> TypeDef {
        let mut obj = TypeDef::object(name);
        obj.push_field(FieldDef::new(field, TypeReference::named(target)))
            .unwrap();
        obj
    }

    #[test]
    fn test_add_and_get() {
        let mut graph = TypeGraph::new();
        graph.add_type(TypeDef::object("Product")).unwrap();
        assert!(graph.contains("Product"));
        assert_eq!(graph.get("Product").unwrap().name(), "Product");
        assert!(graph.get("Missing").is_none());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut graph = TypeGraph::new();
        graph
            .add_type(object_with_field("Product", "name", "String"))
            .unwrap();
        let err = graph
            .add_type(object_with_field("Product", "name", "Int"))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateType { .. }));
    }

    #[test]
    fn test_identical_re_add_is_idempotent() {
        let mut graph = TypeGraph::new();
        let obj = object_with_field("Product", "name", "String");
        graph.add_type(obj.clone()).unwrap();
        graph.add_type(obj).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_invalid_type_name_rejected() {
        let mut graph = TypeGraph::new();
        let err = graph.add_type(TypeDef::object("Bad-Name")).unwrap_err();
        assert!(matches!(err, ModelError::InvalidName(_)));
    }

    #[test]
    fn test_types_sorted_by_name() {
        let mut graph = TypeGraph::new();
        for name in ["Zeta", "Alpha", "Midway"] {
            graph.add_type(TypeDef::object(name)).unwrap();
        }
        let names: Vec<&str> = graph.type_names().collect();
        assert_eq!(names, vec!["Alpha", "Midway", "Zeta"]);
    }

    #[test]
    fn test_validate_accepts_built_in_scalars() {
        let mut graph = TypeGraph::new();
        graph
            .add_type(object_with_field("Product", "name", "String"))
            .unwrap();
        graph.validate().unwrap();
    }

    #[test]
    fn test_validate_reports_dangling_field() {
        let mut graph = TypeGraph::new();
        graph
            .add_type(object_with_field("Product", "category", "Category"))
            .unwrap();
        let err = graph.validate().unwrap_err();
        match err {
            ModelError::DanglingReference {
                type_name,
                field,
                target,
            } => {
                assert_eq!(type_name, "Product");
                assert_eq!(field, "category");
                assert_eq!(target, "Category");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_reports_dangling_argument() {
        let mut graph = TypeGraph::new();
        let mut obj = TypeDef::object("Query");
        obj.push_field(
            FieldDef::new("products", TypeReference::list("Product")).with_argument(
                crate::types::ArgumentDef::new("filter", TypeReference::named("ProductFilterInput")),
            ),
        )
        .unwrap();
        graph.add_type(obj).unwrap();
        graph.add_type(TypeDef::object("Product")).unwrap();

        let err = graph.validate().unwrap_err();
        assert!(matches!(err, ModelError::DanglingReference { field, .. } if field.contains("filter")));
    }

    #[test]
    fn test_remove_then_validate_detects_inconsistency() {
        let mut graph = TypeGraph::new();
        graph
            .add_type(object_with_field("Product", "category", "Category"))
            .unwrap();
        graph.add_type(TypeDef::object("Category")).unwrap();
        graph.validate().unwrap();

        // Removal succeeds at the model level; validation catches it.
        assert!(graph.remove_type("Category").is_some());
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_validate_union_members() {
        let mut graph = TypeGraph::new();
        graph.add_type(TypeDef::object("Book")).unwrap();
        graph
            .add_type(TypeDef::union("SearchResult", ["Book", "Movie"]))
            .unwrap();
        let err = graph.validate().unwrap_err();
        assert!(matches!(err, ModelError::DanglingReference { target, .. } if target == "Movie"));
    }

    #[test]
    fn test_mutually_recursive_types_validate() {
        let mut graph = TypeGraph::new();
        graph.add_type(object_with_field("A", "b", "B")).unwrap();
        graph.add_type(object_with_field("B", "a", "A")).unwrap();
        graph.validate().unwrap();
    }
}
