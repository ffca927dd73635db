//! Recursive input type derivation.
//!
//! The builder walks an output type graph from a root type and derives one
//! `{Type}FilterInput` per reachable composite type, memoizing by output
//! type name. An explicit in-progress set detects cycles: when a relation
//! targets a type whose input is still being built, the field references
//! the in-progress input by name instead of recursing, which yields a
//! self-referential input type in bounded time.

use std::collections::{BTreeMap, BTreeSet};

use graphforge_model::{
    FieldDef, ModelBindings, NativeField, TypeDef, TypeGraph, TypeReference,
};
use tracing::{debug, trace};

use super::{FILTER_SEPARATOR, FilterOperator};
use crate::error::CompileError;

/// Result of one builder run: the root input type name and every input
/// type created along the way, ready to be added to the graph.
#[derive(Debug)]
pub struct InputBuild {
    pub root_input: String,
    pub types: Vec<TypeDef>,
}

/// Derives nested filter input types from an output type graph.
pub struct NestedInputBuilder<'a> {
    graph: &'a TypeGraph,
    bindings: &'a ModelBindings,
    predicate: &'a dyn Fn(&NativeField) -> bool,
    max_depth: usize,
    /// Output type name -> finished input type name.
    built: BTreeMap<String, String>,
    /// Output type names currently on the recursion stack.
    in_progress: BTreeMap<String, String>,
    created: Vec<TypeDef>,
}

impl<'a> NestedInputBuilder<'a> {
    /// Creates a builder over a read-only view of the graph.
    ///
    /// The `predicate` decides which native fields participate; typically
    /// "is filterable" for filter inputs.
    pub fn new(
        graph: &'a TypeGraph,
        bindings: &'a ModelBindings,
        predicate: &'a dyn Fn(&NativeField) -> bool,
        max_depth: usize,
    ) -> Self {
        Self {
            graph,
            bindings,
            predicate,
            max_depth,
            built: BTreeMap::new(),
            in_progress: BTreeMap::new(),
            created: Vec::new(),
        }
    }

    /// Builds the input type graph reachable from `root_type`.
    ///
    /// # Errors
    ///
    /// [`CompileError::UnmappablePath`] when a relation passes the predicate
    /// but its target type has no model binding,
    /// [`CompileError::InputDepthExceeded`] past the configured depth.
    pub fn build(mut self, root_type: &str) -> Result<InputBuild, CompileError> {
        let mut path = vec![root_type.to_string()];
        let root_input = self.build_for(root_type, &mut path, 0)?;
        debug!(
            root_type,
            root_input = %root_input,
            created = self.created.len(),
            "Derived nested input types"
        );
        Ok(InputBuild {
            root_input,
            types: self.created,
        })
    }

    fn build_for(
        &mut self,
        type_name: &str,
        path: &mut Vec<String>,
        depth: usize,
    ) -> Result<String, CompileError> {
        if let Some(done) = self.built.get(type_name) {
            return Ok(done.clone());
        }
        // Cycle: the target is on the current recursion stack. Reference
        // its input type by name instead of descending again.
        if let Some(pending) = self.in_progress.get(type_name) {
            trace!(type_name, "Cycle detected, reusing in-progress input type");
            return Ok(pending.clone());
        }
        if depth > self.max_depth {
            return Err(CompileError::InputDepthExceeded {
                path: path.join("."),
                max: self.max_depth,
            });
        }

        let Some(binding) = self.bindings.get(type_name) else {
            return Err(CompileError::unmappable(path.join(".")));
        };
        let Some(type_def) = self.graph.get(type_name).filter(|t| t.fields().is_some()) else {
            return Err(CompileError::unmappable(path.join(".")));
        };

        let input_name = format!("{type_name}FilterInput");
        trace!(type_name, input_name = %input_name, depth, "Building input type");
        self.in_progress
            .insert(type_name.to_string(), input_name.clone());

        let mut input = TypeDef::input(&input_name)
            .with_description(format!("Filter input derived from {type_name}"));
        let mut seen_leaves: BTreeSet<String> = BTreeSet::new();

        for field in type_def.fields().into_iter().flatten().map(|(_, f)| f) {
            let Some(native) = binding.field(&field.name) else {
                // Not backed by the data source: nothing to filter on.
                continue;
            };
            if !(self.predicate)(native) {
                continue;
            }

            if let Some(target) = &native.relation {
                path.push(field.name.clone());
                let nested_input = self.build_for(target, path, depth + 1)?;
                path.pop();
                input.push_field(FieldDef::new(
                    &field.name,
                    TypeReference::named(nested_input),
                ))?;
            } else {
                let base = field.type_ref.base();
                for op in FilterOperator::for_scalar(base) {
                    let leaf = format!("{}{FILTER_SEPARATOR}{op}", field.name);
                    if !seen_leaves.insert(leaf.clone()) {
                        continue;
                    }
                    let type_ref = if *op == FilterOperator::In {
                        TypeReference::list_of_required(base)
                    } else {
                        TypeReference::named(base)
                    };
                    input.push_field(FieldDef::new(leaf, type_ref))?;
                }
            }
        }

        // Input types need at least one field to be usable downstream.
        if input.fields().is_none_or(|f| f.is_empty()) {
            input.push_field(
                FieldDef::new("_placeholder", TypeReference::named("Boolean"))
                    .with_description("Placeholder field - no filterable fields on this type"),
            )?;
        }

        self.in_progress.remove(type_name);
        self.built
            .insert(type_name.to_string(), input_name.clone());
        self.created.push(input);
        Ok(input_name)
    }
}
