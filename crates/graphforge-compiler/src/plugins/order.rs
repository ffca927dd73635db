//! The `order` plugin.
//!
//! Derives a `{Type}OrderField` enum from the sortable fields of the model
//! binding and attaches an `orderBy` argument to the list query field.

use graphforge_model::{ArgumentDef, TypeDef, TypeGraph, TypeReference};
use tracing::debug;

use super::{SchemaPlugin, to_upper_snake};
use crate::compiler::list_field_name;
use crate::context::BuildContext;
use crate::error::CompileError;

/// Plugin identifier: `order`.
pub struct OrderPlugin;

const IDENTIFIER: &str = "order";

impl SchemaPlugin for OrderPlugin {
    fn identifier(&self) -> &str {
        IDENTIFIER
    }

    fn apply(
        &self,
        type_name: &str,
        graph: &mut TypeGraph,
        ctx: &BuildContext<'_>,
        _config: &serde_json::Value,
    ) -> Result<(), CompileError> {
        let Some(binding) = ctx.bindings.get(type_name) else {
            return Err(CompileError::invariant(
                IDENTIFIER,
                type_name,
                "type has no model binding",
            ));
        };
        if !binding.has_sortable_fields() {
            return Err(CompileError::invariant(
                IDENTIFIER,
                type_name,
                "backing data source has no sortable fields",
            ));
        }

        let mut values = Vec::new();
        for native in binding.native_fields.values() {
            if !native.sortable || native.is_relation() {
                continue;
            }
            let stem = to_upper_snake(&native.name);
            values.push(format!("{stem}_ASC"));
            values.push(format!("{stem}_DESC"));
        }
        let value_count = values.len();

        let enum_name = format!("{type_name}OrderField");
        graph.add_type(TypeDef::enumeration(&enum_name, values))?;

        let list_field = list_field_name(type_name);
        let query = graph.get_mut("Query").ok_or_else(|| {
            CompileError::invariant(IDENTIFIER, type_name, "schema has no query root")
        })?;
        let Some(field) = query.field_mut(&list_field) else {
            return Err(CompileError::invariant(
                IDENTIFIER,
                type_name,
                format!("type is not exposed as a list query ({list_field} missing)"),
            ));
        };
        field.set_argument(ArgumentDef::new(
            "orderBy",
            TypeReference::list_of_required(&enum_name),
        ));

        debug!(type_name, %enum_name, values = value_count, "Attached orderBy argument");
        Ok(())
    }
}
