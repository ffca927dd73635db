//! The `filter` plugin.
//!
//! Derives nested filter input types for a target type and attaches a
//! `filter` argument to its generated list query field. The target must be
//! backed by a model binding with at least one filterable field.

use std::collections::BTreeSet;

use graphforge_model::{ArgumentDef, NativeField, TypeGraph, TypeReference};
use tracing::debug;

use super::SchemaPlugin;
use crate::compiler::list_field_name;
use crate::context::BuildContext;
use crate::error::CompileError;
use crate::input::NestedInputBuilder;

/// Plugin identifier: `filter`.
pub struct FilterPlugin;

const IDENTIFIER: &str = "filter";

impl FilterPlugin {
    /// Parses the optional `fields` allow-list from the plugin config.
    fn allow_list(config: &serde_json::Value) -> Result<Option<BTreeSet<String>>, CompileError> {
        match config {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(map) => match map.get("fields") {
                None => Ok(None),
                Some(serde_json::Value::Array(entries)) => {
                    let mut allow = BTreeSet::new();
                    for entry in entries {
                        let Some(name) = entry.as_str() else {
                            return Err(CompileError::configuration(
                                "filter plugin: fields entries must be strings",
                            ));
                        };
                        allow.insert(name.to_string());
                    }
                    Ok(Some(allow))
                }
                Some(_) => Err(CompileError::configuration(
                    "filter plugin: fields must be an array",
                )),
            },
            _ => Err(CompileError::configuration(
                "filter plugin: config must be an object",
            )),
        }
    }
}

impl SchemaPlugin for FilterPlugin {
    fn identifier(&self) -> &str {
        IDENTIFIER
    }

    fn apply(
        &self,
        type_name: &str,
        graph: &mut TypeGraph,
        ctx: &BuildContext<'_>,
        config: &serde_json::Value,
    ) -> Result<(), CompileError> {
        let Some(binding) = ctx.bindings.get(type_name) else {
            return Err(CompileError::invariant(
                IDENTIFIER,
                type_name,
                "type has no model binding",
            ));
        };
        if !binding.has_filterable_fields() {
            return Err(CompileError::invariant(
                IDENTIFIER,
                type_name,
                "backing data source has no filterable fields",
            ));
        }

        let allow = Self::allow_list(config)?;
        let predicate = move |native: &NativeField| {
            native.filterable && allow.as_ref().is_none_or(|a| a.contains(&native.name))
        };

        let build = NestedInputBuilder::new(
            graph,
            ctx.bindings,
            &predicate,
            ctx.config.max_input_depth,
        )
        .build(type_name)?;

        let type_count = build.types.len();
        for input_type in build.types {
            graph.add_type(input_type)?;
        }

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
            "filter",
            TypeReference::named(&build.root_input),
        ));

        debug!(
            type_name,
            root_input = %build.root_input,
            derived_types = type_count,
            "Attached filter argument"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::resolvers::ResolverRegistry;
    use graphforge_model::{FieldDef, ModelBinding, ModelBindings, TypeDef};

    fn graph_with_query() -> TypeGraph {
        let mut graph = TypeGraph::new();

        let mut product = TypeDef::object("Product");
        product
            .push_field(FieldDef::new("name", TypeReference::named("String")))
            .unwrap();
        product
            .push_field(FieldDef::new("price", TypeReference::named("Float")))
            .unwrap();
        graph.add_type(product).unwrap();

        let mut query = TypeDef::object("Query");
        query
            .push_field(FieldDef::new(
                "ProductList",
                TypeReference::list_of_required("Product").into_required(),
            ))
            .unwrap();
        graph.add_type(query).unwrap();
        graph
    }

    fn bindings() -> ModelBindings {
        [ModelBinding::new("Product", "shop.Product")
            .with_field(NativeField::scalar("name").filterable())
            .with_field(NativeField::scalar("price").filterable())]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_attaches_filter_argument() {
        let mut graph = graph_with_query();
        let bindings = bindings();
        let resolvers = ResolverRegistry::new();
        let config = CompilerConfig::default();
        let ctx = BuildContext::new("shop", &resolvers, &bindings, &config);

        FilterPlugin
            .apply("Product", &mut graph, &ctx, &serde_json::Value::Null)
            .unwrap();

        assert!(graph.contains("ProductFilterInput"));
        let arg = graph
            .get("Query")
            .and_then(|q| q.field("ProductList"))
            .and_then(|f| f.argument("filter"))
            .unwrap();
        assert_eq!(arg.type_ref.base(), "ProductFilterInput");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut graph = graph_with_query();
        let bindings = bindings();
        let resolvers = ResolverRegistry::new();
        let config = CompilerConfig::default();
        let ctx = BuildContext::new("shop", &resolvers, &bindings, &config);

        FilterPlugin
            .apply("Product", &mut graph, &ctx, &serde_json::Value::Null)
            .unwrap();
        let before = graph.clone();
        FilterPlugin
            .apply("Product", &mut graph, &ctx, &serde_json::Value::Null)
            .unwrap();
        assert_eq!(graph, before);
    }

    #[test]
    fn test_allow_list_restricts_leaves() {
        let mut graph = graph_with_query();
        let bindings = bindings();
        let resolvers = ResolverRegistry::new();
        let config = CompilerConfig::default();
        let ctx = BuildContext::new("shop", &resolvers, &bindings, &config);

        FilterPlugin
            .apply(
                "Product",
                &mut graph,
                &ctx,
                &serde_json::json!({"fields": ["name"]}),
            )
            .unwrap();

        let input = graph.get("ProductFilterInput").unwrap();
        assert!(input.field("name__eq").is_some());
        assert!(input.field("price__eq").is_none());
    }

    #[test]
    fn test_unbound_type_violates_invariant() {
        let mut graph = graph_with_query();
        let bindings = ModelBindings::new();
        let resolvers = ResolverRegistry::new();
        let config = CompilerConfig::default();
        let ctx = BuildContext::new("shop", &resolvers, &bindings, &config);

        let err = FilterPlugin
            .apply("Product", &mut graph, &ctx, &serde_json::Value::Null)
            .unwrap_err();
        assert!(matches!(err, CompileError::InvariantViolation { .. }));
    }

    #[test]
    fn test_unexposed_type_violates_invariant() {
        let mut graph = graph_with_query();
        graph.get_mut("Query").unwrap().fields_mut().unwrap().clear();
        let bindings = bindings();
        let resolvers = ResolverRegistry::new();
        let config = CompilerConfig::default();
        let ctx = BuildContext::new("shop", &resolvers, &bindings, &config);

        let err = FilterPlugin
            .apply("Product", &mut graph, &ctx, &serde_json::Value::Null)
            .unwrap_err();
        assert!(
            matches!(err, CompileError::InvariantViolation { message, .. } if message.contains("list query"))
        );
    }
}
