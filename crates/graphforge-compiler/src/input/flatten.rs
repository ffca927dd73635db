//! Filter-path flattening.
//!
//! The inverse of the nested input builder: a nested filter argument value
//! (a tree keyed by field name whose leaves carry an operator suffix) is
//! flattened into `(dotted path, operator, value)` triples. The runtime
//! filter-application logic consumes the triples; [`resolve_paths`] checks
//! each one resolves to a concrete backing field through the model-binding
//! layer.

use graphforge_model::ModelBindings;
use serde_json::Value;

use super::{FILTER_SEPARATOR, FilterOperator};
use crate::error::CompileError;

/// One flattened filter triple.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// Dotted field path from the root type, e.g. `category.label`.
    pub path: String,
    pub op: FilterOperator,
    pub value: Value,
}

/// Flattens a nested filter argument tree.
///
/// Leaf keys carry the operator as a `__` suffix (`price__gte`); plain
/// keys descend into a nested object. Key order within one object follows
/// the JSON map order, so flattening is deterministic.
///
/// # Errors
///
/// [`CompileError::InvalidFilter`] for an unknown operator suffix, a
/// non-object value under a plain key, or a non-object root.
pub fn flatten_filter(tree: &Value) -> Result<Vec<FilterCondition>, CompileError> {
    let Value::Object(map) = tree else {
        return Err(CompileError::InvalidFilter(
            "filter argument must be an object".to_string(),
        ));
    };
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    walk(map, &mut prefix, &mut out)?;
    Ok(out)
}

fn walk(
    map: &serde_json::Map<String, Value>,
    prefix: &mut Vec<String>,
    out: &mut Vec<FilterCondition>,
) -> Result<(), CompileError> {
    for (key, value) in map {
        if let Some((field, op_str)) = key.rsplit_once(FILTER_SEPARATOR) {
            if field.is_empty() {
                return Err(CompileError::InvalidFilter(format!(
                    "malformed filter key {key:?}"
                )));
            }
            let Some(op) = FilterOperator::parse(op_str) else {
                return Err(CompileError::InvalidFilter(format!(
                    "unknown operator {op_str:?} in filter key {key:?}"
                )));
            };
            let path = join_path(prefix, field);
            out.push(FilterCondition {
                path,
                op,
                value: value.clone(),
            });
        } else {
            let Value::Object(nested) = value else {
                return Err(CompileError::InvalidFilter(format!(
                    "expected nested object under {:?}",
                    join_path(prefix, key)
                )));
            };
            prefix.push(key.clone());
            walk(nested, prefix, out)?;
            prefix.pop();
        }
    }
    Ok(())
}

fn join_path(prefix: &[String], last: &str) -> String {
    if prefix.is_empty() {
        last.to_string()
    } else {
        format!("{}.{last}", prefix.join("."))
    }
}

/// Checks every condition path against the model bindings, walking relation
/// fields segment by segment from `root_type`.
///
/// # Errors
///
/// [`CompileError::UnmappablePath`] naming the first path that does not end
/// on a concrete scalar backing field.
pub fn resolve_paths(
    conditions: &[FilterCondition],
    bindings: &ModelBindings,
    root_type: &str,
) -> Result<(), CompileError> {
    for condition in conditions {
        let mut current = root_type.to_string();
        let segments: Vec<&str> = condition.path.split('.').collect();
        for (index, segment) in segments.iter().enumerate() {
            let Some(binding) = bindings.get(&current) else {
                return Err(CompileError::unmappable(&condition.path));
            };
            let Some(native) = binding.field(segment) else {
                return Err(CompileError::unmappable(&condition.path));
            };
            let is_last = index == segments.len() - 1;
            match (&native.relation, is_last) {
                // Intermediate segments must traverse relations.
                (Some(target), false) => current = target.clone(),
                // The leaf must be a concrete scalar field.
                (None, true) => {}
                _ => return Err(CompileError::unmappable(&condition.path)),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphforge_model::{ModelBinding, NativeField};
    use serde_json::json;

    #[test]
    fn test_flatten_simple_leaves() {
        let tree = json!({
            "name__eq": "widget",
            "price__gte": 10.0,
        });
        let conditions = flatten_filter(&tree).unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].path, "name");
        assert_eq!(conditions[0].op, FilterOperator::Eq);
        assert_eq!(conditions[0].value, json!("widget"));
        assert_eq!(conditions[1].path, "price");
        assert_eq!(conditions[1].op, FilterOperator::Gte);
    }

    #[test]
    fn test_flatten_nested_paths() {
        let tree = json!({
            "category": {
                "label__contains": "tools",
                "parent": { "label__eq": "hardware" }
            },
            "name__ne": "legacy"
        });
        let conditions = flatten_filter(&tree).unwrap();
        let paths: Vec<&str> = conditions.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["category.label", "category.parent.label", "name"]
        );
    }

    #[test]
    fn test_flatten_rejects_unknown_operator() {
        let err = flatten_filter(&json!({"name__like": "x"})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilter(msg) if msg.contains("like")));
    }

    #[test]
    fn test_flatten_rejects_scalar_under_plain_key() {
        let err = flatten_filter(&json!({"category": "tools"})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilter(_)));
    }

    #[test]
    fn test_flatten_rejects_non_object_root() {
        assert!(flatten_filter(&json!(["a"])).is_err());
    }

    fn bindings() -> ModelBindings {
        [
            ModelBinding::new("Product", "shop.Product")
                .with_field(NativeField::scalar("name").filterable())
                .with_field(NativeField::relation("category", "Category").filterable()),
            ModelBinding::new("Category", "shop.Category")
                .with_field(NativeField::scalar("label").filterable()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolve_paths_accepts_valid() {
        let conditions = flatten_filter(&json!({
            "name__eq": "widget",
            "category": { "label__eq": "tools" }
        }))
        .unwrap();
        resolve_paths(&conditions, &bindings(), "Product").unwrap();
    }

    #[test]
    fn test_resolve_paths_rejects_unknown_leaf() {
        let conditions = flatten_filter(&json!({"price__eq": 3})).unwrap();
        let err = resolve_paths(&conditions, &bindings(), "Product").unwrap_err();
        assert!(matches!(err, CompileError::UnmappablePath { path } if path == "price"));
    }

    #[test]
    fn test_resolve_paths_rejects_operator_on_relation() {
        let conditions = flatten_filter(&json!({"category__eq": "tools"})).unwrap();
        let err = resolve_paths(&conditions, &bindings(), "Product").unwrap_err();
        assert!(matches!(err, CompileError::UnmappablePath { .. }));
    }

    #[test]
    fn test_resolve_paths_rejects_scalar_traversal() {
        let conditions = flatten_filter(&json!({"name": {"label__eq": "x"}})).unwrap();
        let err = resolve_paths(&conditions, &bindings(), "Product").unwrap_err();
        assert!(matches!(err, CompileError::UnmappablePath { path } if path == "name.label"));
    }
}
