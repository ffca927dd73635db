//! Model bindings.
//!
//! A [`ModelBinding`] connects a graph Type to the external data-source
//! descriptor backing it (a table, collection or ORM class name) and lists
//! the native fields that source exposes. Bindings are owned by the schema
//! configuration layer; types themselves stay independent of any backing
//! store. Plugins consult bindings to decide which fields are filterable or
//! sortable, and the filter-path protocol resolves dotted paths through them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single field of the backing data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeField {
    pub name: String,
    /// Whether comparison filters may target this field.
    #[serde(default)]
    pub filterable: bool,
    /// Whether result ordering may target this field.
    #[serde(default)]
    pub sortable: bool,
    /// For relation fields, the graph type name of the target; `None` for
    /// scalar-valued fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl NativeField {
    /// A scalar-valued native field.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filterable: false,
            sortable: false,
            relation: None,
        }
    }

    /// A relation field targeting another graph type.
    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filterable: false,
            sortable: false,
            relation: Some(target.into()),
        }
    }

    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Whether this field points at another composite type.
    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

/// Binds one graph type to its backing data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBinding {
    pub type_name: String,
    /// External data-source descriptor, e.g. an ORM class or table name.
    pub source: String,
    /// Native fields keyed by field name, sorted for deterministic walks.
    pub native_fields: BTreeMap<String, NativeField>,
}

impl ModelBinding {
    pub fn new(type_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            source: source.into(),
            native_fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: NativeField) -> Self {
        self.native_fields.insert(field.name.clone(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&NativeField> {
        self.native_fields.get(name)
    }

    /// Whether any native field admits filtering.
    pub fn has_filterable_fields(&self) -> bool {
        self.native_fields.values().any(|f| f.filterable)
    }

    /// Whether any native field admits sorting.
    pub fn has_sortable_fields(&self) -> bool {
        self.native_fields.values().any(|f| f.sortable)
    }
}

/// Collection of bindings keyed by graph type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelBindings {
    bindings: BTreeMap<String, ModelBinding>,
}

impl ModelBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a binding, replacing any previous binding for the same type.
    pub fn insert(&mut self, binding: ModelBinding) {
        self.bindings.insert(binding.type_name.clone(), binding);
    }

    pub fn get(&self, type_name: &str) -> Option<&ModelBinding> {
        self.bindings.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.bindings.contains_key(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<ModelBinding> for ModelBindings {
    fn from_iter<I: IntoIterator<Item = ModelBinding>>(iter: I) -> Self {
        let mut out = Self::new();
        for binding in iter {
            out.insert(binding);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_binding() -> ModelBinding {
        ModelBinding::new("Product", "shop.Product")
            .with_field(NativeField::scalar("name").filterable().sortable())
            .with_field(NativeField::scalar("price").filterable())
            .with_field(NativeField::relation("category", "Category"))
    }

    #[test]
    fn test_binding_lookup() {
        let binding = product_binding();
        assert!(binding.field("name").unwrap().filterable);
        assert!(!binding.field("price").unwrap().sortable);
        assert!(binding.field("category").unwrap().is_relation());
        assert!(binding.field("missing").is_none());
    }

    #[test]
    fn test_filterable_and_sortable_flags() {
        let binding = product_binding();
        assert!(binding.has_filterable_fields());
        assert!(binding.has_sortable_fields());

        let bare = ModelBinding::new("Tag", "shop.Tag").with_field(NativeField::scalar("label"));
        assert!(!bare.has_filterable_fields());
        assert!(!bare.has_sortable_fields());
    }

    #[test]
    fn test_bindings_collection() {
        let bindings: ModelBindings = [product_binding()].into_iter().collect();
        assert!(bindings.contains("Product"));
        assert!(!bindings.contains("Category"));
        assert_eq!(bindings.len(), 1);
    }
}
