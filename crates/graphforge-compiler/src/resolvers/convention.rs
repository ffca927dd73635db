//! Convention-based resolver discovery.
//!
//! A [`ConventionProvider`] represents one exported resolver module (the
//! owner) together with the method names it declares. Matching tries, in
//! order: the exact `{type}{field}` method, the `{type}` type-level
//! catch-all, then the provider-level catch-all. This order, combined with
//! provider priority, is the full resolution algorithm and must stay fixed
//! for reproducible builds.

use std::collections::BTreeSet;

use graphforge_model::ResolverReference;

use super::ResolverProvider;

/// Provider that matches resolver methods by naming convention.
#[derive(Debug, Clone)]
pub struct ConventionProvider {
    owner: String,
    methods: BTreeSet<String>,
    catch_all: Option<String>,
    priority: i32,
}

impl ConventionProvider {
    pub fn new(owner: impl Into<String>, priority: i32) -> Self {
        Self {
            owner: owner.into(),
            methods: BTreeSet::new(),
            catch_all: None,
            priority,
        }
    }

    /// Declares method names exported by the owner.
    #[must_use]
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.methods.extend(methods.into_iter().map(Into::into));
        self
    }

    /// Declares a provider-level catch-all method, matched when neither the
    /// `{type}{field}` nor the `{type}` convention applies.
    #[must_use]
    pub fn with_catch_all(mut self, method: impl Into<String>) -> Self {
        self.catch_all = Some(method.into());
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl ResolverProvider for ConventionProvider {
    fn resolver_method(&self, type_name: &str, field_name: &str) -> Option<ResolverReference> {
        // 1. Exact {type}{field} method.
        let exact = format!("{type_name}{field_name}");
        if self.methods.contains(&exact) {
            return Some(ResolverReference::new(&self.owner, exact));
        }
        // 2. {type}-only type-level catch-all.
        if self.methods.contains(type_name) {
            return Some(ResolverReference::new(&self.owner, type_name));
        }
        // 3. Provider-level catch-all.
        self.catch_all
            .as_ref()
            .map(|method| ResolverReference::new(&self.owner, method))
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ConventionProvider {
        ConventionProvider::new("shop_resolvers", 100)
            .with_methods(["Productname", "Product", "Categorylabel"])
            .with_catch_all("anyField")
    }

    #[test]
    fn test_exact_match_preferred() {
        let found = provider().resolver_method("Product", "name").unwrap();
        assert_eq!(found.method(), "Productname");
        assert_eq!(found.owner(), "shop_resolvers");
    }

    #[test]
    fn test_type_level_match() {
        let found = provider().resolver_method("Product", "price").unwrap();
        assert_eq!(found.method(), "Product");
    }

    #[test]
    fn test_catch_all_match() {
        let found = provider().resolver_method("Order", "total").unwrap();
        assert_eq!(found.method(), "anyField");
    }

    #[test]
    fn test_no_catch_all_yields_none() {
        let bare = ConventionProvider::new("shop_resolvers", 100).with_methods(["Product"]);
        assert!(bare.resolver_method("Order", "total").is_none());
    }
}
