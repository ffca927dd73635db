//! Resolver discovery.
//!
//! A resolver provider maps a (type, field) pair to a
//! [`ResolverReference`]; the registry consults providers in descending
//! priority order and falls back to a supplied default or the process-wide
//! fallback, so discovery is total: it always returns a reference.
//!
//! Discovery order is part of the compiled output. Providers are kept in
//! registration order and sorted with a stable sort at lookup time, so two
//! providers with equal priority resolve in registration order and repeated
//! compiles discover identical resolvers.

mod convention;

pub use convention::ConventionProvider;

use std::collections::BTreeMap;
use std::sync::Arc;

use graphforge_model::ResolverReference;
use tracing::trace;

/// A source of resolver references, consulted by naming convention or any
/// other strategy the provider implements.
pub trait ResolverProvider: Send + Sync {
    /// Returns a reference for the given type+field, or `None` when this
    /// provider has nothing to offer.
    fn resolver_method(&self, type_name: &str, field_name: &str) -> Option<ResolverReference>;

    /// Providers with higher priority are consulted first.
    fn priority(&self) -> i32;
}

/// A provider backed by an explicit (type, field) table.
///
/// Used for resolvers supplied directly by the schema configuration rather
/// than discovered by convention.
#[derive(Debug, Default)]
pub struct ExplicitProvider {
    entries: BTreeMap<(String, String), ResolverReference>,
    priority: i32,
}

impl ExplicitProvider {
    pub fn new(priority: i32) -> Self {
        Self {
            entries: BTreeMap::new(),
            priority,
        }
    }

    #[must_use]
    pub fn with_entry(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        reference: ResolverReference,
    ) -> Self {
        self.entries
            .insert((type_name.into(), field_name.into()), reference);
        self
    }
}

impl ResolverProvider for ExplicitProvider {
    fn resolver_method(&self, type_name: &str, field_name: &str) -> Option<ResolverReference> {
        self.entries
            .get(&(type_name.to_string(), field_name.to_string()))
            .cloned()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Priority-ordered set of resolver providers.
#[derive(Default)]
pub struct ResolverRegistry {
    /// Providers in registration order; sorted stably at lookup.
    providers: Vec<Arc<dyn ResolverProvider>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider. Registration order is the tie-break for
    /// providers sharing a priority.
    pub fn register(&mut self, provider: Arc<dyn ResolverProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Finds a resolver for the given type+field.
    ///
    /// Providers are consulted in descending priority; the first match
    /// wins. When nothing matches, the supplied `default` is returned, or
    /// the process-wide fallback if no default was given. This function is
    /// deterministic and total.
    pub fn find_resolver(
        &self,
        type_name: &str,
        field_name: &str,
        default: Option<ResolverReference>,
    ) -> ResolverReference {
        let mut ordered: Vec<&Arc<dyn ResolverProvider>> = self.providers.iter().collect();
        // Stable sort: equal priorities keep registration order.
        ordered.sort_by_key(|p| std::cmp::Reverse(p.priority()));

        for provider in ordered {
            if let Some(reference) = provider.resolver_method(type_name, field_name) {
                trace!(
                    type_name,
                    field_name,
                    resolver = %reference,
                    priority = provider.priority(),
                    "Resolver discovered"
                );
                return reference;
            }
        }

        default.unwrap_or_else(ResolverReference::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider {
        priority: i32,
        reference: ResolverReference,
    }

    impl ResolverProvider for FixedProvider {
        fn resolver_method(&self, _: &str, _: &str) -> Option<ResolverReference> {
            Some(self.reference.clone())
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    fn fixed(priority: i32, method: &str) -> Arc<dyn ResolverProvider> {
        Arc::new(FixedProvider {
            priority,
            reference: ResolverReference::new("resolvers", method),
        })
    }

    #[test]
    fn test_higher_priority_wins() {
        let mut registry = ResolverRegistry::new();
        registry.register(fixed(10, "low"));
        registry.register(fixed(100, "high"));

        let found = registry.find_resolver("Product", "name", None);
        assert_eq!(found.method(), "high");
    }

    #[test]
    fn test_equal_priority_resolves_by_registration_order() {
        let mut registry = ResolverRegistry::new();
        registry.register(fixed(50, "first"));
        registry.register(fixed(50, "second"));

        let found = registry.find_resolver("Product", "name", None);
        assert_eq!(found.method(), "first");
    }

    #[test]
    fn test_default_and_fallback() {
        let registry = ResolverRegistry::new();

        let default = ResolverReference::new("resolvers", "explicitDefault");
        let found = registry.find_resolver("Product", "name", Some(default.clone()));
        assert_eq!(found, default);

        let found = registry.find_resolver("Product", "name", None);
        assert_eq!(found, ResolverReference::fallback());
    }

    #[test]
    fn test_explicit_provider() {
        let provider = ExplicitProvider::new(100).with_entry(
            "Product",
            "name",
            ResolverReference::new("resolvers", "productName"),
        );

        assert!(provider.resolver_method("Product", "name").is_some());
        assert!(provider.resolver_method("Product", "price").is_none());

        let mut registry = ResolverRegistry::new();
        registry.register(Arc::new(provider));
        let found = registry.find_resolver("Product", "price", None);
        assert_eq!(found, ResolverReference::fallback());
    }
}
