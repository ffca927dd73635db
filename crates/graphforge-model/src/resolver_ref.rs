//! Resolver references.
//!
//! A [`ResolverReference`] names a callable unit without holding it: the
//! pair of owner identifier (an exported module, registry or class name)
//! and method identifier. References are plain comparable values so the
//! compiler can deduplicate them and the encoder can persist them. When a
//! resolver must be reconstructed at load time (e.g. it closes over
//! request-scoped state), the reference carries a serializable factory
//! context instead of the callable itself.

use serde::{Deserialize, Serialize};

/// Owner identifier of the process-wide fallback resolver.
pub const FALLBACK_OWNER: &str = "graphforge_runtime";
/// Method identifier of the process-wide fallback resolver.
pub const FALLBACK_METHOD: &str = "default_resolver";

/// Identifies a callable bound to a type+field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolverReference {
    owner: String,
    method: String,
    /// Serializable context for factory-constructed resolvers. `None` for
    /// direct exported callables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<serde_json::Value>,
}

impl ResolverReference {
    /// A reference to a directly exported callable.
    pub fn new(owner: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            method: method.into(),
            context: None,
        }
    }

    /// A reference reconstructed at load time by invoking a factory with
    /// the given context.
    pub fn factory(
        owner: impl Into<String>,
        method: impl Into<String>,
        context: serde_json::Value,
    ) -> Self {
        Self {
            owner: owner.into(),
            method: method.into(),
            context: Some(context),
        }
    }

    /// The process-wide fallback resolver used when discovery finds nothing
    /// and no default was supplied.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_OWNER, FALLBACK_METHOD)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn context(&self) -> Option<&serde_json::Value> {
        self.context.as_ref()
    }

    /// Whether this reference requires factory reconstruction.
    pub fn is_factory(&self) -> bool {
        self.context.is_some()
    }
}

impl std::fmt::Display for ResolverReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.owner, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_for_deduplication() {
        let a = ResolverReference::new("resolvers", "productName");
        let b = ResolverReference::new("resolvers", "productName");
        let c = ResolverReference::new("resolvers", "productPrice");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_factory_context_distinguishes() {
        let direct = ResolverReference::new("resolvers", "related");
        let fac = ResolverReference::factory(
            "resolvers",
            "related",
            serde_json::json!({"depth": 2}),
        );
        assert_ne!(direct, fac);
        assert!(fac.is_factory());
        assert!(!direct.is_factory());
    }

    #[test]
    fn test_fallback() {
        let f = ResolverReference::fallback();
        assert_eq!(f.owner(), FALLBACK_OWNER);
        assert_eq!(f.method(), FALLBACK_METHOD);
        assert_eq!(f.to_string(), "graphforge_runtime::default_resolver");
    }
}
