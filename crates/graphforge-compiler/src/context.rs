//! The build context.
//!
//! One [`BuildContext`] is created per compile and discarded when the
//! compile finishes. It replaces shared static caches: everything a plugin
//! may consult (resolver discovery, model bindings, compiler options)
//! travels through this object instead of process-global state.

use graphforge_model::ModelBindings;

use crate::config::CompilerConfig;
use crate::resolvers::ResolverRegistry;

/// Read-only view of the compile environment handed to plugins.
///
/// Mutable access to the type graph is passed separately, so a plugin can
/// edit its target type while consulting bindings and resolver discovery
/// through this context.
pub struct BuildContext<'a> {
    /// Key of the schema being compiled.
    pub schema_key: &'a str,
    /// Resolver provider registry for discovery.
    pub resolvers: &'a ResolverRegistry,
    /// Bindings from graph types to their backing data sources.
    pub bindings: &'a ModelBindings,
    /// Compiler options.
    pub config: &'a CompilerConfig,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        schema_key: &'a str,
        resolvers: &'a ResolverRegistry,
        bindings: &'a ModelBindings,
        config: &'a CompilerConfig,
    ) -> Self {
        Self {
            schema_key,
            resolvers,
            bindings,
            config,
        }
    }
}
