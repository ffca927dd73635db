//! The plugin pipeline.
//!
//! Plugins are named, idempotent transforms over the type graph: they add
//! fields, arguments, resolvers or derived types. Each one is registered
//! under a unique string identifier and applied in exactly the order the
//! schema configuration requests. The pipeline never persists a partial
//! graph: any plugin failure aborts the whole compile.

mod filter;
mod interface_fields;
mod order;

pub use filter::FilterPlugin;
pub use interface_fields::InterfaceFieldsPlugin;
pub use order::OrderPlugin;

use std::collections::BTreeMap;
use std::sync::Arc;

use graphforge_model::TypeGraph;
use tracing::{debug, warn};

use crate::context::BuildContext;
use crate::error::CompileError;

/// A named, idempotent transform over the type graph.
pub trait SchemaPlugin: Send + Sync {
    /// Unique identifier the configuration uses to request this plugin.
    fn identifier(&self) -> &str;

    /// Applies the transform to one target type.
    ///
    /// The plugin receives mutable access to the whole graph (it may derive
    /// and register new types) plus the read-only build context. If a
    /// precondition on the target type is not met, the plugin must fail
    /// with [`CompileError::InvariantViolation`].
    fn apply(
        &self,
        type_name: &str,
        graph: &mut TypeGraph,
        ctx: &BuildContext<'_>,
        config: &serde_json::Value,
    ) -> Result<(), CompileError>;
}

/// One plugin invocation requested by the schema configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PluginRequest {
    pub identifier: String,
    /// Plugin-specific configuration; `null` when the plugin needs none.
    #[serde(default)]
    pub config: serde_json::Value,
}

impl PluginRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            config: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }
}

/// Registry of plugins keyed by identifier.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Arc<dyn SchemaPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in plugins.
    pub fn with_built_ins() -> Self {
        let mut registry = Self::new();
        for plugin in [
            Arc::new(FilterPlugin) as Arc<dyn SchemaPlugin>,
            Arc::new(OrderPlugin),
            Arc::new(InterfaceFieldsPlugin),
        ] {
            // Built-in identifiers are distinct; registration cannot collide.
            let _ = registry.register(plugin);
        }
        registry
    }

    /// Registers a plugin.
    ///
    /// Re-registering the same instance is an idempotent no-op.
    ///
    /// # Errors
    ///
    /// [`CompileError::PluginCollision`] when a different implementation is
    /// already registered under the same identifier.
    pub fn register(&mut self, plugin: Arc<dyn SchemaPlugin>) -> Result<(), CompileError> {
        let identifier = plugin.identifier().to_string();
        if let Some(existing) = self.plugins.get(&identifier) {
            if Arc::ptr_eq(existing, &plugin) {
                return Ok(());
            }
            return Err(CompileError::PluginCollision { identifier });
        }
        self.plugins.insert(identifier, plugin);
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<dyn SchemaPlugin>> {
        self.plugins.get(identifier).cloned()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Runs the requested plugins against one type, in request order.
    ///
    /// # Errors
    ///
    /// [`CompileError::UnknownPlugin`] for an unregistered identifier when
    /// the configuration demands it, plus whatever the plugins themselves
    /// raise. Any error aborts the pipeline.
    pub fn apply_plugins(
        &self,
        graph: &mut TypeGraph,
        type_name: &str,
        requests: &[PluginRequest],
        ctx: &BuildContext<'_>,
    ) -> Result<(), CompileError> {
        for request in requests {
            match self.get(&request.identifier) {
                Some(plugin) => {
                    debug!(
                        plugin = %request.identifier,
                        type_name,
                        "Applying plugin"
                    );
                    plugin.apply(type_name, graph, ctx, &request.config)?;
                }
                None if ctx.config.fail_on_unknown_plugin => {
                    return Err(CompileError::UnknownPlugin {
                        identifier: request.identifier.clone(),
                    });
                }
                None => {
                    warn!(plugin = %request.identifier, type_name, "Skipping unknown plugin");
                }
            }
        }
        Ok(())
    }
}

/// Converts a camelCase or snake_case field name to the UPPER_SNAKE form
/// used for generated enum values.
pub(crate) fn to_upper_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_uppercase());
    }
    out
}
