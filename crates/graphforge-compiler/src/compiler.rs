//! Schema compiler driver.
//!
//! Takes a fully-resolved [`SchemaConfiguration`], populates a type graph,
//! attaches root query fields for every exposed type, runs the plugin
//! pipeline, validates the result and freezes it into a [`CompiledSchema`].
//! Compiled schemas encode to [`SchemaArtifact`]s for persistence and load
//! back without recompiling.

use graphforge_model::{
    ArgumentDef, FieldDef, ModelBinding, ModelBindings, TypeDef, TypeGraph, TypeKind,
    TypeReference,
};
use graphforge_storage::{SchemaArtifact, SchemaEncoder, SchemaStorage};
use tracing::{debug, info, warn};

use crate::config::CompilerConfig;
use crate::context::BuildContext;
use crate::error::CompileError;
use crate::plugins::{PluginRegistry, PluginRequest};
use crate::resolvers::ResolverRegistry;

/// Name of the generated list query field for a type.
pub(crate) fn list_field_name(type_name: &str) -> String {
    format!("{type_name}List")
}

/// Everything the compiler needs for one schema: the types, their model
/// bindings, the per-type plugin requests (in application order) and the
/// set of types exposed through root query fields.
#[derive(Debug, Clone, Default)]
pub struct SchemaConfiguration {
    pub schema_key: String,
    pub types: Vec<TypeDef>,
    pub bindings: ModelBindings,
    /// Plugin requests per type, applied in the order given here.
    pub plugins: Vec<(String, Vec<PluginRequest>)>,
    /// Object types that get `{Type}` / `{Type}List` root query fields.
    pub expose: Vec<String>,
    /// Extra root mutation fields.
    pub mutations: Vec<FieldDef>,
}

impl SchemaConfiguration {
    pub fn new(schema_key: impl Into<String>) -> Self {
        Self {
            schema_key: schema_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, type_def: TypeDef) -> Self {
        self.types.push(type_def);
        self
    }

    #[must_use]
    pub fn with_binding(mut self, binding: ModelBinding) -> Self {
        self.bindings.insert(binding);
        self
    }

    /// Requests plugins for one type. Requests accumulate in call order.
    #[must_use]
    pub fn with_plugins(
        mut self,
        type_name: impl Into<String>,
        requests: impl IntoIterator<Item = PluginRequest>,
    ) -> Self {
        self.plugins
            .push((type_name.into(), requests.into_iter().collect()));
        self
    }

    /// Exposes a type through root query fields.
    #[must_use]
    pub fn expose(mut self, type_name: impl Into<String>) -> Self {
        self.expose.push(type_name.into());
        self
    }

    #[must_use]
    pub fn with_mutation(mut self, field: FieldDef) -> Self {
        self.mutations.push(field);
        self
    }
}

/// An immutable compiled schema, cheap to share behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    schema_key: String,
    graph: TypeGraph,
    queries: Vec<FieldDef>,
    mutations: Vec<FieldDef>,
}

impl CompiledSchema {
    pub fn schema_key(&self) -> &str {
        &self.schema_key
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Root query fields, in generation order.
    pub fn queries(&self) -> &[FieldDef] {
        &self.queries
    }

    /// Root mutation fields, in configuration order.
    pub fn mutations(&self) -> &[FieldDef] {
        &self.mutations
    }
}

/// The compiler itself: a plugin registry, a resolver registry and the
/// compile options. One instance serves any number of configurations.
pub struct SchemaCompiler {
    plugins: PluginRegistry,
    resolvers: ResolverRegistry,
    config: CompilerConfig,
}

impl SchemaCompiler {
    /// Creates a compiler with the built-in plugins registered.
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            plugins: PluginRegistry::with_built_ins(),
            resolvers: ResolverRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The plugin registry, for registering additional plugins.
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// The resolver registry, for registering providers.
    pub fn resolvers_mut(&mut self) -> &mut ResolverRegistry {
        &mut self.resolvers
    }

    /// Compiles a configuration into a frozen schema.
    ///
    /// # Errors
    ///
    /// [`CompileError::Configuration`] for an invalid configuration, any
    /// [`CompileError`] a plugin raises, and
    /// [`graphforge_model::ModelError`] violations found during the final
    /// graph validation. On error no partial result escapes.
    pub fn compile(
        &self,
        configuration: &SchemaConfiguration,
    ) -> Result<CompiledSchema, CompileError> {
        self.config.validate()?;
        if configuration.schema_key.is_empty() {
            return Err(CompileError::configuration("schema_key must not be empty"));
        }

        let mut graph = TypeGraph::new();
        for type_def in &configuration.types {
            if matches!(type_def.name(), "Query" | "Mutation") {
                return Err(CompileError::configuration(format!(
                    "{} is a reserved root type name",
                    type_def.name()
                )));
            }
            graph.add_type(type_def.clone())?;
        }

        self.discover_field_resolvers(&mut graph);
        self.attach_root_types(&mut graph, configuration)?;

        let ctx = BuildContext::new(
            &configuration.schema_key,
            &self.resolvers,
            &configuration.bindings,
            &self.config,
        );
        for (type_name, requests) in &configuration.plugins {
            self.plugins
                .apply_plugins(&mut graph, type_name, requests, &ctx)?;
        }

        graph.validate()?;
        let schema = Self::freeze(configuration.schema_key.clone(), graph);
        info!(
            schema_key = %schema.schema_key,
            types = schema.graph.len(),
            queries = schema.queries.len(),
            mutations = schema.mutations.len(),
            "Schema compiled"
        );
        Ok(schema)
    }

    /// Fills in resolvers for object fields that do not carry one.
    fn discover_field_resolvers(&self, graph: &mut TypeGraph) {
        let object_names: Vec<String> = graph
            .types()
            .filter(|t| t.kind() == TypeKind::Object)
            .map(|t| t.name().to_string())
            .collect();
        for type_name in object_names {
            let Some(type_def) = graph.get_mut(&type_name) else {
                continue;
            };
            let Some(fields) = type_def.fields_mut() else {
                continue;
            };
            for field in fields.values_mut() {
                if field.resolver.is_none() {
                    field.resolver =
                        Some(self.resolvers.find_resolver(&type_name, &field.name, None));
                }
            }
        }
    }

    /// Materializes the Query (and, if configured, Mutation) root types so
    /// that plugins can attach arguments to the generated fields.
    fn attach_root_types(
        &self,
        graph: &mut TypeGraph,
        configuration: &SchemaConfiguration,
    ) -> Result<(), CompileError> {
        let mut query = TypeDef::object("Query");
        for type_name in &configuration.expose {
            match graph.get(type_name) {
                Some(t) if t.kind() == TypeKind::Object => {}
                Some(t) => {
                    return Err(CompileError::configuration(format!(
                        "cannot expose {type_name}: expected an Object type, found {}",
                        t.kind().label()
                    )));
                }
                None => {
                    return Err(CompileError::configuration(format!(
                        "cannot expose {type_name}: type is not configured"
                    )));
                }
            }

            let read = FieldDef::new(type_name, TypeReference::named(type_name))
                .with_argument(ArgumentDef::new("id", TypeReference::required("ID")))
                .with_resolver(self.resolvers.find_resolver("Query", type_name, None));
            query.push_field(read)?;

            let list_name = list_field_name(type_name);
            let list = FieldDef::new(
                &list_name,
                TypeReference::list_of_required(type_name).into_required(),
            )
            .with_argument(
                ArgumentDef::new("_count", TypeReference::named("Int")).with_default(
                    serde_json::Value::from(self.config.default_list_page_size),
                ),
            )
            .with_argument(ArgumentDef::new("_offset", TypeReference::named("Int")))
            .with_resolver(self.resolvers.find_resolver("Query", &list_name, None));
            query.push_field(list)?;
            debug!(type_name, "Exposed type through root query fields");
        }
        graph.add_type(query)?;

        if !configuration.mutations.is_empty() {
            let mut mutation = TypeDef::object("Mutation");
            for field in &configuration.mutations {
                let mut field = field.clone();
                if field.resolver.is_none() {
                    field.resolver =
                        Some(self.resolvers.find_resolver("Mutation", &field.name, None));
                }
                mutation.push_field(field)?;
            }
            graph.add_type(mutation)?;
        }
        Ok(())
    }

    /// Extracts the root fields out of the graph and freezes the rest.
    fn freeze(schema_key: String, mut graph: TypeGraph) -> CompiledSchema {
        let queries = Self::take_root_fields(&mut graph, "Query");
        let mutations = Self::take_root_fields(&mut graph, "Mutation");
        CompiledSchema {
            schema_key,
            graph,
            queries,
            mutations,
        }
    }

    fn take_root_fields(graph: &mut TypeGraph, root: &str) -> Vec<FieldDef> {
        match graph.remove_type(root) {
            Some(type_def) => type_def
                .fields()
                .map(|fields| fields.values().cloned().collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Encodes a compiled schema into a persistable artifact.
    ///
    /// # Errors
    ///
    /// Fails all-or-nothing if any type or root field references a type
    /// the graph cannot resolve.
    pub fn compile_to_artifact(
        &self,
        schema: &CompiledSchema,
    ) -> Result<SchemaArtifact, CompileError> {
        let encoder = SchemaEncoder::new(&schema.schema_key, self.config.obfuscate_symbols);
        Ok(encoder.encode(&schema.graph, &schema.queries, &schema.mutations)?)
    }

    /// Reconstructs a compiled schema from a persisted artifact.
    pub fn decode_compiled(artifact: &SchemaArtifact) -> Result<CompiledSchema, CompileError> {
        let (graph, queries, mutations) = SchemaEncoder::decode(artifact)?;
        Ok(CompiledSchema {
            schema_key: artifact.schema_key.clone(),
            graph,
            queries,
            mutations,
        })
    }

    /// Loads a previously persisted schema, or compiles and persists one.
    ///
    /// A readable but undecodable artifact is logged and treated as
    /// absent; a fresh compile then overwrites it. The compile happens
    /// before `persist`, so a partial graph is never written.
    pub async fn ensure_compiled(
        &self,
        configuration: &SchemaConfiguration,
        storage: &dyn SchemaStorage,
    ) -> Result<CompiledSchema, CompileError> {
        if storage.exists().await {
            match storage.load().await {
                Ok(artifact) => {
                    debug!(schema_key = %artifact.schema_key, "Loaded persisted schema artifact");
                    match Self::decode_compiled(&artifact) {
                        Ok(schema) => return Ok(schema),
                        Err(error) => {
                            warn!(%error, "Persisted artifact failed to decode, recompiling");
                        }
                    }
                }
                Err(error) => {
                    warn!(%error, "Persisted artifact failed to load, recompiling");
                }
            }
        }

        let schema = self.compile(configuration)?;
        let artifact = self.compile_to_artifact(&schema)?;
        storage.persist(&artifact).await?;
        info!(schema_key = %schema.schema_key, "Compiled schema persisted");
        Ok(schema)
    }
}
