//! Error types for compilation.
//!
//! Every compile-aborting error names the offending type, field or plugin.
//! None of these are retried automatically: compilation is deterministic,
//! so a retry without a configuration fix would fail identically.

use thiserror::Error;

/// Errors that can occur while compiling a schema.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Type graph model violation (duplicate type, dangling reference, ...).
    #[error(transparent)]
    Model(#[from] graphforge_model::ModelError),

    /// Encoding or persistence failure.
    #[error(transparent)]
    Storage(#[from] graphforge_storage::StorageError),

    /// Two distinct plugin implementations registered under one identifier.
    #[error("plugin collision: {identifier} is already registered with a different implementation")]
    PluginCollision { identifier: String },

    /// A configured plugin identifier has no registered implementation.
    #[error("unknown plugin: {identifier}")]
    UnknownPlugin { identifier: String },

    /// A plugin precondition was not met by the target type.
    #[error("plugin {plugin} cannot apply to {type_name}: {message}")]
    InvariantViolation {
        plugin: String,
        type_name: String,
        message: String,
    },

    /// The nested input builder could not resolve a path to a backing field.
    #[error("unmappable path: {path} does not resolve to a backing-model field")]
    UnmappablePath { path: String },

    /// Input type derivation exceeded the configured nesting depth.
    #[error("input nesting depth exceeded at {path} (max {max})")]
    InputDepthExceeded { path: String, max: usize },

    /// A filter argument tree is malformed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Another build is in progress; the caller should retry.
    #[error("schema build in progress, retry later")]
    BuildInProgress,

    /// A previous build of this schema failed.
    #[error("schema build failed: {0}")]
    BuildFailed(String),

    /// The schema configuration itself is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CompileError {
    /// Create a new InvariantViolation error.
    pub fn invariant(
        plugin: impl Into<String>,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvariantViolation {
            plugin: plugin.into(),
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a new UnmappablePath error.
    pub fn unmappable(path: impl Into<String>) -> Self {
        Self::UnmappablePath { path: path.into() }
    }

    /// Create a new Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
