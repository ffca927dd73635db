//! Compiler configuration.
//!
//! This module provides configuration options for the schema compiler.
//! Configuration is typically specified in a `[compiler]` section of the
//! host application's TOML configuration.
//!
//! # Example Configuration
//!
//! ```toml
//! [compiler]
//! obfuscate_symbols = true
//! max_input_depth = 16
//! fail_on_unknown_plugin = true
//! default_list_page_size = 25
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Schema compiler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Replace logical type names with generated symbols in persisted
    /// artifacts. The logical names stay recoverable through the symbol
    /// table embedded in the artifact.
    /// Default: false
    #[serde(default = "default_obfuscate_symbols")]
    pub obfuscate_symbols: bool,

    /// Maximum nesting depth for derived input types. Cycle detection
    /// already prevents infinite descent; this bounds legitimate but
    /// excessively deep object graphs.
    /// Default: 16
    #[serde(default = "default_max_input_depth")]
    pub max_input_depth: usize,

    /// Abort compilation when a configured plugin identifier has no
    /// registered implementation. When false, unknown plugins are skipped
    /// with a warning.
    /// Default: true
    #[serde(default = "default_fail_on_unknown_plugin")]
    pub fail_on_unknown_plugin: bool,

    /// Default page size baked into the `_count` argument of generated
    /// list fields.
    /// Default: 25
    #[serde(default = "default_list_page_size")]
    pub default_list_page_size: u32,
}

fn default_obfuscate_symbols() -> bool {
    false
}

fn default_max_input_depth() -> usize {
    16
}

fn default_fail_on_unknown_plugin() -> bool {
    true
}

fn default_list_page_size() -> u32 {
    25
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            obfuscate_symbols: default_obfuscate_symbols(),
            max_input_depth: default_max_input_depth(),
            fail_on_unknown_plugin: default_fail_on_unknown_plugin(),
            default_list_page_size: default_list_page_size(),
        }
    }
}

impl CompilerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.max_input_depth == 0 {
            return Err(CompileError::configuration(
                "max_input_depth must be at least 1",
            ));
        }
        if self.default_list_page_size == 0 {
            return Err(CompileError::configuration(
                "default_list_page_size must be at least 1",
            ));
        }
        Ok(())
    }
}
