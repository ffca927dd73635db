//! Lazy compiled-schema cache.
//!
//! `SchemaCache` defers compilation until first access, so a host process
//! can start serving before its schemas are built. Concurrent access
//! during a build and hot-reload through `invalidate()` are handled here.

use std::sync::Arc;

use graphforge_storage::SchemaStorage;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::compiler::{CompiledSchema, SchemaCompiler, SchemaConfiguration};
use crate::error::CompileError;

/// State of the cached schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Schema has not been compiled yet.
    Uninitialized,
    /// Schema is currently compiling.
    Building,
    /// Schema is ready for use.
    Ready,
    /// The last compile failed.
    Failed,
}

/// Thread-safe lazy holder for one compiled schema.
///
/// The first access compiles (or loads from storage) and caches the
/// result; later accesses are a read-lock clone of an `Arc`.
pub struct SchemaCache {
    /// The cached schema (None if not compiled yet or invalidated).
    schema: RwLock<Option<Arc<CompiledSchema>>>,

    /// Build lock to ensure only one compile at a time.
    build_lock: Mutex<()>,

    state: RwLock<CacheState>,

    compiler: Arc<SchemaCompiler>,
    configuration: SchemaConfiguration,
    storage: Arc<dyn SchemaStorage>,

    /// Last compile error message (for diagnostics).
    last_error: RwLock<Option<String>>,
}

impl SchemaCache {
    #[must_use]
    pub fn new(
        compiler: Arc<SchemaCompiler>,
        configuration: SchemaConfiguration,
        storage: Arc<dyn SchemaStorage>,
    ) -> Self {
        Self {
            schema: RwLock::new(None),
            build_lock: Mutex::new(()),
            state: RwLock::new(CacheState::Uninitialized),
            compiler,
            configuration,
            storage,
            last_error: RwLock::new(None),
        }
    }

    /// Returns the current state of the cache.
    pub async fn state(&self) -> CacheState {
        *self.state.read().await
    }

    /// Gets the compiled schema, compiling it if necessary.
    ///
    /// Concurrent callers receive [`CompileError::BuildInProgress`] while
    /// a compile is running, rather than blocking. Use
    /// [`get_or_build_wait`](Self::get_or_build_wait) where waiting is
    /// acceptable.
    ///
    /// # Errors
    ///
    /// [`CompileError::BuildInProgress`] if another compile is running,
    /// [`CompileError::BuildFailed`] if the compile fails.
    pub async fn get_or_build(&self) -> Result<Arc<CompiledSchema>, CompileError> {
        // Fast path: already compiled
        {
            let schema = self.schema.read().await;
            if let Some(ref s) = *schema {
                return Ok(Arc::clone(s));
            }
        }

        let state = *self.state.read().await;
        if state == CacheState::Building {
            // Return a "please retry" error rather than blocking
            return Err(CompileError::BuildInProgress);
        }

        let Ok(_guard) = self.build_lock.try_lock() else {
            // Another task is compiling
            return Err(CompileError::BuildInProgress);
        };

        // Double-check after acquiring lock
        {
            let schema = self.schema.read().await;
            if let Some(ref s) = *schema {
                return Ok(Arc::clone(s));
            }
        }

        self.build_locked().await
    }

    /// Gets the compiled schema, waiting for an in-progress compile
    /// instead of returning an error.
    ///
    /// # Errors
    ///
    /// [`CompileError::BuildFailed`] if the compile fails.
    pub async fn get_or_build_wait(&self) -> Result<Arc<CompiledSchema>, CompileError> {
        {
            let schema = self.schema.read().await;
            if let Some(ref s) = *schema {
                return Ok(Arc::clone(s));
            }
        }

        let _guard = self.build_lock.lock().await;

        // Double-check after acquiring lock
        {
            let schema = self.schema.read().await;
            if let Some(ref s) = *schema {
                return Ok(Arc::clone(s));
            }
        }

        // Surface a previous failure without retrying
        if *self.state.read().await == CacheState::Failed
            && let Some(err) = self.last_error.read().await.as_ref()
        {
            return Err(CompileError::BuildFailed(err.clone()));
        }

        self.build_locked().await
    }

    /// Runs a compile while the build lock is held by the caller.
    async fn build_locked(&self) -> Result<Arc<CompiledSchema>, CompileError> {
        *self.state.write().await = CacheState::Building;
        info!(schema_key = %self.configuration.schema_key, "Compiling schema...");

        match self
            .compiler
            .ensure_compiled(&self.configuration, self.storage.as_ref())
            .await
        {
            Ok(schema) => {
                let schema = Arc::new(schema);
                *self.schema.write().await = Some(Arc::clone(&schema));
                *self.state.write().await = CacheState::Ready;
                *self.last_error.write().await = None;
                info!(schema_key = %schema.schema_key(), "Schema ready");
                Ok(schema)
            }
            Err(e) => {
                let error_msg = e.to_string();
                warn!(
                    schema_key = %self.configuration.schema_key,
                    error = %error_msg,
                    "Schema compile failed"
                );
                *self.state.write().await = CacheState::Failed;
                *self.last_error.write().await = Some(error_msg.clone());
                Err(CompileError::BuildFailed(error_msg))
            }
        }
    }

    /// Gets the schema if it is already compiled, without triggering a
    /// compile.
    pub async fn get(&self) -> Option<Arc<CompiledSchema>> {
        self.schema.read().await.clone()
    }

    /// Invalidates the cached schema, causing the next access to
    /// recompile. Used for hot-reload when the configuration source
    /// changes.
    pub async fn invalidate(&self) {
        // Hold the build lock so no compile runs concurrently
        let _guard = self.build_lock.lock().await;

        *self.schema.write().await = None;
        *self.state.write().await = CacheState::Uninitialized;
        *self.last_error.write().await = None;

        info!(schema_key = %self.configuration.schema_key, "Schema cache invalidated");
    }

    /// Returns the last compile error, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Returns whether the schema is ready for use.
    pub async fn is_ready(&self) -> bool {
        *self.state.read().await == CacheState::Ready
    }
}
