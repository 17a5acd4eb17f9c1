//! Routine registry.
//!
//! Caches compiled routines by `(from, to, configuration)`. Lookups take a
//! shared read lock. Misses compile outside any lock and publish under the
//! write lock; when two threads race on the same key the first published
//! routine wins and the other is discarded, so every caller observes the
//! same instance.
//!
//! Routines reach each other through [`LazyRoutine`] links that hold the
//! registry weakly, so a registry and its routines are freed together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use morph_types::{ShapeId, ShapePool};

use crate::compiler::Compiler;
use crate::config::MappingConfig;
use crate::lower::lower_plan;
use crate::routine::{CompiledRoutine, LazyRoutine, RoutineKey};
use crate::{CompileError, ConversionError};

/// Thread-safe cache of compiled routines.
///
/// Cloning is cheap and shares the cache.
#[derive(Clone)]
pub struct RoutineRegistry {
    inner: Arc<RegistryInner>,
}

pub(crate) struct RegistryInner {
    pool: Arc<ShapePool>,
    routines: RwLock<FxHashMap<RoutineKey, Arc<CompiledRoutine>>>,
    compiles: AtomicUsize,
}

impl RoutineRegistry {
    pub fn new(pool: Arc<ShapePool>) -> Self {
        RoutineRegistry {
            inner: Arc::new(RegistryInner {
                pool,
                routines: RwLock::new(FxHashMap::default()),
                compiles: AtomicUsize::new(0),
            }),
        }
    }

    pub fn pool(&self) -> &Arc<ShapePool> {
        &self.inner.pool
    }

    /// Cached routine for the pair, compiling it on a miss.
    pub fn get_or_compile(
        &self,
        from: ShapeId,
        to: ShapeId,
        config: &Arc<MappingConfig>,
    ) -> Result<Arc<CompiledRoutine>, CompileError> {
        RegistryInner::get_or_compile(&self.inner, from, to, config)
    }

    pub fn get(&self, key: &RoutineKey) -> Option<Arc<CompiledRoutine>> {
        self.inner.routines.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.routines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.routines.read().is_empty()
    }

    /// Number of compilations run, including ones that lost a publish race.
    pub fn compile_count(&self) -> usize {
        self.inner.compiles.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn linker(&self, config: &Arc<MappingConfig>) -> Linker {
        Linker {
            registry: Arc::downgrade(&self.inner),
            config: Arc::clone(config),
        }
    }
}

impl std::fmt::Debug for RoutineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutineRegistry")
            .field("routines", &self.len())
            .field("compiles", &self.compile_count())
            .finish_non_exhaustive()
    }
}

impl RegistryInner {
    fn get_or_compile(
        this: &Arc<Self>,
        from: ShapeId,
        to: ShapeId,
        config: &Arc<MappingConfig>,
    ) -> Result<Arc<CompiledRoutine>, CompileError> {
        let key = RoutineKey::new(from, to, config.id().clone());

        // Fast path: read lock only
        if let Some(routine) = this.routines.read().get(&key) {
            return Ok(Arc::clone(routine));
        }

        let compiled = Arc::new(Self::compile(this, key.clone(), config)?);

        let mut routines = this.routines.write();
        let published = routines.entry(key).or_insert_with(|| Arc::clone(&compiled));
        if Arc::ptr_eq(published, &compiled) {
            tracing::debug!(from = %this.pool.name_of(from), to = %this.pool.name_of(to), "published routine");
        } else {
            tracing::debug!(
                from = %this.pool.name_of(from),
                to = %this.pool.name_of(to),
                "lost publish race, discarding duplicate routine"
            );
        }
        Ok(Arc::clone(published))
    }

    fn compile(
        this: &Arc<Self>,
        key: RoutineKey,
        config: &Arc<MappingConfig>,
    ) -> Result<CompiledRoutine, CompileError> {
        this.compiles.fetch_add(1, Ordering::Relaxed);
        let plan = Compiler::new(&this.pool, config).compile(key.from, key.to)?;
        let linker = Linker {
            registry: Arc::downgrade(this),
            config: Arc::clone(config),
        };
        let body = lower_plan(plan, &this.pool, &linker)?;
        Ok(CompiledRoutine::new(key, config.copy_mode(), body))
    }
}

/// Handle compiled routines use to reach their sub-routines.
#[derive(Clone)]
pub(crate) struct Linker {
    registry: Weak<RegistryInner>,
    config: Arc<MappingConfig>,
}

impl Linker {
    pub(crate) fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Lazy link to the routine for `(from, to)` under this configuration.
    pub(crate) fn link(&self, from: ShapeId, to: ShapeId) -> LazyRoutine {
        LazyRoutine::new(self.clone(), from, to)
    }

    pub(crate) fn resolve(&self, from: ShapeId, to: ShapeId) -> Result<Arc<CompiledRoutine>, ConversionError> {
        let registry = self.registry.upgrade().ok_or(ConversionError::RegistryDropped)?;
        Ok(RegistryInner::get_or_compile(&registry, from, to, &self.config)?)
    }
}

#[cfg(test)]
mod tests;
