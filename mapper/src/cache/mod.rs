//! Thread-safe, build-once cache of compiled mappers
//!
//! Each type pair is compiled at most once per successful build: concurrent callers
//! asking for the same pair wait on a per-pair lock while one of them builds, then all
//! receive the same [`CompiledMapper`]. Unrelated pairs build in parallel.


use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::config::MapperConfig;
use crate::error::Result;
use crate::key::TypePairKey;
use crate::mapper::{CompiledMapper, Mapper};
use crate::reflect::Mappable;
use crate::shape::ShapeRegistry;
use crate::support::tracing::set_tracing_level;

/// Process-wide cache, configured from the environment on first use
static GLOBAL_CACHE: LazyLock<MapperCache> =
    LazyLock::new(|| MapperCache::with_config(MapperConfig::from_env()));

/// Cache of compiled mappers keyed by [`TypePairKey`]
pub struct MapperCache {
    config:      MapperConfig,
    /// Introspected shapes, shared by every build of this cache
    shapes:      ShapeRegistry,
    /// Successfully built mappers; failures are never stored
    mappers:     DashMap<TypePairKey, Arc<CompiledMapper>>,
    /// One lock per type pair, serializing builds of that pair only
    build_locks: Mutex<HashMap<TypePairKey, Arc<Mutex<()>>>>,
    /// Build attempts, successful or not
    builds:      AtomicUsize,
}

impl MapperCache {
    /// Empty cache with default configuration
    pub fn new() -> Self { Self::with_config(MapperConfig::default()) }

    /// Empty cache with the given configuration
    ///
    /// Applies the configured tracing level, if any.
    pub fn with_config(config: MapperConfig) -> Self {
        if let Some(level) = config.trace_level {
            set_tracing_level(level);
        }
        Self {
            config,
            shapes: ShapeRegistry::new(),
            mappers: DashMap::new(),
            build_locks: Mutex::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    /// The process-wide cache
    pub fn global() -> &'static Self { &GLOBAL_CACHE }

    /// Typed mapper from `I` to `O`, building it on first request
    ///
    /// # Errors
    ///
    /// Returns the build error when the pair cannot be planned; see
    /// [`get_or_build`](Self::get_or_build).
    pub fn get_mapper<I: Mappable, O: Mappable>(&self) -> Result<Mapper<I, O>> {
        let compiled = self.get_or_build(TypePairKey::of::<I, O>())?;
        Mapper::bind(compiled)
    }

    /// Compiled mapper for `key`, building it on first request
    ///
    /// A failed build leaves the cache unchanged, so the next request for the same
    /// pair builds again.
    ///
    /// # Errors
    ///
    /// Returns a `PlanGeneration` error wrapping the cause (`ForbiddenCapability`,
    /// `StructuralMismatch`, `Unconvertible`, `RecursionLimitExceeded`) for the first
    /// property that could not be planned.
    pub fn get_or_build(&self, key: TypePairKey) -> Result<Arc<CompiledMapper>> {
        if let Some(mapper) = self.cached(&key) {
            debug!("Mapper cache hit for {key}");
            return Ok(mapper);
        }

        let lock = self.build_lock(key);
        let _building = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // another caller may have finished the build while we waited
        if let Some(mapper) = self.cached(&key) {
            debug!("Mapper for {key} built while waiting");
            return Ok(mapper);
        }

        debug!("Mapper cache miss for {key}, building");
        let attempt = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
        match CompiledMapper::compile(key, &self.shapes, &self.config) {
            Ok(compiled) => {
                let compiled = Arc::new(compiled);
                info!(
                    "Built mapper {} ({}, build #{attempt})",
                    compiled.name(),
                    compiled.strategy()
                );
                if self.config.log_plans {
                    match compiled.describe() {
                        Ok(plan) => debug!("Plan for {}: {plan}", compiled.name()),
                        Err(report) => warn!("Could not describe {}: {report:?}", compiled.name()),
                    }
                }
                self.mappers.insert(key, Arc::clone(&compiled));
                Ok(compiled)
            },
            Err(report) => {
                warn!("Failed to build mapper for {key}: {report:?}");
                Err(report)
            },
        }
    }

    fn cached(&self, key: &TypePairKey) -> Option<Arc<CompiledMapper>> {
        self.mappers.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Get or create the build lock for `key`; the table lock is held only for this
    fn build_lock(&self, key: TypePairKey) -> Arc<Mutex<()>> {
        let mut locks = self
            .build_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key).or_default())
    }

    /// Number of build attempts so far, including failed ones
    pub fn build_count(&self) -> usize { self.builds.load(Ordering::SeqCst) }

    /// Number of cached mappers
    pub fn len(&self) -> usize { self.mappers.len() }

    /// Whether no mapper has been built yet
    pub fn is_empty(&self) -> bool { self.mappers.is_empty() }

    /// Whether a mapper for `key` is cached
    pub fn contains(&self, key: &TypePairKey) -> bool { self.mappers.contains_key(key) }

    /// Configuration used for every build
    pub const fn config(&self) -> &MapperConfig { &self.config }

    /// Shape registry shared by every build
    pub const fn shapes(&self) -> &ShapeRegistry { &self.shapes }
}

impl Default for MapperCache {
    fn default() -> Self { Self::new() }
}
