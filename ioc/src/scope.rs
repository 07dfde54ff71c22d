//! Child resolution scopes.

use crate::container::{Container, Resolver};
use crate::core::{downcast_instance, Instance, ServiceKey};
use crate::error::{ResolveError, Result};
use dashmap::DashMap;
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Per-scope state: the cache of scoped instances and the disposed flag.
pub(crate) struct ScopeState {
  id: u64,
  instances: DashMap<ServiceKey, Instance>,
  disposed: AtomicBool,
}

impl ScopeState {
  pub(crate) fn is_disposed(&self) -> bool {
    self.disposed.load(Ordering::Acquire)
  }

  pub(crate) fn cached(&self, key: &ServiceKey) -> Option<Instance> {
    self.instances.get(key).map(|entry| Arc::clone(entry.value()))
  }

  /// Caches a freshly built scoped instance, keeping the first one if a
  /// nested resolution already stored one for the same key.
  pub(crate) fn store(&self, key: &ServiceKey, instance: Instance) -> Result<Instance> {
    if self.is_disposed() {
      return Err(ResolveError::ScopeDisposed);
    }
    let entry = self.instances.entry(key.clone()).or_insert(instance);
    Ok(Arc::clone(entry.value()))
  }
}

/// An isolated resolution context created by [`Container::create_scope`].
///
/// Scoped registrations yield one instance per `Scope`; singletons are shared
/// with the parent container; transients are fresh on every call. Disposing
/// the scope releases every scoped instance it created. Disposal is
/// idempotent and also happens when the scope is dropped.
///
/// A scope does not keep its container alive: once the container is gone,
/// resolution fails with [`ResolveError::ContainerDropped`].
pub struct Scope {
  container: Weak<Container>,
  state: ScopeState,
}

impl Scope {
  pub(crate) fn new(container: Weak<Container>) -> Self {
    let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(scope = id, "scope created");
    Self {
      container,
      state: ScopeState {
        id,
        instances: DashMap::new(),
        disposed: AtomicBool::new(false),
      },
    }
  }

  /// A process-unique identifier, useful for diagnostics.
  pub fn id(&self) -> u64 {
    self.state.id
  }

  /// The container this scope was created from, if it is still alive.
  pub fn container(&self) -> Option<Arc<Container>> {
    self.container.upgrade()
  }

  pub fn is_disposed(&self) -> bool {
    self.state.is_disposed()
  }

  /// Number of scoped instances currently cached in this scope.
  pub fn cached_count(&self) -> usize {
    self.state.instances.len()
  }

  /// Resolves a service inside this scope.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Result<Arc<T>> {
    let key = ServiceKey::with_name::<T>(name);
    let instance = self.get_erased(&key)?;
    downcast_instance::<T>(&instance).ok_or_else(|| key.unregistered())
  }

  /// Resolves a service inside this scope by its erased key.
  pub fn get_erased(&self, key: &ServiceKey) -> Result<Instance> {
    if self.is_disposed() {
      return Err(ResolveError::ScopeDisposed);
    }
    let container = self.container.upgrade().ok_or(ResolveError::ContainerDropped)?;
    Resolver::scoped(&container, &self.state).get_erased(key)
  }

  /// Releases every scoped instance owned by this scope.
  ///
  /// Only the first call has an effect. Instances still referenced elsewhere
  /// stay alive until their last handle is dropped.
  pub fn dispose(&self) {
    if self.state.disposed.swap(true, Ordering::AcqRel) {
      return;
    }

    let keys: Vec<ServiceKey> = self.state.instances.iter().map(|entry| entry.key().clone()).collect();
    // Drop instances outside of the map locks; their destructors may touch the container.
    let released: Vec<Instance> = keys
      .iter()
      .filter_map(|key| self.state.instances.remove(key).map(|(_, instance)| instance))
      .collect();

    tracing::debug!(scope = self.state.id, released = released.len(), "scope disposed");
    drop(released);
  }
}

impl Drop for Scope {
  fn drop(&mut self) {
    self.dispose();
  }
}

impl std::fmt::Debug for Scope {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Scope")
      .field("id", &self.state.id)
      .field("disposed", &self.is_disposed())
      .field("cached", &self.cached_count())
      .finish()
  }
}
