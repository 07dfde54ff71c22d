//! Core data structures shared by the container and its scopes.

use crate::container::Resolver;
use crate::error::{ResolveError, Result};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A type-erased resolved service.
///
/// The payload is always an `Arc<T>` for the requested `T`, which lets unsized
/// trait objects travel through the same erased channel as concrete types.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Recovers a typed handle from an erased [`Instance`].
///
/// Returns `None` if the instance was produced for a different service type.
pub fn downcast_instance<T: ?Sized + Any + Send + Sync>(instance: &Instance) -> Option<Arc<T>> {
  instance.downcast_ref::<Arc<T>>().cloned()
}

/// Wraps a typed handle into an erased [`Instance`].
pub fn erase<T: ?Sized + Any + Send + Sync>(service: Arc<T>) -> Instance {
  Arc::new(service)
}

thread_local! {
  // Services currently under construction on this thread, per container address.
  static RESOLVING_STACK: RefCell<HashSet<(usize, ServiceKey)>> = RefCell::new(HashSet::new());
}

/// An RAII guard to detect circular dependencies.
///
/// Entering pushes the key onto the thread-local resolution set, dropping the
/// guard removes it again. Keys are tracked per container, so one container's
/// factory may resolve the same type from another container.
pub(crate) struct ResolutionGuard {
  entry: (usize, ServiceKey),
}

impl ResolutionGuard {
  pub(crate) fn enter(container: usize, key: &ServiceKey) -> Result<Self> {
    let entry = (container, key.clone());
    let inserted = RESOLVING_STACK.with(|stack| stack.borrow_mut().insert(entry.clone()));
    if !inserted {
      return Err(ResolveError::CircularDependency {
        type_name: key.type_name(),
      });
    }
    Ok(Self { entry })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.entry);
    });
  }
}

/// Identifies a registration: the service type plus an optional name.
#[derive(Clone)]
pub struct ServiceKey {
  type_id: TypeId,
  type_name: &'static str,
  name: Option<Arc<str>>,
}

impl ServiceKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      name: None,
    }
  }

  pub fn named<T: ?Sized + Any>(name: &str) -> Self {
    Self {
      name: Some(Arc::from(name)),
      ..Self::of::<T>()
    }
  }

  pub(crate) fn with_name<T: ?Sized + Any>(name: Option<&str>) -> Self {
    match name {
      Some(n) => Self::named::<T>(n),
      None => Self::of::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub(crate) fn unregistered(&self) -> ResolveError {
    ResolveError::Unregistered {
      type_name: self.type_name,
      name: self.name.as_deref().map(str::to_owned),
    }
  }
}

// `type_name` is diagnostic only and takes no part in identity.
impl PartialEq for ServiceKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id && self.name == other.name
  }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
    self.name.hash(state);
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "Key({}, Name({}))", self.type_name, name),
      None => write!(f, "Key({})", self.type_name),
    }
  }
}

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
  /// One instance per container, shared by every scope.
  Singleton,
  /// One instance per scope, released when the scope is disposed.
  Scoped,
  /// A fresh instance on every resolution.
  Transient,
}

pub(crate) type Factory = Box<dyn Fn(&Resolver<'_>) -> Result<Instance> + Send + Sync>;

pub(crate) enum Provider {
  Singleton {
    cell: once_cell::sync::OnceCell<Instance>,
    factory: Factory,
  },
  Scoped {
    factory: Factory,
  },
  Transient {
    factory: Factory,
  },
}

impl Provider {
  pub(crate) fn lifetime(&self) -> Lifetime {
    match self {
      Provider::Singleton { .. } => Lifetime::Singleton,
      Provider::Scoped { .. } => Lifetime::Scoped,
      Provider::Transient { .. } => Lifetime::Transient,
    }
  }
}
