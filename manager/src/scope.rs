//! Per-window resolution scopes.

use crate::error::{Result, WindowError};
use casement_ioc::{downcast_instance, Instance, Scope, ServiceKey};
use std::any::Any;
use std::sync::Arc;

/// One window's isolated resolution context.
///
/// A scope starts out active and becomes disposed exactly once; there is no
/// way back. After disposal [`create_instance`](WindowScope::create_instance)
/// fails with [`WindowError::ScopeDisposed`]. Disposing again is a no-op.
pub trait WindowScope: Send + Sync {
  /// Resolves the service identified by `key` inside this scope.
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance>;

  /// Releases the scope and every instance it owns. Idempotent.
  fn dispose(&self);

  fn is_disposed(&self) -> bool;
}

impl dyn WindowScope + '_ {
  /// Typed form of [`create_instance`](WindowScope::create_instance).
  pub fn create<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    let key = ServiceKey::of::<T>();
    let instance = self.create_instance(&key)?;
    downcast_instance::<T>(&instance).ok_or(WindowError::UnresolvedType {
      type_name: key.type_name(),
      name: None,
    })
  }
}

/// A [`WindowScope`] backed by a child scope of a `casement_ioc` container.
pub struct ContainerWindowScope {
  scope: Scope,
}

impl ContainerWindowScope {
  pub fn new(scope: Scope) -> Self {
    tracing::debug!(scope = scope.id(), "window scope created");
    Self { scope }
  }
}

impl WindowScope for ContainerWindowScope {
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
    self.scope.get_erased(key).map_err(WindowError::from)
  }

  fn dispose(&self) {
    if !self.scope.is_disposed() {
      tracing::debug!(scope = self.scope.id(), "window scope disposed");
    }
    self.scope.dispose();
  }

  fn is_disposed(&self) -> bool {
    self.scope.is_disposed()
  }
}
