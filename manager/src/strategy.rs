//! How a window manager creates instances and window scopes.

use crate::error::{Result, WindowError};
use crate::scope::{ContainerWindowScope, WindowScope};
use casement_ioc::{erase, Container, Instance, ServiceKey};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// The customization point of a [`WindowManager`](crate::WindowManager).
///
/// The same key must always yield a compatible instance or the same failure,
/// whichever strategy is plugged in.
pub trait InstanceStrategy: Send + Sync {
  /// Resolves a service at the root, outside of any window scope.
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance>;

  /// Creates a new scope independent from every other scope.
  fn create_window_scope(&self) -> Result<Box<dyn WindowScope>>;
}

/// Resolves through a `casement_ioc` [`Container`].
///
/// The container is held weakly so a manager registered inside that same
/// container does not keep it alive.
#[derive(Clone)]
pub struct ContainerStrategy {
  container: Weak<Container>,
}

impl ContainerStrategy {
  pub fn new(container: &Arc<Container>) -> Self {
    Self {
      container: Arc::downgrade(container),
    }
  }

  pub(crate) fn from_weak(container: Weak<Container>) -> Self {
    Self { container }
  }

  fn container(&self) -> Result<Arc<Container>> {
    self.container.upgrade().ok_or(WindowError::ContainerUnavailable)
  }
}

impl InstanceStrategy for ContainerStrategy {
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
    Ok(self.container()?.get_erased(key)?)
  }

  fn create_window_scope(&self) -> Result<Box<dyn WindowScope>> {
    let scope = self.container()?.create_scope();
    Ok(Box::new(ContainerWindowScope::new(scope)))
  }
}

type Constructor = Arc<dyn Fn() -> Instance + Send + Sync>;

/// Builds instances from registered constructors, without a container.
///
/// Every request produces a fresh instance, at the root and inside scopes
/// alike. Useful for applications whose view models are plain structs.
#[derive(Clone, Default)]
pub struct ActivatorStrategy {
  constructors: Arc<RwLock<HashMap<ServiceKey, Constructor>>>,
}

impl ActivatorStrategy {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `T` to be built with `T::default()`.
  pub fn register<T: Default + Any + Send + Sync>(&self) -> &Self {
    self.register_with(T::default)
  }

  /// Registers `T` to be built with `constructor`.
  pub fn register_with<T: Any + Send + Sync>(&self, constructor: impl Fn() -> T + Send + Sync + 'static) -> &Self {
    self
      .constructors
      .write()
      .insert(ServiceKey::of::<T>(), Arc::new(move || erase(Arc::new(constructor()))));
    self
  }

  fn activate(&self, key: &ServiceKey) -> Result<Instance> {
    // Clone the constructor out so it runs without the lock held.
    let constructor = self
      .constructors
      .read()
      .get(key)
      .cloned()
      .ok_or_else(|| WindowError::UnresolvedType {
        type_name: key.type_name(),
        name: key.name().map(str::to_owned),
      })?;
    Ok(constructor())
  }
}

impl InstanceStrategy for ActivatorStrategy {
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
    self.activate(key)
  }

  fn create_window_scope(&self) -> Result<Box<dyn WindowScope>> {
    Ok(Box::new(ActivatorWindowScope {
      activator: self.clone(),
      disposed: AtomicBool::new(false),
    }))
  }
}

/// The scope handed out by [`ActivatorStrategy`]. It owns no instances.
pub struct ActivatorWindowScope {
  activator: ActivatorStrategy,
  disposed: AtomicBool,
}

impl WindowScope for ActivatorWindowScope {
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
    if self.is_disposed() {
      return Err(WindowError::ScopeDisposed);
    }
    self.activator.activate(key)
  }

  fn dispose(&self) {
    self.disposed.store(true, Ordering::Release);
  }

  fn is_disposed(&self) -> bool {
    self.disposed.load(Ordering::Acquire)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use casement_ioc::downcast_instance;

  #[derive(Default)]
  struct Counter {
    start: u32,
  }

  #[test]
  fn activator_builds_fresh_instances() {
    let activator = ActivatorStrategy::new();
    activator.register::<Counter>();
    let key = ServiceKey::of::<Counter>();

    let a = activator.create_instance(&key).unwrap();
    let b = activator.create_instance(&key).unwrap();

    let a = downcast_instance::<Counter>(&a).unwrap();
    let b = downcast_instance::<Counter>(&b).unwrap();
    assert_eq!(a.start, 0);
    assert!(!Arc::ptr_eq(&a, &b));
  }

  #[test]
  fn activator_reports_unknown_types() {
    let activator = ActivatorStrategy::new();
    let err = activator.create_instance(&ServiceKey::of::<Counter>()).err().unwrap();
    assert!(matches!(err, WindowError::UnresolvedType { .. }));
  }

  #[test]
  fn activator_scope_rejects_use_after_dispose() {
    let activator = ActivatorStrategy::new();
    activator.register_with(|| Counter { start: 7 });
    let scope = activator.create_window_scope().unwrap();

    assert_eq!(scope.create::<Counter>().unwrap().start, 7);
    scope.dispose();
    scope.dispose();

    assert!(matches!(scope.create::<Counter>(), Err(WindowError::ScopeDisposed)));
  }

  #[test]
  fn activator_constructors_may_register_types() {
    struct Plugin;

    let activator = ActivatorStrategy::new();
    let registrar = activator.clone();
    activator.register_with(move || {
      registrar.register_with(|| Plugin);
      Counter { start: 1 }
    });

    assert_eq!(activator.create_window_scope().unwrap().create::<Counter>().unwrap().start, 1);
    assert!(activator.create_instance(&ServiceKey::of::<Plugin>()).is_ok());
  }

  #[test]
  fn container_strategy_fails_once_the_container_is_gone() {
    let container = Arc::new(Container::new());
    let strategy = ContainerStrategy::new(&container);
    drop(container);

    assert!(matches!(
      strategy.create_window_scope(),
      Err(WindowError::ContainerUnavailable)
    ));
  }
}
