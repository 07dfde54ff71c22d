//! The main `Container` struct and its associated methods.

use crate::core::{downcast_instance, erase, Factory, Instance, Lifetime, Provider, ResolutionGuard, ServiceKey};
use crate::error::{ResolveError, Result};
use crate::scope::{Scope, ScopeState};
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// The Inversion of Control (IoC) container.
///
/// This struct holds the registrations for all services together with the
/// root cache of singleton instances. It is thread-safe and allows services to
/// be registered at any point, even after resolution has started.
///
/// Scoped services can only be resolved through a [`Scope`] created with
/// [`Container::create_scope`].
#[derive(Default)]
pub struct Container {
  providers: DashMap<ServiceKey, Arc<Provider>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, key: ServiceKey, provider: Provider) {
    tracing::trace!(service = ?key, lifetime = ?provider.lifetime(), "registering service");
    // Last registration for a key wins.
    self.providers.insert(key, Arc::new(provider));
  }

  fn typed_factory<T: Any + Send + Sync>(
    factory: impl Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  ) -> Factory {
    Box::new(move |resolver: &Resolver<'_>| {
      factory(resolver).map(|service| erase(Arc::new(service)))
    })
  }

  fn trait_factory<I: ?Sized + Any + Send + Sync>(
    factory: impl Fn(&Resolver<'_>) -> Result<Arc<I>> + Send + Sync + 'static,
  ) -> Factory {
    Box::new(move |resolver: &Resolver<'_>| factory(resolver).map(erase))
  }

  pub(crate) fn provider(&self, key: &ServiceKey) -> Option<Arc<Provider>> {
    // Clone the provider out so no map lock is held while factories run.
    self.providers.get(key).map(|entry| Arc::clone(entry.value()))
  }

  pub(crate) fn root(&self) -> Resolver<'_> {
    Resolver {
      container: self,
      scope: None,
    }
  }

  // --- PUBLIC API ---

  // --- Instance Registration ---
  pub fn add_instance<T: Any + Send + Sync>(&self, instance: T) {
    self.add_instance_internal(None, instance);
  }
  pub fn add_instance_with_name<T: Any + Send + Sync>(&self, name: &str, instance: T) {
    self.add_instance_internal(Some(name), instance);
  }

  fn add_instance_internal<T: Any + Send + Sync>(&self, name: Option<&str>, instance: T) {
    let provider = Provider::Singleton {
      cell: once_cell::sync::OnceCell::with_value(erase(Arc::new(instance))),
      factory: Box::new(|_: &Resolver<'_>| {
        Err(ResolveError::construction::<T>("pre-initialized instance has no factory"))
      }),
    };
    self.insert(ServiceKey::with_name::<T>(name), provider);
  }

  // --- Singleton Registration ---
  pub fn add_singleton<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<T>(None, Lifetime::Singleton, Self::typed_factory(factory));
  }
  pub fn add_singleton_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<T>(Some(name), Lifetime::Singleton, Self::typed_factory(factory));
  }

  // --- Scoped Registration ---
  pub fn add_scoped<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<T>(None, Lifetime::Scoped, Self::typed_factory(factory));
  }
  pub fn add_scoped_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<T>(Some(name), Lifetime::Scoped, Self::typed_factory(factory));
  }

  // --- Transient Registration ---
  pub fn add_transient<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<T>(None, Lifetime::Transient, Self::typed_factory(factory));
  }
  pub fn add_transient_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<T>(Some(name), Lifetime::Transient, Self::typed_factory(factory));
  }

  // --- Trait Registration ---
  pub fn add_singleton_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver<'_>) -> Result<Arc<I>> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<I>(None, Lifetime::Singleton, Self::trait_factory(factory));
  }
  pub fn add_singleton_trait_with_name<I: ?Sized + Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(&Resolver<'_>) -> Result<Arc<I>> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<I>(Some(name), Lifetime::Singleton, Self::trait_factory(factory));
  }
  pub fn add_scoped_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver<'_>) -> Result<Arc<I>> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<I>(None, Lifetime::Scoped, Self::trait_factory(factory));
  }
  pub fn add_transient_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver<'_>) -> Result<Arc<I>> + Send + Sync + 'static,
  ) {
    self.add_with_lifetime::<I>(None, Lifetime::Transient, Self::trait_factory(factory));
  }

  fn add_with_lifetime<T: ?Sized + Any>(&self, name: Option<&str>, lifetime: Lifetime, factory: Factory) {
    let provider = match lifetime {
      Lifetime::Singleton => Provider::Singleton {
        cell: once_cell::sync::OnceCell::new(),
        factory,
      },
      Lifetime::Scoped => Provider::Scoped { factory },
      Lifetime::Transient => Provider::Transient { factory },
    };
    self.insert(ServiceKey::with_name::<T>(name), provider);
  }

  // --- Introspection ---

  /// Returns `true` if a service is registered under the given key.
  pub fn contains<T: ?Sized + Any>(&self, name: Option<&str>) -> bool {
    self.providers.contains_key(&ServiceKey::with_name::<T>(name))
  }

  /// Returns the lifetime a service was registered with, if any.
  pub fn lifetime_of<T: ?Sized + Any>(&self, name: Option<&str>) -> Option<Lifetime> {
    self
      .provider(&ServiceKey::with_name::<T>(name))
      .map(|provider| provider.lifetime())
  }

  // --- Scopes ---

  /// Creates a child resolution scope.
  ///
  /// The scope shares this container's singletons but keeps its own scoped
  /// instances, which are released when the scope is disposed or dropped.
  /// It holds the container weakly.
  pub fn create_scope(self: &Arc<Self>) -> Scope {
    Scope::new(Arc::downgrade(self))
  }

  // --- Resolution ---

  /// Resolves a service from the root of the container.
  ///
  /// Scoped services fail with [`ResolveError::ScopeRequired`].
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Result<Arc<T>> {
    self.root().get(name)
  }

  /// Resolves a service from the root by its erased key.
  pub fn get_erased(&self, key: &ServiceKey) -> Result<Instance> {
    self.root().get_erased(key)
  }
}

/// The resolution context handed to service factories.
///
/// Singletons are always constructed against the root so they can never
/// capture a scoped dependency. Scoped and transient services requested
/// through a scope see that scope.
pub struct Resolver<'a> {
  container: &'a Container,
  scope: Option<&'a ScopeState>,
}

impl<'a> Resolver<'a> {
  pub(crate) fn scoped(container: &'a Container, scope: &'a ScopeState) -> Self {
    Self {
      container,
      scope: Some(scope),
    }
  }

  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Result<Arc<T>> {
    let key = ServiceKey::with_name::<T>(name);
    let instance = self.get_erased(&key)?;
    downcast_instance::<T>(&instance).ok_or_else(|| key.unregistered())
  }

  pub fn get_erased(&self, key: &ServiceKey) -> Result<Instance> {
    if let Some(scope) = self.scope {
      if scope.is_disposed() {
        return Err(ResolveError::ScopeDisposed);
      }
    }

    // Released automatically when this call returns, even on error.
    let _guard = ResolutionGuard::enter(self.container as *const Container as usize, key)?;

    let provider = self.container.provider(key).ok_or_else(|| key.unregistered())?;

    match &*provider {
      Provider::Singleton { cell, factory } => cell
        .get_or_try_init(|| factory(&self.container.root()))
        .cloned(),
      Provider::Scoped { factory } => {
        let scope = self.scope.ok_or(ResolveError::ScopeRequired {
          type_name: key.type_name(),
        })?;
        if let Some(existing) = scope.cached(key) {
          return Ok(existing);
        }
        let instance = factory(self)?;
        scope.store(key, instance)
      }
      Provider::Transient { factory } => factory(self),
    }
  }
}
