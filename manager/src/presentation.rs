//! Collaborators of the window manager on the presentation side.
//!
//! The manager never touches widgets. It asks a [`ViewProvider`] for the view
//! of a view model, hands both to a [`Binder`] and lets a [`PresentationHost`]
//! put the result on screen. The host reports what happens to the window
//! afterwards through the [`WindowEvents`] handle it receives with each window.

use crate::error::{BindingError, PresentError};
use crate::registry::{self, SharedRegistry};
use crate::scope::WindowScope;
use casement_ioc::{downcast_instance, erase, Instance, ServiceKey};
use serde::Deserialize;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// Identifies a window shown by a [`WindowManager`](crate::WindowManager).
///
/// Identifiers increase monotonically and are never reused by a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
  pub(crate) fn new(raw: u64) -> Self {
    Self(raw)
  }

  pub fn as_u64(self) -> u64 {
    self.0
  }
}

impl fmt::Display for WindowId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "window#{}", self.0)
  }
}

/// Whether showing a window blocks its invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
  /// `show` returns only after the window has been closed.
  Modal,
  /// `show` returns as soon as the window is on screen.
  #[default]
  Modeless,
}

/// A type-erased view model bound to a window.
#[derive(Clone)]
pub struct ViewModel {
  key: ServiceKey,
  instance: Instance,
}

impl ViewModel {
  pub fn new<T: Any + Send + Sync>(view_model: Arc<T>) -> Self {
    Self {
      key: ServiceKey::of::<T>(),
      instance: erase(view_model),
    }
  }

  pub(crate) fn from_parts(key: ServiceKey, instance: Instance) -> Self {
    Self { key, instance }
  }

  pub fn key(&self) -> &ServiceKey {
    &self.key
  }

  pub fn type_name(&self) -> &'static str {
    self.key.type_name()
  }

  pub fn instance(&self) -> &Instance {
    &self.instance
  }

  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    downcast_instance::<T>(&self.instance)
  }

  pub fn is<T: ?Sized + Any>(&self) -> bool {
    self.key.type_id() == std::any::TypeId::of::<T>()
  }
}

impl fmt::Debug for ViewModel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("ViewModel").field(&self.key).finish()
  }
}

/// What a window should be shown for.
#[derive(Debug, Clone)]
pub enum ViewModelSource {
  /// Resolve a fresh view model inside the new window's scope.
  Type(ServiceKey),
  /// Bind an existing view model; it is not resolved again.
  Instance(ViewModel),
}

impl ViewModelSource {
  pub fn of<T: ?Sized + Any>() -> Self {
    ViewModelSource::Type(ServiceKey::of::<T>())
  }

  pub fn named<T: ?Sized + Any>(name: &str) -> Self {
    ViewModelSource::Type(ServiceKey::named::<T>(name))
  }

  pub fn type_name(&self) -> &'static str {
    match self {
      ViewModelSource::Type(key) => key.type_name(),
      ViewModelSource::Instance(view_model) => view_model.type_name(),
    }
  }
}

impl From<ViewModel> for ViewModelSource {
  fn from(view_model: ViewModel) -> Self {
    ViewModelSource::Instance(view_model)
  }
}

impl From<ServiceKey> for ViewModelSource {
  fn from(key: ServiceKey) -> Self {
    ViewModelSource::Type(key)
  }
}

/// An opaque view produced by a [`ViewProvider`].
#[derive(Clone)]
pub struct ViewHandle(Instance);

impl ViewHandle {
  pub fn new<T: Any + Send + Sync>(view: Arc<T>) -> Self {
    Self(erase(view))
  }

  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    downcast_instance::<T>(&self.0)
  }
}

impl fmt::Debug for ViewHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ViewHandle(..)")
  }
}

/// Finds or creates the view for a view model.
///
/// The window's scope is passed along so views can pull window-scoped
/// services of their own.
pub trait ViewProvider: Send + Sync {
  fn resolve_view_for(&self, view_model: &ViewModel, scope: &dyn WindowScope) -> Result<ViewHandle, BindingError>;
}

/// Wires a view to its view model.
pub trait Binder: Send + Sync {
  fn bind(&self, view: &ViewHandle, view_model: &ViewModel) -> Result<(), BindingError>;
}

/// The windowing layer.
pub trait PresentationHost: Send + Sync {
  /// Puts a window on screen.
  ///
  /// For [`Modality::Modal`] this runs until the window has been closed.
  /// The host keeps `events` and reports activation changes and the closing
  /// of the window through it.
  fn show(
    &self,
    window: WindowId,
    view: &ViewHandle,
    modality: Modality,
    events: WindowEvents,
  ) -> Result<(), PresentError>;

  /// Closes a window. Hosts report the closure through the window's
  /// [`WindowEvents`] as usual; reporting it twice is harmless.
  fn close(&self, window: WindowId);
}

/// The handle a [`PresentationHost`] uses to report what happens to one window.
///
/// It holds the manager weakly; once the manager is gone every report is
/// ignored.
#[derive(Clone)]
pub struct WindowEvents {
  window: WindowId,
  registry: Weak<SharedRegistry>,
}

impl WindowEvents {
  pub(crate) fn new(window: WindowId, registry: &Arc<SharedRegistry>) -> Self {
    Self {
      window,
      registry: Arc::downgrade(registry),
    }
  }

  pub fn window(&self) -> WindowId {
    self.window
  }

  /// The window came to the foreground.
  pub fn activated(&self) {
    if let Some(registry) = self.registry.upgrade() {
      registry::activate(&registry, self.window);
    }
  }

  /// The window lost the foreground without closing.
  pub fn deactivated(&self) {
    if let Some(registry) = self.registry.upgrade() {
      registry::deactivate(&registry, self.window);
    }
  }

  /// The window has closed. Its scope is disposed before this returns.
  pub fn closed(&self) {
    if let Some(registry) = self.registry.upgrade() {
      registry::close(&registry, self.window);
    }
  }
}

impl fmt::Debug for WindowEvents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WindowEvents").field("window", &self.window).finish()
  }
}
