//! The window manager: shows windows, owns their scopes and tracks which one
//! is active.

use crate::config::WindowManagerConfig;
use crate::error::{Result, WindowError};
use crate::presentation::{
  Binder, Modality, PresentationHost, ViewHandle, ViewModel, ViewModelSource, ViewProvider, WindowEvents, WindowId,
};
use crate::registry::{self, SharedRegistry, WindowEntry, WindowRegistry};
use crate::scope::WindowScope;
use crate::strategy::InstanceStrategy;
use casement_ioc::{downcast_instance, Instance, ServiceKey};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::{Arc, Weak};

/// Opens and closes windows.
pub trait WindowService: Send + Sync {
  /// Shows a window for a view model, returning once it is on screen
  /// (modeless) or once it has been closed again (modal).
  fn show_window(&self, source: ViewModelSource, modality: Modality) -> Result<WindowId>;

  /// Closes a window. Returns `false` if it was not open.
  fn close(&self, window: WindowId) -> bool;
}

/// Tells which window is in the foreground, e.g. to anchor a dialog.
pub trait ActiveWindowTracker: Send + Sync {
  /// A point-in-time snapshot; `None` if no window is active.
  fn active_window(&self) -> Option<WindowId>;
}

/// A cheap, cloneable [`ActiveWindowTracker`] detached from the manager.
///
/// Reports `None` once the manager has been dropped.
#[derive(Clone)]
pub struct WindowTracker {
  registry: Weak<SharedRegistry>,
}

impl ActiveWindowTracker for WindowTracker {
  fn active_window(&self) -> Option<WindowId> {
    self.registry.upgrade().and_then(|registry| registry.lock().active())
  }
}

/// Shows windows for view models, giving each window its own scope.
///
/// For every shown window the manager creates a fresh [`WindowScope`],
/// resolves (or adopts) the view model in it, asks the [`ViewProvider`] for a
/// view, binds the two and hands the view to the [`PresentationHost`]. The
/// scope lives exactly as long as the window and is disposed once, when the
/// window closes. If anything fails before the window is on screen, the scope
/// is disposed right away and the error is returned.
///
/// The most recently shown window becomes the active one; the host moves the
/// active window around through [`WindowEvents`].
pub struct WindowManager {
  strategy: Arc<dyn InstanceStrategy>,
  views: Arc<dyn ViewProvider>,
  binder: Arc<dyn Binder>,
  host: Arc<dyn PresentationHost>,
  config: WindowManagerConfig,
  registry: Arc<SharedRegistry>,
}

impl WindowManager {
  pub fn new(
    strategy: Arc<dyn InstanceStrategy>,
    views: Arc<dyn ViewProvider>,
    binder: Arc<dyn Binder>,
    host: Arc<dyn PresentationHost>,
  ) -> Self {
    Self::with_config(strategy, views, binder, host, WindowManagerConfig::default())
  }

  pub fn with_config(
    strategy: Arc<dyn InstanceStrategy>,
    views: Arc<dyn ViewProvider>,
    binder: Arc<dyn Binder>,
    host: Arc<dyn PresentationHost>,
    config: WindowManagerConfig,
  ) -> Self {
    let registry = Arc::new(Mutex::new(WindowRegistry::new(config.close_focus)));
    Self {
      strategy,
      views,
      binder,
      host,
      config,
      registry,
    }
  }

  pub fn config(&self) -> &WindowManagerConfig {
    &self.config
  }

  // --- Instance creation ---

  /// Resolves a service at the root level, outside of any window.
  pub fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
    self.strategy.create_instance(key)
  }

  /// Typed form of [`create_instance`](Self::create_instance).
  pub fn create<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    let key = ServiceKey::of::<T>();
    let instance = self.create_instance(&key)?;
    downcast_instance::<T>(&instance).ok_or(WindowError::UnresolvedType {
      type_name: key.type_name(),
      name: None,
    })
  }

  /// Creates a new, independent window scope.
  pub fn create_window_scope(&self) -> Result<Box<dyn WindowScope>> {
    self.strategy.create_window_scope()
  }

  // --- Showing windows ---

  /// Shows a window for `source`.
  ///
  /// A type is resolved inside the window's new scope; an instance is bound
  /// as it is, but still gets a scope of its own.
  pub fn show_window(&self, source: impl Into<ViewModelSource>, modality: Modality) -> Result<WindowId> {
    let source = source.into();
    let scope = self.create_window_scope()?;

    let (view_model, view) = match self.prepare(&source, scope.as_ref()) {
      Ok(prepared) => prepared,
      Err(err) => {
        tracing::warn!(view_model = source.type_name(), error = %err, "window creation aborted");
        scope.dispose();
        return Err(err);
      }
    };

    let view_model_type = view_model.type_name();
    let (id, previous) = {
      let mut registry = self.registry.lock();
      let id = registry.allocate_id();
      let previous = registry.active();
      registry.insert(
        id,
        WindowEntry {
          view_model,
          view: view.clone(),
          scope,
          modality,
          active: false,
        },
      );
      (id, previous)
    };
    tracing::debug!(window = %id, view_model = view_model_type, ?modality, "showing window");

    let events = WindowEvents::new(id, &self.registry);
    if let Err(err) = self.host.show(id, &view, modality, events) {
      let entry = self.registry.lock().rollback(id, previous);
      if let Some(entry) = entry {
        entry.scope.dispose();
      }
      tracing::warn!(window = %id, error = %err, "host failed to show window");
      return Err(err.into());
    }

    if modality == Modality::Modal {
      // The host only returns from a modal show once the window is gone.
      registry::close(&self.registry, id);
    }
    Ok(id)
  }

  /// Resolves `VM` in a new window scope and shows a window for it.
  pub fn show<VM: Any + Send + Sync>(&self, modality: Modality) -> Result<WindowId> {
    self.show_window(ViewModelSource::of::<VM>(), modality)
  }

  pub fn show_modal(&self, source: impl Into<ViewModelSource>) -> Result<WindowId> {
    self.show_window(source, Modality::Modal)
  }

  pub fn show_modeless(&self, source: impl Into<ViewModelSource>) -> Result<WindowId> {
    self.show_window(source, Modality::Modeless)
  }

  /// Shows a window with the configured default modality.
  pub fn show_default(&self, source: impl Into<ViewModelSource>) -> Result<WindowId> {
    self.show_window(source, self.config.default_modality)
  }

  fn prepare(&self, source: &ViewModelSource, scope: &dyn WindowScope) -> Result<(ViewModel, ViewHandle)> {
    let view_model = match source {
      ViewModelSource::Type(key) => ViewModel::from_parts(key.clone(), scope.create_instance(key)?),
      ViewModelSource::Instance(view_model) => view_model.clone(),
    };
    let view = self.views.resolve_view_for(&view_model, scope)?;
    self.binder.bind(&view, &view_model)?;
    Ok((view_model, view))
  }

  // --- Closing and activation ---

  /// Asks the host to close a window and disposes its scope.
  pub fn close(&self, window: WindowId) -> bool {
    if !self.is_open(window) {
      return false;
    }
    self.host.close(window);
    // The host normally reported the closure already; this is then a no-op.
    self.on_window_closed(window);
    true
  }

  /// Reacts to the closure of a window: disposes its scope, forgets it and
  /// moves the active pointer if needed. Unknown windows are ignored.
  pub fn on_window_closed(&self, window: WindowId) -> bool {
    registry::close(&self.registry, window)
  }

  pub fn on_window_activated(&self, window: WindowId) -> bool {
    registry::activate(&self.registry, window)
  }

  pub fn on_window_deactivated(&self, window: WindowId) -> bool {
    registry::deactivate(&self.registry, window)
  }

  // --- Queries ---

  /// The window currently in the foreground, if any.
  pub fn active_window(&self) -> Option<WindowId> {
    self.registry.lock().active()
  }

  /// A detached tracker for collaborators that should not hold the manager.
  pub fn tracker(&self) -> WindowTracker {
    WindowTracker {
      registry: Arc::downgrade(&self.registry),
    }
  }

  pub fn is_open(&self, window: WindowId) -> bool {
    self.registry.lock().contains(window)
  }

  pub fn is_active(&self, window: WindowId) -> bool {
    self.registry.lock().get(window).is_some_and(|entry| entry.active)
  }

  pub fn window_count(&self) -> usize {
    self.registry.lock().len()
  }

  /// Open windows in the order they were shown.
  pub fn open_windows(&self) -> Vec<WindowId> {
    self.registry.lock().ids()
  }

  pub fn view_model(&self, window: WindowId) -> Option<ViewModel> {
    self.registry.lock().get(window).map(|entry| entry.view_model.clone())
  }

  pub fn view(&self, window: WindowId) -> Option<ViewHandle> {
    self.registry.lock().get(window).map(|entry| entry.view.clone())
  }

  pub fn modality(&self, window: WindowId) -> Option<Modality> {
    self.registry.lock().get(window).map(|entry| entry.modality)
  }
}

impl WindowService for WindowManager {
  fn show_window(&self, source: ViewModelSource, modality: Modality) -> Result<WindowId> {
    WindowManager::show_window(self, source, modality)
  }

  fn close(&self, window: WindowId) -> bool {
    WindowManager::close(self, window)
  }
}

impl ActiveWindowTracker for WindowManager {
  fn active_window(&self) -> Option<WindowId> {
    WindowManager::active_window(self)
  }
}

impl Drop for WindowManager {
  fn drop(&mut self) {
    let remaining = self.registry.lock().drain();
    for (id, entry) in remaining {
      tracing::debug!(window = %id, "disposing scope of a window still open at shutdown");
      entry.scope.dispose();
    }
  }
}
