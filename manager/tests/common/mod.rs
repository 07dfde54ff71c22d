#![allow(dead_code)]

use casement::{
  Binder, BindingError, ContainerStrategy, InstanceStrategy, Modality, PresentError, PresentationHost, Result,
  ViewHandle, ViewModel, ViewProvider, WindowEvents, WindowId, WindowManager, WindowManagerConfig, WindowScope,
};
use casement_ioc::{resolve, Container, Instance, ServiceKey};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

// --- Services ---

pub struct Clock;

/// Scoped: one per window.
pub struct DocumentSession {
  drops: Arc<AtomicUsize>,
}

impl Drop for DocumentSession {
  fn drop(&mut self) {
    self.drops.fetch_add(1, Ordering::SeqCst);
  }
}

pub struct EditorViewModel {
  pub session: Arc<DocumentSession>,
  pub clock: Arc<Clock>,
}

pub struct StatusViewModel;

/// Registered, but no view exists for it.
pub struct OrphanViewModel;

/// Never registered.
pub struct MissingViewModel;

// --- Views and binding ---

pub struct TestView {
  pub view_model: &'static str,
}

pub struct TestViews;

impl ViewProvider for TestViews {
  fn resolve_view_for(
    &self,
    view_model: &ViewModel,
    _scope: &dyn WindowScope,
  ) -> std::result::Result<ViewHandle, BindingError> {
    if view_model.is::<OrphanViewModel>() {
      return Err(BindingError::NoView {
        view_model: view_model.type_name(),
      });
    }
    Ok(ViewHandle::new(Arc::new(TestView {
      view_model: view_model.type_name(),
    })))
  }
}

#[derive(Default)]
pub struct RecordingBinder {
  pub bound: Mutex<Vec<&'static str>>,
  pub fail: AtomicBool,
}

impl Binder for RecordingBinder {
  fn bind(&self, view: &ViewHandle, view_model: &ViewModel) -> std::result::Result<(), BindingError> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(BindingError::Failed {
        view_model: view_model.type_name(),
        message: "no matching properties".to_string(),
      });
    }
    let view = view.downcast::<TestView>().expect("views come from TestViews");
    self.bound.lock().push(view.view_model);
    Ok(())
  }
}

// --- Presentation host ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
  Show(WindowId, Modality),
  Close(WindowId),
}

type ShowHook = Box<dyn FnMut(WindowId, Modality, &WindowEvents) + Send>;

/// Records every call and stands in for the user: modal windows are closed
/// by the "user" right before `show` returns.
#[derive(Default)]
pub struct RecordingHost {
  pub calls: Mutex<Vec<HostCall>>,
  events: Mutex<HashMap<WindowId, WindowEvents>>,
  pub fail_next_show: AtomicBool,
  during_show: Mutex<Option<ShowHook>>,
}

impl RecordingHost {
  /// Runs `hook` while a window is being shown, before a modal one closes.
  pub fn during_show(&self, hook: impl FnMut(WindowId, Modality, &WindowEvents) + Send + 'static) {
    *self.during_show.lock() = Some(Box::new(hook));
  }

  pub fn user_closes(&self, window: WindowId) {
    let events = self.events.lock().remove(&window);
    if let Some(events) = events {
      events.closed();
    }
  }

  pub fn user_activates(&self, window: WindowId) {
    let events = self.events.lock().get(&window).cloned();
    if let Some(events) = events {
      events.activated();
    }
  }

  pub fn user_deactivates(&self, window: WindowId) {
    let events = self.events.lock().get(&window).cloned();
    if let Some(events) = events {
      events.deactivated();
    }
  }

  pub fn calls(&self) -> Vec<HostCall> {
    self.calls.lock().clone()
  }
}

impl PresentationHost for RecordingHost {
  fn show(
    &self,
    window: WindowId,
    _view: &ViewHandle,
    modality: Modality,
    events: WindowEvents,
  ) -> std::result::Result<(), PresentError> {
    self.calls.lock().push(HostCall::Show(window, modality));
    if self.fail_next_show.swap(false, Ordering::SeqCst) {
      return Err(PresentError::new(window, "no display available"));
    }
    self.events.lock().insert(window, events.clone());

    let hook = self.during_show.lock().take();
    if let Some(mut hook) = hook {
      hook(window, modality, &events);
      let mut slot = self.during_show.lock();
      if slot.is_none() {
        *slot = Some(hook);
      }
    }

    if modality == Modality::Modal {
      self.user_closes(window);
    }
    Ok(())
  }

  fn close(&self, window: WindowId) {
    self.calls.lock().push(HostCall::Close(window));
    self.user_closes(window);
  }
}

// --- Scope accounting ---

/// Wraps another strategy and counts how often each created scope is disposed.
pub struct CountingStrategy {
  inner: Arc<dyn InstanceStrategy>,
  scopes: Mutex<Vec<Arc<AtomicUsize>>>,
}

impl CountingStrategy {
  pub fn new(inner: Arc<dyn InstanceStrategy>) -> Self {
    Self {
      inner,
      scopes: Mutex::new(Vec::new()),
    }
  }

  /// Dispose calls per created scope, in creation order.
  pub fn dispose_counts(&self) -> Vec<usize> {
    self.scopes.lock().iter().map(|c| c.load(Ordering::SeqCst)).collect()
  }

  pub fn created(&self) -> usize {
    self.scopes.lock().len()
  }
}

impl InstanceStrategy for CountingStrategy {
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
    self.inner.create_instance(key)
  }

  fn create_window_scope(&self) -> Result<Box<dyn WindowScope>> {
    let inner = self.inner.create_window_scope()?;
    let disposals = Arc::new(AtomicUsize::new(0));
    self.scopes.lock().push(Arc::clone(&disposals));
    Ok(Box::new(CountingScope { inner, disposals }))
  }
}

struct CountingScope {
  inner: Box<dyn WindowScope>,
  disposals: Arc<AtomicUsize>,
}

impl WindowScope for CountingScope {
  fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
    self.inner.create_instance(key)
  }

  fn dispose(&self) {
    self.disposals.fetch_add(1, Ordering::SeqCst);
    self.inner.dispose();
  }

  fn is_disposed(&self) -> bool {
    self.inner.is_disposed()
  }
}

// --- Harness ---

pub struct Harness {
  pub container: Arc<Container>,
  pub host: Arc<RecordingHost>,
  pub binder: Arc<RecordingBinder>,
  pub strategy: Arc<CountingStrategy>,
  pub session_drops: Arc<AtomicUsize>,
  pub manager: WindowManager,
}

pub fn container(session_drops: &Arc<AtomicUsize>) -> Arc<Container> {
  let container = Arc::new(Container::new());
  container.add_singleton(|_| Ok(Clock));
  let drops = Arc::clone(session_drops);
  container.add_scoped(move |_| {
    Ok(DocumentSession {
      drops: Arc::clone(&drops),
    })
  });
  container.add_transient(|r| {
    Ok(EditorViewModel {
      session: resolve!(r, DocumentSession)?,
      clock: resolve!(r, Clock)?,
    })
  });
  container.add_transient(|_| Ok(StatusViewModel));
  container.add_transient(|_| Ok(OrphanViewModel));
  container
}

pub fn harness() -> Harness {
  harness_with_config(WindowManagerConfig::default())
}

pub fn harness_with_config(config: WindowManagerConfig) -> Harness {
  let session_drops = Arc::new(AtomicUsize::new(0));
  let container = container(&session_drops);
  let host = Arc::new(RecordingHost::default());
  let binder = Arc::new(RecordingBinder::default());
  let strategy = Arc::new(CountingStrategy::new(Arc::new(ContainerStrategy::new(&container))));
  let manager = WindowManager::with_config(
    strategy.clone(),
    Arc::new(TestViews),
    binder.clone(),
    host.clone(),
    config,
  );
  Harness {
    container,
    host,
    binder,
    strategy,
    session_drops,
    manager,
  }
}

impl Harness {
  pub fn drops(&self) -> usize {
    self.session_drops.load(Ordering::SeqCst)
  }
}
