//! # Casement
//!
//! Window lifecycle management for MVVM applications.
//!
//! Every window shown through a [`WindowManager`] gets its own resolution
//! scope. Services registered as scoped live exactly as long as the window:
//! they are created inside the window's scope and released, once, when the
//! window closes. The manager also keeps track of the active window so
//! dialogs and message boxes know where to anchor.
//!
//! The manager does not draw anything. It drives three collaborators:
//!
//! - a [`ViewProvider`] that finds the view for a view model,
//! - a [`Binder`] that wires the two together,
//! - a [`PresentationHost`] that puts windows on screen and reports back
//!   through [`WindowEvents`].
//!
//! How instances and scopes are created is pluggable through
//! [`InstanceStrategy`]: [`ContainerStrategy`] uses a `casement_ioc`
//! container, [`ActivatorStrategy`] plain constructors.
//!
//! ## Quick Start
//!
//! ```
//! use casement::{
//!   Binder, BindingError, MvvmExtensions, Modality, PresentError, PresentationHost, ViewHandle,
//!   ViewModel, ViewProvider, WindowEvents, WindowId, WindowManager, WindowScope,
//! };
//! use casement_ioc::Container;
//! use std::sync::Arc;
//!
//! struct Views;
//! impl ViewProvider for Views {
//!   fn resolve_view_for(&self, vm: &ViewModel, _: &dyn WindowScope) -> Result<ViewHandle, BindingError> {
//!     Ok(ViewHandle::new(Arc::new(vm.type_name())))
//!   }
//! }
//!
//! struct NoBinding;
//! impl Binder for NoBinding {
//!   fn bind(&self, _: &ViewHandle, _: &ViewModel) -> Result<(), BindingError> {
//!     Ok(())
//!   }
//! }
//!
//! struct Headless;
//! impl PresentationHost for Headless {
//!   fn show(&self, _: WindowId, _: &ViewHandle, _: Modality, _: WindowEvents) -> Result<(), PresentError> {
//!     Ok(())
//!   }
//!   fn close(&self, _: WindowId) {}
//! }
//!
//! struct Document;
//! struct EditorViewModel {
//!   document: Arc<Document>,
//! }
//!
//! let container = Arc::new(Container::new());
//! container.add_singleton_trait::<dyn ViewProvider>(|_| Ok(Arc::new(Views)));
//! container.add_singleton_trait::<dyn PresentationHost>(|_| Ok(Arc::new(Headless)));
//! container.add_scoped(|_| Ok(Document));
//! container.add_transient(|r| Ok(EditorViewModel { document: r.get(None)? }));
//! container.add_mvvm(Arc::new(NoBinding));
//!
//! let manager = container.get::<WindowManager>(None).unwrap();
//! let first = manager.show::<EditorViewModel>(Modality::Modeless).unwrap();
//! let second = manager.show::<EditorViewModel>(Modality::Modeless).unwrap();
//! assert_eq!(manager.active_window(), Some(second));
//!
//! // Each window got its own document.
//! let a = manager.view_model(first).unwrap().downcast::<EditorViewModel>().unwrap();
//! let b = manager.view_model(second).unwrap().downcast::<EditorViewModel>().unwrap();
//! assert!(!Arc::ptr_eq(&a.document, &b.document));
//!
//! manager.close(second);
//! assert_eq!(manager.active_window(), Some(first));
//! manager.close(first);
//! ```

mod config;
mod error;
mod manager;
mod presentation;
mod registration;
mod registry;
mod scope;
pub mod services;
mod strategy;

pub use config::{CloseFocus, WindowManagerConfig};
pub use error::{BindingError, ConfigError, PresentError, Result, WindowError};
pub use manager::{ActiveWindowTracker, WindowManager, WindowService, WindowTracker};
pub use presentation::{
  Binder, Modality, PresentationHost, ViewHandle, ViewModel, ViewModelSource, ViewProvider, WindowEvents, WindowId,
};
pub use registration::MvvmExtensions;
pub use scope::{ContainerWindowScope, WindowScope};
pub use strategy::{ActivatorStrategy, ActivatorWindowScope, ContainerStrategy, InstanceStrategy};
