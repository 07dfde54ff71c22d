//! Registers the window manager and its companions in a container.

use crate::config::WindowManagerConfig;
use crate::manager::{ActiveWindowTracker, WindowManager, WindowService};
use crate::presentation::{Binder, PresentationHost, ViewProvider};
use crate::services::{DirectoryPickerService, FilePickerService, MessageService};
use crate::strategy::ContainerStrategy;
use casement_ioc::{resolve, Container, ResolveError};
use std::any::Any;
use std::sync::Arc;

/// Builder-style registration of the MVVM services.
///
/// Registrations follow the container's rules: calling a method twice
/// replaces the earlier registrations, the last one wins.
pub trait MvvmExtensions {
  /// Registers `binder` as `dyn Binder`, a singleton [`WindowManager`] and the
  /// same manager as `dyn WindowService` and `dyn ActiveWindowTracker`.
  ///
  /// The manager is built on first resolution from the container's
  /// `dyn ViewProvider` and `dyn PresentationHost` registrations and, if
  /// present, a [`WindowManagerConfig`] instance. It resolves view models
  /// through this container, one scope per window.
  fn add_mvvm(&self, binder: Arc<dyn Binder>) -> &Self;

  /// Registers `dialogs` as itself and as the file and directory picker
  /// services, all backed by the same instance.
  fn add_file_dialogs<D>(&self, dialogs: D) -> &Self
  where
    D: FilePickerService + DirectoryPickerService + Any;

  /// Registers the message box presenter.
  fn add_message_display(&self, presenter: Arc<dyn MessageService>) -> &Self;
}

impl MvvmExtensions for Arc<Container> {
  fn add_mvvm(&self, binder: Arc<dyn Binder>) -> &Self {
    self.add_singleton_trait::<dyn Binder>(move |_| Ok(Arc::clone(&binder)));

    let container = Arc::downgrade(self);
    self.add_singleton(move |r| {
      let config = match resolve!(r, WindowManagerConfig) {
        Ok(config) => (*config).clone(),
        Err(ResolveError::Unregistered { .. }) => WindowManagerConfig::default(),
        Err(other) => return Err(other),
      };
      Ok(WindowManager::with_config(
        Arc::new(ContainerStrategy::from_weak(container.clone())),
        resolve!(r, trait ViewProvider)?,
        resolve!(r, trait Binder)?,
        resolve!(r, trait PresentationHost)?,
        config,
      ))
    });

    self.add_singleton_trait::<dyn WindowService>(|r| {
      let manager: Arc<dyn WindowService> = resolve!(r, WindowManager)?;
      Ok(manager)
    });
    self.add_singleton_trait::<dyn ActiveWindowTracker>(|r| {
      let manager: Arc<dyn ActiveWindowTracker> = resolve!(r, WindowManager)?;
      Ok(manager)
    });

    tracing::debug!("registered window manager services");
    self
  }

  fn add_file_dialogs<D>(&self, dialogs: D) -> &Self
  where
    D: FilePickerService + DirectoryPickerService + Any,
  {
    self.add_instance(dialogs);
    self.add_singleton_trait::<dyn FilePickerService>(|r| {
      let dialogs: Arc<dyn FilePickerService> = resolve!(r, D)?;
      Ok(dialogs)
    });
    self.add_singleton_trait::<dyn DirectoryPickerService>(|r| {
      let dialogs: Arc<dyn DirectoryPickerService> = resolve!(r, D)?;
      Ok(dialogs)
    });
    self
  }

  fn add_message_display(&self, presenter: Arc<dyn MessageService>) -> &Self {
    self.add_singleton_trait::<dyn MessageService>(move |_| Ok(Arc::clone(&presenter)));
    self
  }
}
