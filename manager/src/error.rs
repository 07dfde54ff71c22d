use crate::presentation::WindowId;
use casement_ioc::ResolveError;
use thiserror::Error;

/// The main error type for window management.
#[derive(Debug, Error)]
pub enum WindowError {
  #[error(
    "no registration for type {type_name}{}",
    .name.as_deref().map(|n| format!(" named '{n}'")).unwrap_or_default()
  )]
  UnresolvedType {
    type_name: &'static str,
    name: Option<String>,
  },

  #[error("the window scope has already been disposed")]
  ScopeDisposed,

  #[error(transparent)]
  ViewBinding(#[from] BindingError),

  #[error(transparent)]
  Presentation(#[from] PresentError),

  #[error("service resolution failed: {0}")]
  Resolution(ResolveError),

  #[error("the service container backing this window manager has been dropped")]
  ContainerUnavailable,
}

impl From<ResolveError> for WindowError {
  fn from(err: ResolveError) -> Self {
    match err {
      ResolveError::Unregistered { type_name, name } => WindowError::UnresolvedType { type_name, name },
      ResolveError::ScopeDisposed => WindowError::ScopeDisposed,
      ResolveError::ContainerDropped => WindowError::ContainerUnavailable,
      other => WindowError::Resolution(other),
    }
  }
}

/// Raised by a view provider or binder while preparing a window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
  #[error("no view is known for view model {view_model}")]
  NoView { view_model: &'static str },

  #[error("failed to bind view model {view_model}: {message}")]
  Failed {
    view_model: &'static str,
    message: String,
  },
}

/// Raised by the presentation host when a window cannot be shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to present {window}: {message}")]
pub struct PresentError {
  pub window: WindowId,
  pub message: String,
}

impl PresentError {
  pub fn new(window: WindowId, message: impl Into<String>) -> Self {
    Self {
      window,
      message: message.into(),
    }
  }
}

/// Errors raised while loading a [`WindowManagerConfig`](crate::WindowManagerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read configuration file: {0}")]
  Read(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  Parse(String),
}

/// A specialized `Result` type for window management operations.
pub type Result<T, E = WindowError> = std::result::Result<T, E>;
