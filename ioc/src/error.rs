use thiserror::Error;

/// Errors raised while resolving services from a [`Container`](crate::Container)
/// or one of its scopes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  #[error(
    "no registration for service {type_name}{}",
    .name.as_deref().map(|n| format!(" named '{n}'")).unwrap_or_default()
  )]
  Unregistered {
    type_name: &'static str,
    name: Option<String>,
  },

  #[error("circular dependency detected while resolving service {type_name}")]
  CircularDependency { type_name: &'static str },

  #[error("scoped service {type_name} cannot be resolved outside of a scope")]
  ScopeRequired { type_name: &'static str },

  #[error("the resolution scope has already been disposed")]
  ScopeDisposed,

  #[error("the container this scope was created from has been dropped")]
  ContainerDropped,

  #[error("failed to construct service {type_name}: {message}")]
  Construction {
    type_name: &'static str,
    message: String,
  },
}

impl ResolveError {
  /// Builds a [`ResolveError::Construction`] for `T`, for factories that fail
  /// for reasons of their own.
  pub fn construction<T: ?Sized>(message: impl Into<String>) -> Self {
    ResolveError::Construction {
      type_name: std::any::type_name::<T>(),
      message: message.into(),
    }
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
