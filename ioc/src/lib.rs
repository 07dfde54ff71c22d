//! # Casement IoC
//!
//! A small, thread-safe Inversion of Control (IoC) container with child
//! resolution scopes.
//!
//! ## Core Concepts
//!
//! - **Container**: The central registry for all services and the owner of
//!   singleton instances.
//! - **Lifetimes**: Services are registered as singletons (one per container),
//!   scoped (one per [`Scope`]) or transient (fresh on every resolution).
//! - **Scope**: An isolated child context. Disposing it releases every scoped
//!   instance it created; disposal is idempotent.
//! - **Resolution**: Fallible. Missing registrations, circular dependencies and
//!   use of a disposed scope are reported as [`ResolveError`]s.
//! - **Traits**: Services can be registered against a trait and resolved as a
//!   trait object.
//!
//! ## Quick Start
//!
//! ```
//! use casement_ioc::{resolve, Container};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!     message: String,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         self.message.clone()
//!     }
//! }
//!
//! struct Session;
//!
//! let container = Arc::new(Container::new());
//! container.add_instance_with_name("greeting_message", String::from("Hello, World!"));
//! container.add_singleton_trait::<dyn Greeter>(|r| {
//!     let message = resolve!(r, String, "greeting_message")?;
//!     Ok(Arc::new(EnglishGreeter { message: (*message).clone() }))
//! });
//! container.add_scoped(|_| Ok(Session));
//!
//! let scope = container.create_scope();
//! let greeter = resolve!(scope, trait Greeter).unwrap();
//! assert_eq!(greeter.greet(), "Hello, World!");
//!
//! let a = resolve!(scope, Session).unwrap();
//! let b = resolve!(scope, Session).unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! scope.dispose();
//! ```

mod container;
mod core;
mod error;
mod macros;
mod scope;

pub use container::{Container, Resolver};
pub use core::{downcast_instance, erase, Instance, Lifetime, ServiceKey};
pub use error::{ResolveError, Result};
pub use scope::Scope;
