//! Public macros for ergonomic service resolution inside factories.

/// Resolves a service from a [`Resolver`](crate::Resolver), a
/// [`Scope`](crate::Scope) or a [`Container`](crate::Container).
///
/// The macro expands to a `get` call and evaluates to a
/// `Result<Arc<_>, ResolveError>`, so it composes with `?` inside factories.
///
/// # Examples
///
/// ```
/// use casement_ioc::{resolve, Container};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { url: String }
///
/// let container = Arc::new(Container::new());
/// container.add_instance(Config { url: "sqlite://memory".to_string() });
/// container.add_scoped(|r| {
///   let config = resolve!(r, Config)?;
///   Ok(Database { url: config.url.clone() })
/// });
///
/// let scope = container.create_scope();
/// let db = resolve!(scope, Database).unwrap();
/// assert_eq!(db.url, "sqlite://memory");
/// ```
///
/// ```
/// use casement_ioc::{resolve, Container};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let container = Container::new();
/// container.add_singleton_trait::<dyn Greeter>(|_| Ok(Arc::new(EnglishGreeter)));
///
/// let greeter = resolve!(container, trait Greeter).unwrap();
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for resolving a trait object: resolve!(r, trait MyTrait)
    ($resolver:expr, trait $trait_ident:ident) => {
        $resolver.get::<dyn $trait_ident>(None)
    };

    // Arm for resolving a named trait object: resolve!(r, trait MyTrait, "name")
    ($resolver:expr, trait $trait_ident:ident, $name:expr) => {
        $resolver.get::<dyn $trait_ident>(Some($name))
    };

    // Arm for resolving a concrete type: resolve!(r, MyService)
    ($resolver:expr, $type:ty) => {
        $resolver.get::<$type>(None)
    };

    // Arm for resolving a named concrete type: resolve!(r, MyService, "name")
    ($resolver:expr, $type:ty, $name:expr) => {
        $resolver.get::<$type>(Some($name))
    };
}
