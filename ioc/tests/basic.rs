use casement_ioc::{resolve, Container, Lifetime, ResolveError};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// --- Test Fixtures ---

// The trait must be Send + Sync for the container to accept it.
trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

// A simple struct for testing.
#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

// --- Basic Tests ---

#[test]
fn test_unnamed_singleton_factory() {
  // Arrange
  let container = Container::new();
  container.add_singleton(|_| Ok(SimpleService { id: 101 }));

  // Act
  let r1 = resolve!(container, SimpleService).unwrap();
  let r2 = resolve!(container, SimpleService).unwrap();

  // Assert
  assert_eq!(r1.id, 101);
  // Ensure it's a singleton by checking pointer equality.
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_named_singleton_instance() {
  // Arrange
  let container = Container::new();
  container.add_instance_with_name("named_instance", SimpleService { id: 202 });

  // Act
  let r1 = resolve!(container, SimpleService, "named_instance").unwrap();
  let r2 = resolve!(container, SimpleService, "named_instance").unwrap();

  // Assert
  assert_eq!(r1.id, 202);
  assert!(Arc::ptr_eq(&r1, &r2));
  // The unnamed key is a different registration.
  assert!(!container.contains::<SimpleService>(None));
}

#[test]
fn test_unnamed_transient_factory() {
  // Arrange
  let container = Container::new();
  container.add_transient(|_| Ok(SimpleService { id: 303 }));

  // Act
  let r1 = resolve!(container, SimpleService).unwrap();
  let r2 = resolve!(container, SimpleService).unwrap();

  // Assert
  assert_eq!(*r1, *r2);
  // Ensure it's a transient by checking the pointers are different.
  assert!(!Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_unnamed_trait_resolution() {
  // Arrange
  let container = Container::new();
  container.add_singleton_trait::<dyn Greeter>(|_| Ok(Arc::new(EnglishGreeter)));

  // Act
  let greeter = resolve!(container, trait Greeter).unwrap();

  // Assert
  assert_eq!(greeter.greet(), "Hello!");
}

#[test]
fn test_named_trait_resolution() {
  // Arrange
  struct GermanGreeter;
  impl Greeter for GermanGreeter {
    fn greet(&self) -> String {
      "Hallo!".to_string()
    }
  }
  let container = Container::new();
  container.add_singleton_trait_with_name::<dyn Greeter>("german", |_| Ok(Arc::new(GermanGreeter)));

  // Act
  let greeter = resolve!(container, trait Greeter, "german").unwrap();

  // Assert
  assert_eq!(greeter.greet(), "Hallo!");
}

#[test]
fn test_missing_concrete_service_is_an_error() {
  struct MissingService;
  let container = Container::new();

  let err = resolve!(container, MissingService).err().unwrap();

  match err {
    ResolveError::Unregistered { type_name, name } => {
      assert!(type_name.ends_with("MissingService"));
      assert_eq!(name, None);
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_missing_named_trait_service_reports_the_name() {
  trait MissingTrait: Send + Sync {}
  let container = Container::new();

  let err = resolve!(container, trait MissingTrait, "nowhere").err().unwrap();

  assert!(err.to_string().contains("named 'nowhere'"), "got: {err}");
}

#[test]
fn test_lifetime_introspection() {
  struct A;
  struct B;
  struct C;
  let container = Container::new();
  container.add_singleton(|_| Ok(A));
  container.add_scoped(|_| Ok(B));
  container.add_transient(|_| Ok(C));

  assert_eq!(container.lifetime_of::<A>(None), Some(Lifetime::Singleton));
  assert_eq!(container.lifetime_of::<B>(None), Some(Lifetime::Scoped));
  assert_eq!(container.lifetime_of::<C>(None), Some(Lifetime::Transient));
  assert_eq!(container.lifetime_of::<String>(None), None);
}

#[test]
fn test_factory_failure_is_not_cached() {
  use std::sync::atomic::{AtomicUsize, Ordering};

  struct Flaky;
  static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

  // Arrange: the first construction fails, later ones succeed.
  let container = Container::new();
  container.add_singleton(|_| {
    if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
      Err(ResolveError::construction::<Flaky>("not ready yet"))
    } else {
      Ok(Flaky)
    }
  });

  // Act & Assert
  assert!(matches!(
    container.get::<Flaky>(None),
    Err(ResolveError::Construction { .. })
  ));
  assert!(container.get::<Flaky>(None).is_ok());
  assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
}
