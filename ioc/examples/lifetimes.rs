use casement_ioc::{resolve, Container};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tracker() -> RequestTracker {
  RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }
}

fn main() -> Result<(), casement_ioc::ResolveError> {
  let container = Arc::new(Container::new());

  // Created once for the whole container.
  container.add_singleton_with_name("singleton_tracker", |_| Ok(tracker()));
  // Created once per scope.
  container.add_scoped_with_name("scoped_tracker", |_| Ok(tracker()));
  // Created on every resolution.
  container.add_transient_with_name("transient_tracker", |_| Ok(tracker()));

  let first = container.create_scope();
  let second = container.create_scope();

  println!("--- Singletons ---");
  let s1 = resolve!(first, RequestTracker, "singleton_tracker")?;
  let s2 = resolve!(second, RequestTracker, "singleton_tracker")?;
  println!("first scope: {}, second scope: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2));

  println!("--- Scoped ---");
  let a1 = resolve!(first, RequestTracker, "scoped_tracker")?;
  let a2 = resolve!(first, RequestTracker, "scoped_tracker")?;
  let b1 = resolve!(second, RequestTracker, "scoped_tracker")?;
  println!("first scope: {} / {}, second scope: {}", a1.id, a2.id, b1.id);
  assert!(Arc::ptr_eq(&a1, &a2));
  assert!(!Arc::ptr_eq(&a1, &b1));

  println!("--- Transients ---");
  let t1 = resolve!(first, RequestTracker, "transient_tracker")?;
  let t2 = resolve!(first, RequestTracker, "transient_tracker")?;
  println!("{} / {}", t1.id, t2.id);
  assert!(!Arc::ptr_eq(&t1, &t2));

  first.dispose();
  println!("first scope disposed: {}", first.is_disposed());
  assert!(resolve!(first, RequestTracker, "scoped_tracker").is_err());
  Ok(())
}
