use casement_ioc::{Container, ResolveError};

struct UnregisteredService;

fn main() {
  let container = Container::new();

  println!("Attempting to resolve a service that was never registered...");
  match container.get::<UnregisteredService>(None) {
    Ok(_) => panic!("Should not have found the service!"),
    Err(err @ ResolveError::Unregistered { .. }) => println!("Correctly failed: {err}"),
    Err(other) => panic!("Unexpected error: {other}"),
  }
}
