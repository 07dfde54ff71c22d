use casement_ioc::{resolve, Container};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() -> Result<(), casement_ioc::ResolveError> {
  let container = Arc::new(Container::new());

  // The container stores Arc<ConsoleLogger> but serves it as Arc<dyn Logger>.
  container.add_singleton_trait::<dyn Logger>(|_| Ok(Arc::new(ConsoleLogger)));

  // One report service per scope; its factory resolves the logger.
  container.add_scoped(|r| {
    Ok(ReportService {
      logger: resolve!(r, trait Logger)?,
    })
  });

  let scope = container.create_scope();
  let report_service = resolve!(scope, ReportService)?;
  report_service.generate_report();
  Ok(())
}
