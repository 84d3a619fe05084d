pub mod cases;
pub mod report;
pub mod runner;

pub use cases::TestCase;
pub use report::{CaseOutcome, SuiteReport};
pub use runner::Harness;
