use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::config::Environment;
use crate::error::HarnessError;

use super::cases::TestCase;

/// Result of running one test case.
#[derive(Debug)]
pub struct CaseOutcome {
    pub case: TestCase,
    pub error: Option<HarnessError>,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything one suite run produced, in execution order.
#[derive(Debug)]
pub struct SuiteReport {
    pub environment: Environment,
    pub base_url: Url,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn new(environment: Environment, base_url: Url) -> Self {
        Self {
            environment,
            base_url,
            started_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    /// True only when at least one case ran and none failed.
    pub fn passed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }

    pub fn outcome(&self, case: TestCase) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|outcome| outcome.case == case)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Gilgamesh [{}] {} (started {})",
            self.environment,
            self.base_url,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        for outcome in &self.outcomes {
            let millis = outcome.elapsed.as_millis();
            match &outcome.error {
                None => writeln!(f, "  ✓ {} ({millis} ms)", outcome.case)?,
                Some(err) => writeln!(f, "  ✗ {} ({millis} ms): {err}", outcome.case)?,
            }
        }

        let failed = self.failures().count();
        write!(
            f,
            "{} passed, {} failed",
            self.outcomes.len() - failed,
            failed
        )
    }
}
