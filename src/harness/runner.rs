use std::time::Instant;

use reqwest::Url;

use crate::config::{Environment, HarnessConfig};
use crate::error::Result;
use crate::network::GilgameshClient;

use super::cases::TestCase;
use super::report::{CaseOutcome, SuiteReport};

/// Runs test cases against one deployment, strictly one after another.
pub struct Harness {
    environment: Environment,
    client: GilgameshClient,
}

impl Harness {
    /// Target the base URL the config assigns to `environment`.
    pub fn new(config: &HarnessConfig, environment: Environment) -> Result<Self> {
        let base_url = config.base_url(environment).clone();
        Self::with_base_url(config, environment, base_url)
    }

    /// Target an explicit URL while still reporting under `environment`.
    pub fn with_base_url(
        config: &HarnessConfig,
        environment: Environment,
        base_url: Url,
    ) -> Result<Self> {
        let client = GilgameshClient::new(base_url, config)?;
        Ok(Self {
            environment,
            client,
        })
    }

    pub fn client(&self) -> &GilgameshClient {
        &self.client
    }

    /// A failing case is recorded and the next case still runs.
    pub async fn run(&self, cases: &[TestCase]) -> SuiteReport {
        let mut report = SuiteReport::new(self.environment, self.client.base_url().clone());
        log::info!(
            "Running {} case(s) against {} ({})",
            cases.len(),
            self.environment,
            self.client.base_url()
        );

        for case in cases {
            let started = Instant::now();
            let result = case.run(&self.client).await;
            let elapsed = started.elapsed();

            match &result {
                Ok(()) => log::info!("{case} passed in {elapsed:?}"),
                Err(err) => log::error!("{case} failed: {err}"),
            }

            report.push(CaseOutcome {
                case: *case,
                error: result.err(),
                elapsed,
            });
        }

        report
    }
}
