use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use gilgamesh_probe::config::{self, ENVIRONMENT_VAR, Environment};
use gilgamesh_probe::{Harness, HarnessError, TestCase};

#[derive(Parser)]
#[command(
    name = "gilgamesh_probe",
    version,
    about = "Integration checks against a Gilgamesh deployment"
)]
struct Cli {
    /// Target deployment: prod, staging, dev or local
    #[arg(long, env = ENVIRONMENT_VAR, default_value = "local", value_name = "NAME")]
    env: String,
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Hit this URL instead of the one configured for the environment
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Run every check (default)
    All,
    /// Only check `GET /health`
    Health,
    /// Only run the message read/write checks
    Messages,
}

impl Mode {
    fn cases(self) -> &'static [TestCase] {
        match self {
            Mode::All => &TestCase::ALL,
            Mode::Health => &[TestCase::Health],
            Mode::Messages => &TestCase::MESSAGES,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let harness = match build_harness(&cli) {
        Ok(harness) => harness,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    log::info!("Target base URL: {}", harness.client().base_url());
    let report = harness.run(cli.mode.unwrap_or(Mode::All).cases()).await;
    println!("{report}");

    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_harness(cli: &Cli) -> Result<Harness, HarnessError> {
    let app_config = config::load_config(&cli.config)?;
    let environment: Environment = cli.env.parse::<Environment>()?;

    match &cli.base_url {
        Some(raw) => {
            let url = config::parse_base_url(environment.as_str(), raw)?;
            Harness::with_base_url(&app_config, environment, url)
        }
        None => Harness::new(&app_config, environment),
    }
}
