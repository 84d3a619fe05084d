//! Black-box integration harness for the Gilgamesh history service.
//!
//! Resolves a deployment's base URL from its environment name, then drives
//! `GET /health`, `POST /messages` and `GET /messages` and checks what comes
//! back.

pub mod common;
pub mod config;
pub mod error;
pub mod harness;
pub mod network;

pub use config::{Environment, HarnessConfig};
pub use error::{ConfigError, HarnessError};
pub use harness::{Harness, SuiteReport, TestCase};
pub use network::GilgameshClient;
