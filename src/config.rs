use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config/gilgamesh.json";

/// Environment variable naming the target deployment.
pub const ENVIRONMENT_VAR: &str = "GILGAMESH_ENV";

const PROD_URL: &str = "https://history.walletconnect.com";
const STAGING_URL: &str = "https://staging.history.walletconnect.com";
const DEV_URL: &str = "https://dev.history.walletconnect.com";
const LOCAL_URL: &str = "http://localhost:3000";

/// Named deployment the harness can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Environment {
    Prod,
    Staging,
    Dev,
    Local,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Prod,
        Environment::Staging,
        Environment::Dev,
        Environment::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Staging => "staging",
            Environment::Dev => "dev",
            Environment::Local => "local",
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            Environment::Prod => PROD_URL,
            Environment::Staging => STAGING_URL,
            Environment::Dev => DEV_URL,
            Environment::Local => LOCAL_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyEnvironment);
        }

        Environment::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
    }
}

/// On-disk shape of the config file. Every field is optional so a partial
/// file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    /// Keyed by environment name, matched case-insensitively like `--env`.
    #[serde(default)]
    base_urls: BTreeMap<String, String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    bearer_token: Option<String>,
}

/// Immutable harness configuration, built once at startup and handed to the
/// harness by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    base_urls: BTreeMap<Environment, Url>,
    request_timeout: Option<Duration>,
    bearer_token: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let base_urls = Environment::ALL
            .into_iter()
            .map(|env| {
                let url = Url::parse(env.default_url()).expect("built-in base URL is valid");
                (env, url)
            })
            .collect();

        Self {
            base_urls,
            request_timeout: None,
            bearer_token: None,
        }
    }
}

impl HarnessConfig {
    /// Parse a config document. URLs are validated here so a bad entry is
    /// reported at load time rather than on the first request.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = HarnessConfig::default();
        for (name, raw) in file.base_urls {
            let env: Environment = name.parse()?;
            config.base_urls.insert(env, parse_base_url(env.as_str(), &raw)?);
        }
        config.request_timeout = file
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        config.bearer_token = file.bearer_token.filter(|token| !token.trim().is_empty());

        Ok(config)
    }

    /// Look up the base URL for an environment name such as `"staging"`.
    pub fn resolve_base_url(&self, environment_name: &str) -> Result<Url, ConfigError> {
        let env: Environment = environment_name.parse()?;
        Ok(self.base_url(env).clone())
    }

    pub fn base_url(&self, env: Environment) -> &Url {
        // Default fills every variant and from_json only replaces entries.
        &self.base_urls[&env]
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn with_base_url(mut self, env: Environment, url: Url) -> Self {
        self.base_urls.insert(env, url);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Accept only absolute http(s) URLs; anything else would surface later as an
/// obscure network error.
pub fn parse_base_url(environment: &str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        environment: environment.to_string(),
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{other}`"))),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// Load the config file at `path`. A missing file is not an error: the
/// built-in URLs are used instead.
pub fn load_config(path: &str) -> Result<HarnessConfig, ConfigError> {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => {
            let config = HarnessConfig::from_json(&content, path)?;
            log::debug!("Loaded harness config from {}", path.display());
            Ok(config)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            Ok(HarnessConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
