//! Startup configuration: where the API key comes from and which model and
//! endpoint the gateway talks to.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::debug;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/";
pub const API_KEY_VAR: &str = "MISTRAL_API_KEY";
pub const SECRETS_FILE_NAME: &str = "secrets.toml";

/// A single place an API key may be found.
pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> String;

    /// `Ok(None)` means "nothing here, try the next provider".
    fn api_key(&self) -> Result<Option<String>, ConfigError>;
}

/// A key passed directly, e.g. on the command line.
pub struct ExplicitKey(pub Option<String>);

impl CredentialProvider for ExplicitKey {
    fn name(&self) -> String {
        "command line".to_string()
    }

    fn api_key(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.0.clone())
    }
}

/// A key read from an environment variable.
pub struct EnvironmentKey {
    var: String,
}

impl EnvironmentKey {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvironmentKey {
    fn name(&self) -> String {
        format!("environment variable {}", self.var)
    }

    fn api_key(&self) -> Result<Option<String>, ConfigError> {
        Ok(env::var(&self.var).ok())
    }
}

/// A key read from a TOML secret file such as:
///
/// ```toml
/// MISTRAL_API_KEY = "your_api_key_here"
/// ```
///
/// A missing file is not an error; an unreadable or malformed one is.
pub struct SecretStoreKey {
    path: PathBuf,
    key: String,
}

impl SecretStoreKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: API_KEY_VAR.to_string(),
        }
    }

    /// `<config dir>/banking-assistant/secrets.toml`, when the platform has one.
    pub fn user_config() -> Option<Self> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("banking-assistant").join(SECRETS_FILE_NAME)))
    }
}

impl CredentialProvider for SecretStoreKey {
    fn name(&self) -> String {
        format!("secret store {}", self.path.display())
    }

    fn api_key(&self) -> Result<Option<String>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let secret_error = |message: String| ConfigError::SecretStore {
            path: self.path.clone(),
            message,
        };

        let raw = fs::read_to_string(&self.path).map_err(|e| secret_error(e.to_string()))?;
        let table: toml::Table = raw
            .parse()
            .map_err(|e: toml::de::Error| secret_error(e.to_string()))?;

        match table.get(&self.key) {
            None => Ok(None),
            Some(toml::Value::String(key)) => Ok(Some(key.clone())),
            Some(other) => Err(secret_error(format!(
                "{} must be a string, found {}",
                self.key,
                other.type_str()
            ))),
        }
    }
}

/// Providers tried in order; the first non-empty key wins.
#[derive(Default)]
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Command line, then `MISTRAL_API_KEY`, then the secret store.
    ///
    /// With an explicit `secrets` path only that file is consulted; otherwise
    /// `./secrets.toml` and then the per-user config file.
    pub fn standard(explicit: Option<String>, secrets: Option<PathBuf>) -> Self {
        let mut chain = Self::new()
            .with(ExplicitKey(explicit))
            .with(EnvironmentKey::new(API_KEY_VAR));

        match secrets {
            Some(path) => chain = chain.with(SecretStoreKey::new(path)),
            None => {
                chain = chain.with(SecretStoreKey::new(SECRETS_FILE_NAME));
                if let Some(store) = SecretStoreKey::user_config() {
                    chain = chain.with(store);
                }
            }
        }

        chain
    }

    pub fn resolve(&self) -> Result<String, ConfigError> {
        for provider in &self.providers {
            if let Some(key) = provider.api_key()? {
                let key = key.trim();
                if !key.is_empty() {
                    debug!("API key found in {}", provider.name());
                    return Ok(key.to_string());
                }
            }
        }
        Err(ConfigError::MissingCredential)
    }
}

/// Everything needed to construct a gateway.
#[derive(Clone)]
pub struct BotConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: Url,
}

impl BotConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: parse_endpoint(DEFAULT_ENDPOINT)?,
        })
    }

    pub fn resolve(chain: &CredentialChain) -> Result<Self, ConfigError> {
        Self::new(chain.resolve()?)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
        self.endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

/// Parses a base URL, forcing a trailing slash so relative joins append
/// rather than replace the last path segment.
fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEndpoint {
            url: raw.to_string(),
            message: "not a base URL".to_string(),
        });
    }

    Ok(url)
}
