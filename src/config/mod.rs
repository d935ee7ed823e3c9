//! Application configuration
//!
//! Everything the relay needs is read once at startup into [`Config`] and passed
//! down explicitly. Request handlers never look at the process environment.

pub mod prompts;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub use prompts::{PromptError, PromptTemplate};

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_VERTEX_LOCATION: &str = "us-central1";

/// Secret used to authorize upstream calls. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Which upstream API flavour to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Generative Language API, key sent as `x-goog-api-key`
    #[default]
    Gemini,
    /// Vertex AI, credential sent as a bearer token
    Vertex,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "" => Ok(Backend::Gemini),
            "vertex" | "vertexai" => Ok(Backend::Vertex),
            other => Err(ConfigError::Invalid {
                var: "MODEL_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: ApiKey,
    pub model_id: String,
    pub backend: Backend,
    /// Overrides the upstream base URL (proxies, local mocks)
    pub api_base: Option<String>,
    pub vertex_project: Option<String>,
    pub vertex_location: String,
    pub upstream_timeout: Duration,
    pub static_dir: PathBuf,
    pub system_prompt_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("MODEL_API_KEY")
            .map(|k| ApiKey::new(k.trim()))
            .ok_or(ConfigError::MissingCredential)?;

        let port = match var("PORT") {
            Some(p) => p.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: p,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(t) => match t.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "UPSTREAM_TIMEOUT_SECS",
                        value: t,
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let backend = match var("MODEL_BACKEND") {
            Some(b) => b.parse()?,
            None => Backend::default(),
        };

        let vertex_project = var("VERTEX_PROJECT");
        if backend == Backend::Vertex && vertex_project.is_none() {
            return Err(ConfigError::MissingVertexProject);
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port,
            api_key,
            model_id: var("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.into()),
            backend,
            api_base: var("MODEL_API_BASE").map(|b| b.trim_end_matches('/').to_string()),
            vertex_project,
            vertex_location: var("VERTEX_LOCATION")
                .unwrap_or_else(|| DEFAULT_VERTEX_LOCATION.into()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            system_prompt_file: var("SYSTEM_PROMPT_FILE").map(PathBuf::from),
        })
    }
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MODEL_API_KEY is not set; refusing to start without an upstream credential")]
    MissingCredential,

    #[error("VERTEX_PROJECT is required when MODEL_BACKEND=vertex")]
    MissingVertexProject,

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
