use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{CompassError, Result};
use crate::models::ModelTier;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Main configuration structure for EGYMI Compass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Service credential. Empty means every operation fails with a configuration error.
    pub api_key: String,
    pub base_url: String,
    /// Model for analysis, latest-changes and knowledge lookups
    pub model_fast: String,
    /// High-capacity model for regulation detail lookups
    pub model_deep: String,
    /// Thinking budget granted to regulation detail lookups
    pub detail_reasoning_budget: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub path: String,
    pub bearer_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "egymi-compass".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_fast: "gemini-3-flash-preview".to_string(),
            model_deep: "gemini-3-pro-preview".to_string(),
            detail_reasoning_budget: 8192,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8788".to_string(),
            path: "/mcp".to_string(),
            bearer_token: None,
        }
    }
}

impl GeminiConfig {
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.model_fast,
            ModelTier::Deep => &self.model_deep,
        }
    }

    /// Fails fast when no credential is configured.
    pub fn require_credential(&self) -> Result<&str> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(CompassError::Config(
                "GEMINI_API_KEY (or API_KEY) must be set".to_string(),
            ));
        }
        Ok(key)
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = [".env", "../.env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("EGYMI_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match Self::from_yaml(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok());

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Apply overrides from a variable source (the process environment in production).
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Set-but-blank variables (e.g. `GEMINI_API_KEY=` in a .env template) count as unset.
        let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        if let Some(name) = var("EGYMI_SERVER_NAME") {
            self.server.name = name;
        }

        // Gemini overrides
        if let Some(api_key) = var("GEMINI_API_KEY").or_else(|| var("API_KEY")) {
            self.gemini.api_key = api_key;
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(model_fast) = var("GEMINI_MODEL_FAST") {
            self.gemini.model_fast = model_fast;
        }
        if let Some(model_deep) = var("GEMINI_MODEL_DEEP") {
            self.gemini.model_deep = model_deep;
        }
        if let Some(budget) = var("GEMINI_DETAIL_REASONING_BUDGET") {
            match budget.parse() {
                Ok(v) => self.gemini.detail_reasoning_budget = v,
                Err(_) => tracing::warn!(
                    "Ignoring GEMINI_DETAIL_REASONING_BUDGET={}: not an integer",
                    budget
                ),
            }
        }

        // HTTP transport overrides
        if let Some(bind) = var("EGYMI_HTTP_BIND") {
            self.http.bind = bind;
        }
        if let Some(path) = var("EGYMI_HTTP_PATH") {
            self.http.path = path;
        }
        if let Some(token) = var("EGYMI_BEARER_TOKEN") {
            self.http.bearer_token = Some(token);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.gemini.require_credential()?;

        if self.gemini.model_fast.trim().is_empty() || self.gemini.model_deep.trim().is_empty() {
            return Err(CompassError::Config("model ids cannot be empty".into()));
        }
        if self.gemini.detail_reasoning_budget < 0 {
            return Err(CompassError::Config(
                "detail_reasoning_budget cannot be negative".into(),
            ));
        }
        if self.http.bind.parse::<SocketAddr>().is_err() {
            return Err(CompassError::Config(format!(
                "invalid http.bind '{}' (expected host:port)",
                self.http.bind
            )));
        }

        Ok(())
    }
}
