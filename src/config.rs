// SPDX-License-Identifier: MIT

//! Application and session configuration
//!
//! Values come from an optional YAML file, then environment variables
//! (a `.env` file is loaded by the binary), then CLI flags. The Gemini
//! credential lives in `SessionConfig` and is handed to whatever needs it;
//! nothing reads it from global state after start-up.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::assistant::GenerationConfig;
use crate::error::{FemiverseError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_PORT: u16 = 3000;

/// Per-session settings for talking to the language model
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub api_key: String,
    pub model_name: String,
    pub api_base: Url,
    pub generation: GenerationConfig,
}

impl SessionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: DEFAULT_MODEL.to_string(),
            api_base: default_api_base(),
            generation: GenerationConfig::femibot(),
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }
}

/// Settings read from `femiverse.yaml` and the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base: String,
    /// YAML rule book replacing the built-in one
    pub rules_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            rules_file: None,
        }
    }
}

impl AppConfig {
    /// Load from an optional YAML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::parse_yaml(&fs::read_to_string(p)?)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn parse_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Some(model) = lookup("FEMIVERSE_MODEL") {
            self.model = model;
        }
        if let Some(port) = lookup("FEMIVERSE_PORT") {
            self.port = port
                .parse()
                .map_err(|_| FemiverseError::config(format!("invalid FEMIVERSE_PORT '{}'", port)))?;
        }
        if let Some(rules) = lookup("FEMIVERSE_RULES") {
            self.rules_file = Some(PathBuf::from(rules));
        }
        if let Some(base) = lookup("FEMIVERSE_API_BASE") {
            self.api_base = base;
        }
        Ok(())
    }

    pub fn api_base_url(&self) -> Result<Url> {
        parse_api_base(&self.api_base)
    }

    /// Session settings using `api_key`, or the configured key when `None`
    pub fn session(&self, api_key: Option<&str>) -> Result<Option<SessionConfig>> {
        let key = api_key
            .filter(|k| !k.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.api_key.clone());
        match key {
            Some(key) => Ok(Some(
                SessionConfig::new(key)
                    .with_model(self.model.clone())
                    .with_api_base(self.api_base_url()?),
            )),
            None => Ok(None),
        }
    }
}

/// Parse an API base, making sure it ends with `/` so joins keep the path
pub fn parse_api_base(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized)
        .map_err(|e| FemiverseError::config(format!("invalid API base '{}': {}", raw, e)))
}

static DEFAULT_API_BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(DEFAULT_API_BASE).expect("DEFAULT_API_BASE is a valid URL"));

fn default_api_base() -> Url {
    DEFAULT_API_BASE_URL.clone()
}
