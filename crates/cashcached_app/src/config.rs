//! Site configuration file handling

use anyhow::{Context, Result};
use cashcached_core::{Credential, DispatchTarget, DEFAULT_DAMPING};
use cashcached_emailjs::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variables that override the contact delivery identifiers
pub const ENV_SERVICE_ID: &str = "CASHCACHED_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "CASHCACHED_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "CASHCACHED_PUBLIC_KEY";

/// Top-level site configuration (site.toml)
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SiteConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

/// Hero parallax settings
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ScrollConfig {
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
        }
    }
}

/// Contact form delivery settings
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct ContactConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for ContactConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactConfig")
            .field("endpoint", &self.endpoint)
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &Credential::new(self.public_key.as_str()))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ContactConfig {
    pub fn dispatch_target(&self) -> DispatchTarget {
        DispatchTarget::new(
            self.service_id.as_str(),
            self.template_id.as_str(),
            Credential::new(self.public_key.as_str()),
        )
    }

    /// Fail if any identifier needed for a live send is missing
    pub fn ensure_ready(&self) -> Result<()> {
        let missing = self.dispatch_target().missing();
        if !missing.is_empty() {
            anyhow::bail!(
                "contact delivery is not configured: missing {} (set them in site.toml or via {ENV_SERVICE_ID}, {ENV_TEMPLATE_ID}, {ENV_PUBLIC_KEY})",
                missing.join(", ")
            );
        }
        Ok(())
    }
}

impl SiteConfig {
    /// `path` itself, or `site.toml` inside it when `path` is a directory
    pub fn resolve_path(path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join("site.toml")
        } else {
            path.to_path_buf()
        }
    }

    /// Load configuration from a file, or from `site.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = Self::resolve_path(path);

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Like [`load`](Self::load), but defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        if !config_path.exists() {
            info!(path = %config_path.display(), "no site config found, using defaults");
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        if !config.scroll.damping.is_finite() {
            anyhow::bail!("scroll.damping must be a finite number");
        }
        Ok(config)
    }

    /// Override contact identifiers from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override contact identifiers from `lookup`; empty values are ignored
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            (ENV_SERVICE_ID, &mut self.contact.service_id),
            (ENV_TEMPLATE_ID, &mut self.contact.template_id),
            (ENV_PUBLIC_KEY, &mut self.contact.public_key),
        ];
        for (key, slot) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
