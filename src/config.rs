// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "MARKETPLACE_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";
const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Used in badge embed codes and preview links.
    pub public_base_url: String,
    /// Trust score for products created without raw signals.
    pub initial_trust_score: u8,
    /// Each baseline sub-score for products created without raw signals.
    pub initial_sub_score: u8,
    pub badge_valid_days: u32,
    pub cors_permissive: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:8000".into(),
            initial_trust_score: 70,
            initial_sub_score: 70,
            badge_valid_days: 365,
            cors_permissive: true,
        }
    }
}

impl AppConfig {
    /// Load from an explicit TOML file, then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading app config from {}", path.display()))?;
        let cfg = Self::from_toml_str(&content)
            .with_context(|| format!("parsing app config {}", path.display()))?;
        Ok(cfg.with_env_overrides())
    }

    /// Load using env var + fallbacks:
    /// 1) $MARKETPLACE_CONFIG_PATH (must exist)
    /// 2) config/app.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        Ok(Self::default().with_env_overrides())
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;
        cfg.initial_trust_score = cfg.initial_trust_score.min(100);
        cfg.initial_sub_score = cfg.initial_sub_score.min(100);
        Ok(cfg)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_PUBLIC_BASE_URL) {
            let url = url.trim();
            if !url.is_empty() {
                self.public_base_url = url.trim_end_matches('/').to_string();
            }
        }
        self
    }
}
