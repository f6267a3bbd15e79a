//! Process configuration from environment variables.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use cryptotasks_infra::RegistryConfig;
use cryptotasks_observability::LogFormat;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub data_file: PathBuf,
    /// Usernames allowed to reset the tap pool.
    pub admins: BTreeSet<String>,
    pub support_email: String,
    pub support_telegram: String,
    pub log_format: LogFormat,
    pub registry: RegistryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            admins: BTreeSet::new(),
            support_email: "support@cryptotasks.com".to_string(),
            support_telegram: "@cryptotasks_support".to_string(),
            log_format: LogFormat::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `CRYPTOTASKS_*` variables, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(bind) = lookup("CRYPTOTASKS_BIND") {
            cfg.bind = bind
                .parse()
                .with_context(|| format!("CRYPTOTASKS_BIND is not a socket address: {bind}"))?;
        }
        if let Some(path) = lookup("CRYPTOTASKS_DATA_FILE") {
            cfg.data_file = PathBuf::from(path);
        }
        if let Some(admins) = lookup("CRYPTOTASKS_ADMINS") {
            cfg.admins = parse_admins(&admins);
        }
        if let Some(email) = lookup("CRYPTOTASKS_SUPPORT_EMAIL") {
            cfg.support_email = email;
        }
        if let Some(tg) = lookup("CRYPTOTASKS_SUPPORT_TELEGRAM") {
            cfg.support_telegram = tg;
        }
        if let Some(format) = lookup("CRYPTOTASKS_LOG_FORMAT") {
            cfg.log_format = format
                .parse()
                .map_err(anyhow::Error::msg)
                .context("invalid CRYPTOTASKS_LOG_FORMAT")?;
        }

        Ok(cfg)
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.admins.contains(username)
    }
}

fn parse_admins(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
