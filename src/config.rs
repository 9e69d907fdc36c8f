use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::query::{FilterKeyword, Limit};

pub const BASE_URL_ENV: &str = "INBOX_API_URL";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Origin serving `/emails/{keyword}` and `/email/{id}`.
    pub base_url: String,
    pub default_filter: String,
    pub default_limit: u32,
    /// 0 disables the timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            default_filter: "ALL".to_string(),
            default_limit: Limit::default().get(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn filter(&self) -> Result<FilterKeyword> {
        FilterKeyword::parse(&self.default_filter)
            .map_err(|e| anyhow::anyhow!("default_filter in config: {e}"))
    }

    pub fn limit(&self) -> Result<Limit> {
        Limit::new(self.default_limit).map_err(|e| anyhow::anyhow!("default_limit in config: {e}"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Environment wins over the file; an explicit flag wins over both.
    pub fn apply_overrides(&mut self, env_base_url: Option<String>, flag_base_url: Option<String>) {
        if let Some(url) = env_base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(url) = flag_base_url {
            self.base_url = url;
        }
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("rs_inbox_viewer"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

/// Load the user's config, writing a template with the defaults on first run.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let tom = toml::to_string_pretty(&Config::default())?;
        fs::write(path, tom)?;
        info!("Created template config at {}", path.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
    cfg.filter()?;
    cfg.limit()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rs_inbox_viewer-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join("config.toml")
    }

    #[test]
    fn first_run_writes_template() {
        let path = scratch("template");
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        let written: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = scratch("partial");
        fs::write(&path, "base_url = \"http://mail.lan:9000\"\ndefault_limit = 50\n").unwrap();
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.base_url, "http://mail.lan:9000");
        assert_eq!(cfg.limit().unwrap().get(), 50);
        assert_eq!(cfg.filter().unwrap(), FilterKeyword::All);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_limit_is_reported() {
        let path = scratch("badlimit");
        fs::write(&path, "default_limit = 7\n").unwrap();
        let err = load_config_from(&path).unwrap_err().to_string();
        assert!(err.contains("default_limit"), "{err}");
    }

    #[test]
    fn overrides_layer_in_order() {
        let mut cfg = Config::default();
        cfg.apply_overrides(Some("http://env:1".into()), None);
        assert_eq!(cfg.base_url, "http://env:1");
        cfg.apply_overrides(Some("http://env:2".into()), Some("http://flag:3".into()));
        assert_eq!(cfg.base_url, "http://flag:3");
        cfg.apply_overrides(Some("  ".into()), None);
        assert_eq!(cfg.base_url, "http://flag:3");
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cfg = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(cfg.timeout(), None);
    }
}
