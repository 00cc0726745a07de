use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const APP_DIR: &str = "vaultdash";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "vaultdash.log";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// On-disk `config.json`. Every key is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: None,
        }
    }
}

/// Values given on the command line or through `VAULTDASH_*` variables.
#[derive(Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub session_cookie: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Resolved runtime settings.
pub struct Settings {
    pub base_url: Url,
    pub session_cookie: Option<String>,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_log_path() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(dir.join(APP_DIR).join(LOG_FILE))
}

pub fn load_file(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg: FileConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Settings> {
    let raw_url = overrides.base_url.unwrap_or(file.base_url);
    let base_url = parse_base_url(&raw_url)?;

    let timeout_secs = overrides.timeout_secs.unwrap_or(file.timeout_secs);
    if timeout_secs == 0 {
        return Err(anyhow!("Timeout must be at least one second"));
    }

    let log_file = match overrides.log_file.or(file.log_file) {
        Some(path) => path,
        None => default_log_path()?,
    };

    Ok(Settings {
        base_url,
        session_cookie: overrides
            .session_cookie
            .or(file.session_cookie)
            .filter(|c| !c.trim().is_empty()),
        timeout: Duration::from_secs(timeout_secs),
        log_file,
    })
}

pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    let file = load_file(&path)?.unwrap_or_default();
    resolve(file, overrides)
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| anyhow!("Invalid base URL '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(anyhow!("Base URL must be http or https, got '{other}'")),
    }
    if url.cannot_be_a_base() {
        return Err(anyhow!("Base URL '{raw}' cannot carry a path"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_file(&missing).unwrap().is_none());

        let settings = resolve(
            FileConfig::default(),
            Overrides {
                log_file: Some(dir.path().join("x.log")),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(settings.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.session_cookie.is_none());
    }

    #[test]
    fn file_values_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"base_url": "https://vault.example.com", "session_cookie": "session=abc", "timeout_secs": 10}}"#
        )
        .unwrap();
        let cfg = load_file(file.path()).unwrap().unwrap();
        assert_eq!(cfg.timeout_secs, 10);

        let settings = resolve(
            cfg,
            Overrides {
                timeout_secs: Some(5),
                log_file: Some(PathBuf::from("/tmp/vaultdash-test.log")),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(settings.base_url.host_str(), Some("vault.example.com"));
        assert_eq!(settings.session_cookie.as_deref(), Some("session=abc"));
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_urls_and_timeouts() {
        let bad_scheme = Overrides {
            base_url: Some("ftp://example.com".into()),
            log_file: Some(PathBuf::from("x.log")),
            ..Overrides::default()
        };
        assert!(resolve(FileConfig::default(), bad_scheme).is_err());

        let zero = Overrides {
            timeout_secs: Some(0),
            log_file: Some(PathBuf::from("x.log")),
            ..Overrides::default()
        };
        assert!(resolve(FileConfig::default(), zero).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(load_file(file.path()).is_err());
    }
}
