//! On-disk TOML configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Config;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/vetadmin/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vetadmin").join("config.toml"))
}

/// Load config by cascading CWD `.vetadmin.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".vetadmin.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            base_url: overlay
                .server
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.base_url.clone())),
            request_timeout_secs: overlay
                .server
                .as_ref()
                .and_then(|s| s.request_timeout_secs)
                .or_else(|| base.server.as_ref().and_then(|s| s.request_timeout_secs)),
        }),
        display: Some(DisplayConfig {
            color: overlay
                .display
                .as_ref()
                .and_then(|d| d.color)
                .or_else(|| base.display.as_ref().and_then(|d| d.color)),
        }),
    }
}

impl ConfigFile {
    /// Resolve into a runtime [`Config`], filling gaps with defaults.
    pub fn into_config(self) -> Config {
        let defaults = Config::default();
        let server = self.server.unwrap_or_default();
        Config {
            base_url: server.base_url.unwrap_or(defaults.base_url),
            request_timeout_secs: server
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_round_trip_toml() {
        let config = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://clinic.local:9000".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.server.unwrap().base_url.unwrap(),
            "http://clinic.local:9000"
        );
    }

    #[test]
    fn absent_fields_deserialize_as_none() {
        let toml_str = "[server]\nbase_url = \"http://localhost:8000\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let server = parsed.server.unwrap();
        assert!(server.request_timeout_secs.is_none());
        assert!(parsed.display.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://base".to_string()),
                request_timeout_secs: Some(5),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://overlay".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.base_url.unwrap(), "http://overlay");
        // Base fills fields the overlay leaves out.
        assert_eq!(server.request_timeout_secs.unwrap(), 5);
    }

    #[test]
    fn into_config_falls_back_to_defaults() {
        let config = ConfigFile::default().into_config();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn load_from_missing_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_from_path(&path).is_none());
    }

    #[test]
    fn load_from_path_parses_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ncolor = false\n").unwrap();
        let parsed = load_from_path(&path).unwrap();
        assert_eq!(parsed.display.unwrap().color, Some(false));
    }
}
