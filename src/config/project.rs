use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ConfigData, Paths};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub data: ConfigData,
    pub path: PathBuf,
}

impl Config {
    /// Load from `explicit` if given, else from the per-user config file if
    /// it exists, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            return Self::load_from(path);
        }

        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self {
                data: ConfigData::default(),
                path,
            })
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let data = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "Loaded config");

        Ok(Self {
            data,
            path: path.to_path_buf(),
        })
    }

    pub fn default_path() -> PathBuf {
        ProjectDirs::from("dev", "netpatch", "netpatch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("netpatch.toml"))
    }

    /// Where the save lock lives
    pub fn lock_path(&self) -> PathBuf {
        ProjectDirs::from("dev", "netpatch", "netpatch")
            .and_then(|dirs| dirs.runtime_dir().map(Path::to_path_buf))
            .unwrap_or_else(std::env::temp_dir)
            .join("netpatch.lock")
    }

    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.data.root = root;
        }
        self
    }

    pub fn paths(&self) -> Paths {
        Paths::from_data(&self.data)
    }

    /// Write the default config to `path` unless a file is already there.
    /// Returns whether a file was created.
    pub fn init(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        let config = Self {
            data: ConfigData::default(),
            path: path.to_path_buf(),
        };
        config.save()?;
        Ok(true)
    }

    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.data).context("Failed to serialize config")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file {}", self.path.display()))?;

        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let data = &mut self.data;
        match key {
            "root" => data.root = PathBuf::from(value),
            "interface_prefixes" => {
                let prefixes: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
                if prefixes.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: key.to_string(),
                        value: value.to_string(),
                    }
                    .into());
                }
                data.interface_prefixes = prefixes;
            }
            "paths.net_devices" => data.paths.net_devices = PathBuf::from(value),
            "paths.ifcfg_prefix" => data.paths.ifcfg_prefix = PathBuf::from(value),
            "paths.routes" => data.paths.routes = PathBuf::from(value),
            "paths.resolv_conf" => data.paths.resolv_conf = PathBuf::from(value),
            "paths.network_config" => data.paths.network_config = PathBuf::from(value),
            "apply.restart_command" => {
                let command: Vec<String> = value.split_whitespace().map(String::from).collect();
                if command.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: key.to_string(),
                        value: value.to_string(),
                    }
                    .into());
                }
                data.apply.restart_command = command;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }

        self.save()?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let data = &self.data;
        let value = match key {
            "root" => data.root.display().to_string(),
            "interface_prefixes" => data.interface_prefixes.join(","),
            "paths.net_devices" => data.paths.net_devices.display().to_string(),
            "paths.ifcfg_prefix" => data.paths.ifcfg_prefix.display().to_string(),
            "paths.routes" => data.paths.routes.display().to_string(),
            "paths.resolv_conf" => data.paths.resolv_conf.display().to_string(),
            "paths.network_config" => data.paths.network_config.display().to_string(),
            "apply.restart_command" => data.apply.restart_command.join(" "),
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        };

        Ok(value)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: ConfigData::default(),
            path: Self::default_path(),
        }
    }
}
