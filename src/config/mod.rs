pub mod project;

pub use project::Config;

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    /// Prepended to every path in `paths`
    pub root: PathBuf,
    /// Device names in the enumeration file that are managed
    pub interface_prefixes: Vec<String>,
    pub paths: PathConfig,
    pub apply: ApplyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub net_devices: PathBuf,
    /// Per-interface files are `<ifcfg_prefix>-<name>`
    pub ifcfg_prefix: PathBuf,
    pub routes: PathBuf,
    pub resolv_conf: PathBuf,
    pub network_config: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    pub restart_command: Vec<String>,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            interface_prefixes: vec!["eth".to_string()],
            paths: PathConfig::default(),
            apply: ApplyConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            net_devices: PathBuf::from("/proc/net/dev"),
            ifcfg_prefix: PathBuf::from("/etc/sysconfig/network/ifcfg"),
            routes: PathBuf::from("/etc/sysconfig/network/routes"),
            resolv_conf: PathBuf::from("/etc/resolv.conf"),
            network_config: PathBuf::from("/etc/sysconfig/network/config"),
        }
    }
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            restart_command: vec![
                "/sbin/service".to_string(),
                "network".to_string(),
                "restart".to_string(),
            ],
        }
    }
}

/// Effective file locations, with the root already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub net_devices: PathBuf,
    pub ifcfg_prefix: PathBuf,
    pub routes: PathBuf,
    pub resolv_conf: PathBuf,
    pub network_config: PathBuf,
    pub interface_prefixes: Vec<String>,
}

impl Paths {
    pub fn from_data(data: &ConfigData) -> Self {
        let under_root = |path: &Path| rooted(&data.root, path);
        Self {
            net_devices: under_root(&data.paths.net_devices),
            ifcfg_prefix: under_root(&data.paths.ifcfg_prefix),
            routes: under_root(&data.paths.routes),
            resolv_conf: under_root(&data.paths.resolv_conf),
            network_config: under_root(&data.paths.network_config),
            interface_prefixes: data.interface_prefixes.clone(),
        }
    }

    /// Settings file of one interface
    pub fn ifcfg(&self, interface: &str) -> PathBuf {
        let mut path = OsString::from(self.ifcfg_prefix.as_os_str());
        path.push("-");
        path.push(interface);
        PathBuf::from(path)
    }
}

/// `root.join(path)` that keeps absolute `path`s under `root`
fn rooted(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix("/") {
        Ok(relative) => root.join(relative),
        Err(_) => root.join(path),
    }
}
