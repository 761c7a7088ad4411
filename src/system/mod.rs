//! The editable network configuration of one machine.
//!
//! [`NetworkSystem::load`] gathers the interfaces, resolver, default route
//! and NetworkManager switch from their files. Edits go through setters that
//! track what changed, and [`NetworkSystem::save`] writes back only the
//! files whose settings were touched.

pub mod interface;

pub use interface::Interface;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Paths;
use crate::error::{NetpatchError, NetpatchResult};
use crate::fields::{
    DefaultRouteReader, DefaultRouteWriter, DeviceScanner, InterfaceReader, InterfaceWriter,
    NameserverReader, NameserverWriter, NetworkManagerReader, NetworkManagerWriter,
};
use crate::lineio::{patch_file, preview_patch, read_lines, LineRewriter};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSystem {
    interfaces: Vec<Interface>,
    dns_servers: Vec<String>,
    router: Option<String>,
    use_network_manager: bool,
    #[serde(skip)]
    dirty: bool,
}

/// Would-be contents of one file, from [`NetworkSystem::preview`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Interface(String),
    System,
}

struct PendingWrite<'a> {
    target: Target,
    path: PathBuf,
    rewriter: Box<dyn LineRewriter + 'a>,
}

impl NetworkSystem {
    /// Read every configuration file, stopping at the first failure
    pub fn load(paths: &Paths) -> NetpatchResult<Self> {
        let mut scanner = DeviceScanner::new(&paths.interface_prefixes);
        read_lines(&paths.net_devices, &mut scanner)?;

        let mut interfaces = Vec::new();
        for name in scanner.into_devices() {
            let path = paths.ifcfg(&name);
            let mut iface = Interface::new(name);
            read_lines(&path, &mut InterfaceReader::new(&mut iface))?;
            interfaces.push(iface);
        }

        let mut nameservers = NameserverReader::new();
        read_lines(&paths.resolv_conf, &mut nameservers)?;

        let mut routes = DefaultRouteReader::new();
        read_lines(&paths.routes, &mut routes)?;

        let mut network_manager = NetworkManagerReader::new();
        read_lines(&paths.network_config, &mut network_manager)?;

        let system = Self {
            interfaces,
            dns_servers: nameservers.into_servers(),
            router: routes.into_gateway(),
            use_network_manager: network_manager.enabled(),
            dirty: false,
        };
        info!(
            interfaces = system.interfaces.len(),
            nameservers = system.dns_servers.len(),
            router = ?system.router,
            "Loaded network configuration"
        );
        Ok(system)
    }

    /// Write every file with unsaved changes.
    ///
    /// Interfaces go first, then resolver, routes and the global config.
    /// The first failure stops the pass; files already written stay written
    /// and are no longer reported dirty.
    pub fn save(&mut self, paths: &Paths) -> NetpatchResult<Vec<PathBuf>> {
        let mut written: Vec<(Target, PathBuf)> = Vec::new();
        let mut failure = None;

        for mut write in self.pending_writes(paths) {
            if let Err(e) = patch_file(&write.path, write.rewriter.as_mut()) {
                failure = Some(e);
                break;
            }
            info!(path = %write.path.display(), "Saved");
            written.push((write.target, write.path));
        }

        for (target, _) in &written {
            if let Target::Interface(name) = target {
                if let Some(iface) = self.interface_mut(name) {
                    iface.dirty = false;
                }
            }
        }

        match failure {
            Some(e) => Err(e.into()),
            None => {
                self.dirty = false;
                Ok(written.into_iter().map(|(_, path)| path).collect())
            }
        }
    }

    /// Contents every pending write would produce, without writing
    pub fn preview(&self, paths: &Paths) -> NetpatchResult<Vec<FilePreview>> {
        self.pending_writes(paths)
            .into_iter()
            .map(|mut write| -> NetpatchResult<FilePreview> {
                let contents = preview_patch(&write.path, write.rewriter.as_mut())?;
                Ok(FilePreview {
                    path: write.path,
                    contents,
                })
            })
            .collect()
    }

    fn pending_writes(&self, paths: &Paths) -> Vec<PendingWrite<'_>> {
        let mut writes: Vec<PendingWrite<'_>> = self
            .interfaces
            .iter()
            .filter(|iface| iface.is_dirty())
            .map(|iface| PendingWrite {
                target: Target::Interface(iface.name.clone()),
                path: paths.ifcfg(&iface.name),
                rewriter: Box::new(InterfaceWriter::new(iface)),
            })
            .collect();

        if self.dirty {
            writes.push(PendingWrite {
                target: Target::System,
                path: paths.resolv_conf.clone(),
                rewriter: Box::new(NameserverWriter::new(&self.dns_servers)),
            });
            writes.push(PendingWrite {
                target: Target::System,
                path: paths.routes.clone(),
                rewriter: Box::new(DefaultRouteWriter::new(self.router.as_deref())),
            });
            writes.push(PendingWrite {
                target: Target::System,
                path: paths.network_config.clone(),
                rewriter: Box::new(NetworkManagerWriter::new(self.use_network_manager)),
            });
        }

        writes
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn interface_mut(&mut self, name: &str) -> Option<&mut Interface> {
        self.interfaces.iter_mut().find(|i| i.name == name)
    }

    /// Like [`Self::interface_mut`], failing for names that were not loaded
    pub fn require_interface_mut(&mut self, name: &str) -> NetpatchResult<&mut Interface> {
        self.interface_mut(name)
            .ok_or_else(|| NetpatchError::UnknownInterface(name.to_string()))
    }

    pub fn dns_servers(&self) -> &[String] {
        &self.dns_servers
    }

    pub fn router(&self) -> Option<&str> {
        self.router.as_deref()
    }

    pub fn use_network_manager(&self) -> bool {
        self.use_network_manager
    }

    pub fn set_dns_servers(&mut self, servers: Vec<String>) {
        if self.dns_servers != servers {
            self.dns_servers = servers;
            self.dirty = true;
        }
    }

    pub fn set_router(&mut self, router: Option<String>) {
        let router = router.filter(|r| !r.trim().is_empty());
        if self.router != router {
            self.router = router;
            self.dirty = true;
        }
    }

    pub fn set_use_network_manager(&mut self, enabled: bool) {
        if self.use_network_manager != enabled {
            self.use_network_manager = enabled;
            self.dirty = true;
        }
    }

    /// Whether any system setting or interface has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.interfaces.iter().any(Interface::is_dirty)
    }
}

impl FilePreview {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigData;
    use crate::error::LineIoError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Paths) {
        let temp_dir = TempDir::new().unwrap();
        let data = ConfigData {
            root: temp_dir.path().to_path_buf(),
            ..ConfigData::default()
        };
        let paths = Paths::from_data(&data);

        fs::create_dir_all(paths.net_devices.parent().unwrap()).unwrap();
        fs::create_dir_all(paths.routes.parent().unwrap()).unwrap();
        fs::write(
            &paths.net_devices,
            "    lo: 1 0 0 0\n  eth0: 2 0 0 0\n  eth1: 3 0 0 0\n",
        )
        .unwrap();
        fs::write(
            paths.ifcfg("eth0"),
            "STARTMODE='auto'\nBOOTPROTO='static'\nIPADDR='10.0.0.2'\nNETMASK='255.255.255.0'\n",
        )
        .unwrap();
        fs::write(&paths.resolv_conf, "search lan\nnameserver 1.1.1.1\n").unwrap();
        fs::write(&paths.routes, "default 10.0.0.1 - -\n").unwrap();

        (temp_dir, paths)
    }

    #[test]
    fn test_load() {
        let (_temp_dir, paths) = fixture();
        let system = NetworkSystem::load(&paths).unwrap();

        let names: Vec<_> = system.interfaces().iter().map(Interface::name).collect();
        assert_eq!(names, vec!["eth0", "eth1"]);

        let eth0 = system.interface("eth0").unwrap();
        assert!(eth0.is_enabled());
        assert!(!eth0.uses_dhcp());
        assert_eq!(eth0.address(), "10.0.0.2");

        let eth1 = system.interface("eth1").unwrap();
        assert_eq!(eth1, &Interface::new("eth1"));

        assert_eq!(system.dns_servers(), &["1.1.1.1".to_string()]);
        assert_eq!(system.router(), Some("10.0.0.1"));
        assert!(!system.use_network_manager());
        assert!(!system.is_dirty());
    }

    #[test]
    fn test_clean_save_writes_nothing() {
        let (_temp_dir, paths) = fixture();
        let mut system = NetworkSystem::load(&paths).unwrap();

        assert!(system.save(&paths).unwrap().is_empty());
        assert!(!paths.network_config.exists());
    }

    #[test]
    fn test_save_only_touched_files() {
        let (_temp_dir, paths) = fixture();
        let mut system = NetworkSystem::load(&paths).unwrap();

        system.require_interface_mut("eth0").unwrap().set_address("10.0.0.3");
        let written = system.save(&paths).unwrap();

        assert_eq!(written, vec![paths.ifcfg("eth0")]);
        assert!(fs::read_to_string(paths.ifcfg("eth0"))
            .unwrap()
            .contains("IPADDR='10.0.0.3'"));
        assert!(!paths.ifcfg("eth1").exists());
        assert!(!system.is_dirty());
    }

    #[test]
    fn test_save_system_settings() {
        let (_temp_dir, paths) = fixture();
        let mut system = NetworkSystem::load(&paths).unwrap();

        system.set_dns_servers(vec!["9.9.9.9".to_string()]);
        system.set_router(Some("10.0.0.254".to_string()));
        system.set_use_network_manager(true);
        let written = system.save(&paths).unwrap();

        assert_eq!(
            written,
            vec![
                paths.resolv_conf.clone(),
                paths.routes.clone(),
                paths.network_config.clone()
            ]
        );
        assert_eq!(
            fs::read_to_string(&paths.resolv_conf).unwrap(),
            "search lan\nnameserver 9.9.9.9\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.routes).unwrap(),
            "default 10.0.0.254 - -\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.network_config).unwrap(),
            "NETWORKMANAGER=\"yes\"\n"
        );

        let reloaded = NetworkSystem::load(&paths).unwrap();
        assert_eq!(reloaded, system);
    }

    #[test]
    fn test_failure_stops_and_keeps_dirty() {
        let (_temp_dir, paths) = fixture();
        let mut system = NetworkSystem::load(&paths).unwrap();

        let eth1 = system.require_interface_mut("eth1").unwrap();
        eth1.set_enabled(true);
        eth1.set_address("not-an-address");
        system.set_router(Some("10.0.0.254".to_string()));

        let err = system.save(&paths).unwrap_err();
        assert!(matches!(
            err,
            NetpatchError::LineIo(LineIoError::Callback { .. })
        ));
        assert!(!paths.ifcfg("eth1").exists());
        assert_eq!(
            fs::read_to_string(&paths.routes).unwrap(),
            "default 10.0.0.1 - -\n"
        );
        assert!(system.is_dirty());
    }

    #[test]
    fn test_preview_does_not_write() {
        let (_temp_dir, paths) = fixture();
        let mut system = NetworkSystem::load(&paths).unwrap();

        system.set_dns_servers(vec!["9.9.9.9".to_string(), "8.8.8.8".to_string()]);
        let previews = system.preview(&paths).unwrap();

        assert_eq!(previews.len(), 3);
        assert_eq!(previews[0].path(), paths.resolv_conf.as_path());
        assert_eq!(
            previews[0].contents,
            "search lan\nnameserver 9.9.9.9\nnameserver 8.8.8.8\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.resolv_conf).unwrap(),
            "search lan\nnameserver 1.1.1.1\n"
        );
        assert!(system.is_dirty());
    }

    #[test]
    fn test_unknown_interface() {
        let (_temp_dir, paths) = fixture();
        let mut system = NetworkSystem::load(&paths).unwrap();

        assert!(matches!(
            system.require_interface_mut("eth9"),
            Err(NetpatchError::UnknownInterface(name)) if name == "eth9"
        ));
    }
}
