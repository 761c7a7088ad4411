use tracing::debug;

use super::{raw_value, unquoted_value};
use crate::error::CallbackError;
use crate::lineio::{LineContext, LineRewriter, LineVisitor, Rewrite};
use crate::system::Interface;
use crate::validation::InputValidator;

/// Keys of an `ifcfg-<name>` file that netpatch manages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IfcfgKey {
    StartMode,
    BootProto,
    IpAddr,
    Netmask,
}

impl IfcfgKey {
    /// Order in which missing keys are appended
    const APPEND_ORDER: [IfcfgKey; 4] = [
        IfcfgKey::IpAddr,
        IfcfgKey::Netmask,
        IfcfgKey::StartMode,
        IfcfgKey::BootProto,
    ];

    fn name(self) -> &'static str {
        match self {
            IfcfgKey::StartMode => "STARTMODE",
            IfcfgKey::BootProto => "BOOTPROTO",
            IfcfgKey::IpAddr => "IPADDR",
            IfcfgKey::Netmask => "NETMASK",
        }
    }

    fn index(self) -> usize {
        match self {
            IfcfgKey::StartMode => 0,
            IfcfgKey::BootProto => 1,
            IfcfgKey::IpAddr => 2,
            IfcfgKey::Netmask => 3,
        }
    }

    fn classify(line: &str) -> Option<Self> {
        Self::APPEND_ORDER
            .into_iter()
            .find(|key| raw_value(line, key.name()).is_some())
    }
}

/// Fills an [`Interface`] from its ifcfg file
pub struct InterfaceReader<'a> {
    iface: &'a mut Interface,
}

impl<'a> InterfaceReader<'a> {
    pub fn new(iface: &'a mut Interface) -> Self {
        Self { iface }
    }
}

impl LineVisitor for InterfaceReader<'_> {
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError> {
        let Some(key) = IfcfgKey::classify(line.text) else {
            return Ok(());
        };
        debug!(path = %line.path.display(), line = line.line_no, key = key.name(), "Read interface setting");

        let name = key.name();
        match key {
            IfcfgKey::StartMode => {
                self.iface.enabled = !raw_value(line.text, name).is_some_and(|v| v.starts_with("off"));
            }
            IfcfgKey::BootProto => {
                self.iface.dhcp = !raw_value(line.text, name).is_some_and(|v| v.starts_with("static"));
            }
            IfcfgKey::IpAddr => {
                self.iface.address = unquoted_value(line.text, name).unwrap_or_default().to_string();
            }
            IfcfgKey::Netmask => {
                self.iface.netmask = unquoted_value(line.text, name).unwrap_or_default().to_string();
            }
        }
        Ok(())
    }
}

/// Writes an [`Interface`] back into its ifcfg file.
///
/// Every managed key line is replaced with its canonical form; keys the
/// file lacks are appended. A static interface must carry a valid address
/// and netmask or the rewrite fails.
pub struct InterfaceWriter<'a> {
    iface: &'a Interface,
    written: [bool; 4],
}

impl<'a> InterfaceWriter<'a> {
    pub fn new(iface: &'a Interface) -> Self {
        Self {
            iface,
            written: [false; 4],
        }
    }

    fn render(&self, key: IfcfgKey) -> Result<String, CallbackError> {
        let iface = self.iface;
        let value = match key {
            IfcfgKey::StartMode => if iface.enabled { "auto" } else { "off" }.to_string(),
            IfcfgKey::BootProto => if iface.dhcp { "dhcp+autoip" } else { "static" }.to_string(),
            IfcfgKey::IpAddr if iface.dhcp => String::new(),
            IfcfgKey::Netmask if iface.dhcp => String::new(),
            IfcfgKey::IpAddr => {
                InputValidator::validate_ipv4(&iface.address).map_err(|_| invalid(key, &iface.address))?;
                iface.address.trim().to_string()
            }
            IfcfgKey::Netmask => {
                InputValidator::validate_netmask(&iface.netmask).map_err(|_| invalid(key, &iface.netmask))?;
                iface.netmask.trim().to_string()
            }
        };
        Ok(format!("{}='{}'", key.name(), value))
    }
}

fn invalid(key: IfcfgKey, value: &str) -> CallbackError {
    CallbackError::InvalidValue {
        field: key.name().to_string(),
        value: value.to_string(),
    }
}

impl LineRewriter for InterfaceWriter<'_> {
    fn rewrite(&mut self, line: &LineContext<'_>) -> Result<Rewrite, CallbackError> {
        let Some(key) = IfcfgKey::classify(line.text) else {
            return Ok(Rewrite::Keep);
        };
        self.written[key.index()] = true;
        Ok(Rewrite::replace(self.render(key)?))
    }

    fn finish(&mut self) -> Result<String, CallbackError> {
        let mut missing = Vec::new();
        for key in IfcfgKey::APPEND_ORDER {
            if !self.written[key.index()] {
                missing.push(self.render(key)?);
            }
        }
        Ok(missing.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LineIoError, Position};
    use crate::lineio::{patch_file, read_lines};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn load(path: &Path) -> Interface {
        let mut iface = Interface::new("eth0");
        read_lines(path, &mut InterfaceReader::new(&mut iface)).unwrap();
        iface
    }

    fn static_iface() -> Interface {
        Interface {
            name: "eth0".to_string(),
            address: "192.168.1.20".to_string(),
            netmask: "255.255.255.0".to_string(),
            enabled: true,
            dhcp: false,
            dirty: true,
        }
    }

    #[test]
    fn test_read_static_interface() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        fs::write(
            &path,
            "# static\nSTARTMODE='onboot'\nBOOTPROTO=\"static\"\nIPADDR='192.168.1.20'\nNETMASK='255.255.255.0'\nNAME='Lan'\n",
        )
        .unwrap();

        let iface = load(&path);
        assert!(iface.is_enabled());
        assert!(!iface.uses_dhcp());
        assert_eq!(iface.address(), "192.168.1.20");
        assert_eq!(iface.netmask(), "255.255.255.0");
        assert!(!iface.is_dirty());
    }

    #[test]
    fn test_read_disabled_dhcp_interface() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        fs::write(&path, "STARTMODE=off\nBOOTPROTO='dhcp'\nIPADDR=''\n").unwrap();

        let iface = load(&path);
        assert!(!iface.is_enabled());
        assert!(iface.uses_dhcp());
        assert_eq!(iface.address(), "");
    }

    #[test]
    fn test_write_replaces_in_place_and_appends_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        fs::write(&path, "NAME='Lan'\nBOOTPROTO='dhcp'\nUSERCONTROL='no'\n").unwrap();

        let iface = static_iface();
        patch_file(&path, &mut InterfaceWriter::new(&iface)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "NAME='Lan'\nBOOTPROTO='static'\nUSERCONTROL='no'\n\
             IPADDR='192.168.1.20'\nNETMASK='255.255.255.0'\nSTARTMODE='auto'\n"
        );

        patch_file(&path, &mut InterfaceWriter::new(&iface)).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(second.matches("IPADDR=").count(), 1);
        assert_eq!(load(&path), Interface { dirty: false, ..iface });
    }

    #[test]
    fn test_dhcp_clears_addresses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        fs::write(&path, "IPADDR='10.0.0.5'\nNETMASK='255.0.0.0'\n").unwrap();

        let iface = Interface {
            dhcp: true,
            ..static_iface()
        };
        patch_file(&path, &mut InterfaceWriter::new(&iface)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "IPADDR=''\nNETMASK=''\nSTARTMODE='auto'\nBOOTPROTO='dhcp+autoip'\n"
        );
    }

    #[test]
    fn test_invalid_static_address_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        let original = "BOOTPROTO='dhcp'\nIPADDR=''\n";
        fs::write(&path, original).unwrap();

        let iface = Interface {
            address: "10.0.0.999".to_string(),
            ..static_iface()
        };
        let err = patch_file(&path, &mut InterfaceWriter::new(&iface)).unwrap_err();

        match err {
            LineIoError::Callback { position, source, .. } => {
                assert_eq!(position, Position::Line(2));
                assert_eq!(
                    source,
                    CallbackError::InvalidValue {
                        field: "IPADDR".to_string(),
                        value: "10.0.0.999".to_string(),
                    }
                );
            }
            other => panic!("Expected callback error, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_file_gets_all_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");

        let iface = static_iface();
        patch_file(&path, &mut InterfaceWriter::new(&iface)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "IPADDR='192.168.1.20'\nNETMASK='255.255.255.0'\nSTARTMODE='auto'\nBOOTPROTO='static'\n"
        );
    }
}
