use serde::Serialize;

/// Settings of one network interface as stored in its ifcfg file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) netmask: String,
    pub(crate) enabled: bool,
    pub(crate) dhcp: bool,
    #[serde(skip)]
    pub(crate) dirty: bool,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn netmask(&self) -> &str {
        &self.netmask
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn uses_dhcp(&self) -> bool {
        self.dhcp
    }

    /// Whether there are edits not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.dirty = true;
        }
    }

    pub fn set_dhcp(&mut self, dhcp: bool) {
        if self.dhcp != dhcp {
            self.dhcp = dhcp;
            self.dirty = true;
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        let address = address.into();
        if self.address != address {
            self.address = address;
            self.dirty = true;
        }
    }

    pub fn set_netmask(&mut self, netmask: impl Into<String>) {
        let netmask = netmask.into();
        if self.netmask != netmask {
            self.netmask = netmask;
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_track_changes() {
        let mut iface = Interface::new("eth0");
        assert!(!iface.is_dirty());

        iface.set_enabled(false);
        iface.set_address("");
        assert!(!iface.is_dirty());

        iface.set_address("10.0.0.2");
        assert!(iface.is_dirty());
        assert_eq!(iface.address(), "10.0.0.2");
    }
}
