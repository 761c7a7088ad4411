use tracing::{debug, warn};

use crate::error::CallbackError;
use crate::lineio::{LineContext, LineVisitor};
use crate::validation::InputValidator;

/// Collects managed interface names from a device enumeration file such as
/// `/proc/net/dev`, where each device line reads `  eth0: <counters>`
#[derive(Debug)]
pub struct DeviceScanner<'a> {
    prefixes: &'a [String],
    devices: Vec<String>,
}

impl<'a> DeviceScanner<'a> {
    pub fn new(prefixes: &'a [String]) -> Self {
        Self {
            prefixes,
            devices: Vec::new(),
        }
    }

    pub fn into_devices(self) -> Vec<String> {
        self.devices
    }
}

impl LineVisitor for DeviceScanner<'_> {
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError> {
        let text = line.text.trim_start_matches(' ');
        if !self.prefixes.iter().any(|p| text.starts_with(p.as_str())) {
            return Ok(());
        }
        let Some((name, _)) = text.split_once(':') else {
            return Ok(());
        };

        if InputValidator::validate_interface_name(name).is_err() {
            warn!(line = line.line_no, name, "Skipping device with unusable name");
            return Ok(());
        }
        if self.devices.iter().any(|d| d == name) {
            return Ok(());
        }

        debug!(path = %line.path.display(), line = line.line_no, name, "Found device");
        self.devices.push(name.to_string());
        Ok(())
    }
}
