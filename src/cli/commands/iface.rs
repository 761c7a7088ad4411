use anyhow::{bail, Result};
use netpatch::validation::InputValidator;
use netpatch::{Config, NetworkSystem};

use super::commit;
use crate::cli::IfaceArgs;

pub fn handle(config: &Config, args: IfaceArgs) -> Result<()> {
    InputValidator::validate_interface_name(&args.name)?;

    let address = args
        .address
        .as_deref()
        .map(InputValidator::validate_ipv4)
        .transpose()?;
    let netmask = args
        .netmask
        .as_deref()
        .map(InputValidator::validate_netmask)
        .transpose()?;

    let mut system = NetworkSystem::load(&config.paths())?;
    let iface = system.require_interface_mut(&args.name)?;

    if args.enable {
        iface.set_enabled(true);
    } else if args.disable {
        iface.set_enabled(false);
    }

    if args.dhcp {
        iface.set_dhcp(true);
    } else if args.static_ {
        iface.set_dhcp(false);
    }

    if let Some(address) = address {
        iface.set_address(address.to_string());
    }
    if let Some(netmask) = netmask {
        iface.set_netmask(netmask.to_string());
    }

    if !iface.uses_dhcp() && (iface.address().is_empty() || iface.netmask().is_empty()) {
        bail!(
            "Interface {} is static but has no address or netmask; pass --address and --netmask",
            args.name
        );
    }

    commit(&mut system, config, &args.write)
}
