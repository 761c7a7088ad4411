use anyhow::Result;
use netpatch::validation::InputValidator;
use netpatch::{Config, NetworkSystem};

use super::commit;
use crate::cli::WriteArgs;

pub fn handle(config: &Config, address: Option<String>, clear: bool, write: &WriteArgs) -> Result<()> {
    let router = match address {
        Some(address) if !clear => Some(InputValidator::validate_ipv4(&address)?.to_string()),
        _ => None,
    };

    let mut system = NetworkSystem::load(&config.paths())?;
    system.set_router(router);
    commit(&mut system, config, write)
}
