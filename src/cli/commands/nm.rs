use anyhow::Result;
use netpatch::{Config, NetworkSystem};

use super::commit;
use crate::cli::{Switch, WriteArgs};

pub fn handle(config: &Config, state: Switch, write: &WriteArgs) -> Result<()> {
    let mut system = NetworkSystem::load(&config.paths())?;
    system.set_use_network_manager(state.is_on());
    commit(&mut system, config, write)
}
