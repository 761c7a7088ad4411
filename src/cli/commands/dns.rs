use anyhow::Result;
use netpatch::fields::parse_nameservers;
use netpatch::validation::InputValidator;
use netpatch::{Config, NetworkSystem};

use super::commit;
use crate::cli::WriteArgs;

pub fn handle(config: &Config, servers: &[String], write: &WriteArgs) -> Result<()> {
    let servers = parse_nameservers(&servers.join(" "));
    for server in &servers {
        InputValidator::validate_nameserver(server)?;
    }

    let mut system = NetworkSystem::load(&config.paths())?;
    system.set_dns_servers(servers);
    commit(&mut system, config, write)
}
