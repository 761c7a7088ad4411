use anyhow::{Context, Result};
use colored::Colorize;
use netpatch::{Config, NetworkSystem};

pub fn handle(config: &Config, json: bool) -> Result<()> {
    let system = NetworkSystem::load(&config.paths())?;

    if json {
        let out = serde_json::to_string_pretty(&system).context("Failed to serialize system")?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", "Interfaces".bright_blue().bold());
    if system.interfaces().is_empty() {
        println!("  {} No interfaces found", "ℹ".bright_blue());
    }
    for iface in system.interfaces() {
        let state = if iface.is_enabled() {
            "enabled".bright_green()
        } else {
            "disabled".bright_black()
        };
        if iface.uses_dhcp() {
            println!("  {} {} dhcp", iface.name().bright_cyan(), state);
        } else {
            println!(
                "  {} {} static {}/{}",
                iface.name().bright_cyan(),
                state,
                iface.address().bright_yellow(),
                iface.netmask().bright_yellow()
            );
        }
    }

    println!("{}", "DNS servers".bright_blue().bold());
    if system.dns_servers().is_empty() {
        println!("  {} None configured", "ℹ".bright_blue());
    }
    for server in system.dns_servers() {
        println!("  {}", server.bright_yellow());
    }

    println!(
        "{} {}",
        "Default route:".bright_blue().bold(),
        system.router().unwrap_or("none").bright_yellow()
    );
    println!(
        "{} {}",
        "NetworkManager:".bright_blue().bold(),
        if system.use_network_manager() { "on" } else { "off" }
    );

    Ok(())
}
