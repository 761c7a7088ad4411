use anyhow::{bail, Context, Result};
use colored::Colorize;
use netpatch::Config;
use std::process::Command;
use tracing::info;

/// Run the configured restart command
pub fn handle(config: &Config) -> Result<()> {
    let Some((program, args)) = config.data.apply.restart_command.split_first() else {
        bail!("No restart command configured (apply.restart_command)");
    };

    info!(program = %program, ?args, "Restarting network");
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {}", program))?;

    if !status.success() {
        bail!("{} exited with {}", config.data.apply.restart_command.join(" "), status);
    }

    println!("{} Network restarted", "✓".bright_green());
    Ok(())
}
