pub mod apply;
pub mod config;
pub mod dns;
pub mod iface;
pub mod nm;
pub mod router;
pub mod show;

use anyhow::{Context, Result};
use colored::Colorize;
use netpatch::error::ValidationError;
use netpatch::storage::FileLock;
use netpatch::{Config, LineIoError, NetpatchError, NetworkSystem};

use crate::cli::WriteArgs;

/// Display an error message with proper formatting
pub fn display_error(err: &anyhow::Error) {
    eprintln!("\n{} {}", "✗".bright_red().bold(), "Operation failed".bright_red().bold());
    eprintln!("  {} {}", "├".bright_black(), err);

    // Display error chain
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "├".bright_black(), cause);
    }

    // Add helpful context based on error type
    let hint = err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<LineIoError>() {
            return Some(match e {
                LineIoError::Callback { .. } => "The file was left unchanged".to_string(),
                _ => format!("Check access to {}", e.path().display()),
            });
        }
        if let Some(NetpatchError::UnknownInterface(_)) = cause.downcast_ref::<NetpatchError>() {
            return Some(format!("Run {} to list interfaces", "netpatch show".bright_cyan()));
        }
        if cause.downcast_ref::<ValidationError>().is_some() {
            return Some("Check the value and try again".to_string());
        }
        None
    });

    match hint {
        Some(hint) => eprintln!("  {} {}", "└".bright_cyan(), hint),
        None if err.to_string().contains("Permission denied") => {
            eprintln!("  {} Try running with elevated permissions", "└".bright_cyan())
        }
        None => eprintln!(
            "  {} Run with {} for more details",
            "└".bright_black(),
            "--verbose".bright_cyan()
        ),
    }
}

/// Write out the pending changes of `system`, or print them with `--dry-run`
pub fn commit(system: &mut NetworkSystem, config: &Config, write: &WriteArgs) -> Result<()> {
    if !system.is_dirty() {
        println!("{} Nothing to change", "ℹ".bright_blue());
        return Ok(());
    }

    let paths = config.paths();

    if write.dry_run {
        for preview in system.preview(&paths)? {
            println!("{} {}", "==>".bright_blue().bold(), preview.path().display());
            print!("{}", preview.contents);
        }
        return Ok(());
    }

    let lock_path = config.lock_path();
    let written = {
        let _lock = FileLock::open(&lock_path)
            .with_context(|| format!("Another netpatch may be running ({})", lock_path.display()))?;
        system.save(&paths)?
    };

    for path in &written {
        println!("{} Updated {}", "✓".bright_green(), path.display());
    }

    if write.apply {
        apply::handle(config)?;
    }

    Ok(())
}
