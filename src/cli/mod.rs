pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netpatch")]
#[command(about = "Edit a machine's network configuration files in place", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, env = "NETPATCH_CONFIG", help = "Config file to use")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory the system paths are resolved under")]
    pub root: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "More log output (-v, -vv)")]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show interfaces, resolvers, default route and NetworkManager state")]
    Show {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    #[command(about = "Replace the list of DNS servers")]
    Dns {
        #[arg(required = true, help = "Server addresses (commas or spaces separate several)")]
        servers: Vec<String>,
        #[command(flatten)]
        write: WriteArgs,
    },

    #[command(about = "Set or clear the default gateway")]
    Router {
        #[arg(required_unless_present = "clear", conflicts_with = "clear", help = "Gateway address")]
        address: Option<String>,
        #[arg(long, help = "Remove the default route")]
        clear: bool,
        #[command(flatten)]
        write: WriteArgs,
    },

    #[command(about = "Turn NetworkManager on or off")]
    Nm {
        #[arg(value_enum)]
        state: Switch,
        #[command(flatten)]
        write: WriteArgs,
    },

    #[command(about = "Change the settings of one interface")]
    Iface(IfaceArgs),

    #[command(about = "Restart networking so saved changes take effect")]
    Apply,

    #[command(about = "Manage netpatch settings")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct WriteArgs {
    #[arg(long, help = "Print the files that would be written instead of writing them")]
    pub dry_run: bool,
    #[arg(long, conflicts_with = "dry_run", help = "Restart networking after saving")]
    pub apply: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IfaceArgs {
    #[arg(help = "Interface name, e.g. eth0")]
    pub name: String,
    #[arg(long, conflicts_with = "disable", help = "Bring the interface up at boot")]
    pub enable: bool,
    #[arg(long, help = "Leave the interface down at boot")]
    pub disable: bool,
    #[arg(long, conflicts_with = "static_", help = "Configure with DHCP")]
    pub dhcp: bool,
    #[arg(long = "static", help = "Use a fixed address")]
    pub static_: bool,
    #[arg(long, help = "IPv4 address")]
    pub address: Option<String>,
    #[arg(long, help = "IPv4 netmask, e.g. 255.255.255.0")]
    pub netmask: Option<String>,
    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Print the effective configuration")]
    Show,
    #[command(about = "Write a default config file")]
    Init,
    #[command(about = "Get a configuration value")]
    Get {
        key: String,
    },
    #[command(about = "Set a configuration value")]
    Set {
        key: String,
        value: String,
    },
}
