//! Readers and rewriters for the individual network configuration files.
//!
//! Each submodule understands one file format and plugs into
//! [`crate::lineio`] as a visitor, a rewriter, or both. Lines a rewriter
//! does not recognise are always kept.

pub mod devices;
pub mod ifcfg;
pub mod nm;
pub mod resolver;
pub mod routes;

pub use devices::DeviceScanner;
pub use ifcfg::{InterfaceReader, InterfaceWriter};
pub use nm::{NetworkManagerReader, NetworkManagerWriter};
pub use resolver::{parse_nameservers, NameserverReader, NameserverWriter};
pub use routes::{DefaultRouteReader, DefaultRouteWriter};

/// Value of a `KEY=value` line, with one opening quote skipped
pub(crate) fn raw_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let value = line.strip_prefix(key)?.strip_prefix('=')?;
    Some(
        value
            .strip_prefix('\'')
            .or_else(|| value.strip_prefix('"'))
            .unwrap_or(value),
    )
}

/// Like [`raw_value`], cut at the first closing quote
pub(crate) fn unquoted_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let value = raw_value(line, key)?;
    Some(match value.find(&['\'', '"'][..]) {
        Some(end) => &value[..end],
        None => value,
    })
}
