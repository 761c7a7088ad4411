use tracing::debug;

use crate::error::CallbackError;
use crate::lineio::{LineContext, LineRewriter, LineVisitor, Rewrite};

const NAMESERVER: &str = "nameserver ";

/// Split user input into nameserver addresses.
///
/// Addresses may be separated by spaces, tabs, newlines or commas.
pub fn parse_nameservers(text: &str) -> Vec<String> {
    text.split(&[' ', '\t', '\n', '\r', ','][..])
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Collects `nameserver` entries from a resolver file
#[derive(Debug, Default)]
pub struct NameserverReader {
    servers: Vec<String>,
}

impl NameserverReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_servers(self) -> Vec<String> {
        self.servers
    }
}

impl LineVisitor for NameserverReader {
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError> {
        if let Some(server) = line.after(NAMESERVER).map(str::trim) {
            if !server.is_empty() {
                debug!(path = %line.path.display(), line = line.line_no, server, "Read nameserver");
                self.servers.push(server.to_string());
            }
        }
        Ok(())
    }
}

/// Replaces every `nameserver` entry with the given list, placed at the end
#[derive(Debug)]
pub struct NameserverWriter<'a> {
    servers: &'a [String],
}

impl<'a> NameserverWriter<'a> {
    pub fn new(servers: &'a [String]) -> Self {
        Self { servers }
    }
}

impl LineRewriter for NameserverWriter<'_> {
    fn rewrite(&mut self, line: &LineContext<'_>) -> Result<Rewrite, CallbackError> {
        if line.starts_with(NAMESERVER) {
            Ok(Rewrite::Drop)
        } else {
            Ok(Rewrite::Keep)
        }
    }

    fn finish(&mut self) -> Result<String, CallbackError> {
        Ok(self
            .servers
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("{}{}", NAMESERVER, s))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
