use tracing::debug;

use super::raw_value;
use crate::error::CallbackError;
use crate::lineio::{LineContext, LineRewriter, LineVisitor, Rewrite};

const KEY: &str = "NETWORKMANAGER";

/// Reads the `NETWORKMANAGER="yes|no"` switch; the last occurrence wins
#[derive(Debug, Default)]
pub struct NetworkManagerReader {
    enabled: Option<bool>,
}

impl NetworkManagerReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` when the file has no such line
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

impl LineVisitor for NetworkManagerReader {
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError> {
        if let Some(value) = raw_value(line.text, KEY) {
            let enabled = value.starts_with("yes");
            debug!(path = %line.path.display(), line = line.line_no, enabled, "Read network manager flag");
            self.enabled = Some(enabled);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct NetworkManagerWriter {
    enabled: bool,
    written: bool,
}

impl NetworkManagerWriter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            written: false,
        }
    }

    fn render(&self) -> String {
        format!("{}=\"{}\"", KEY, if self.enabled { "yes" } else { "no" })
    }
}

impl LineRewriter for NetworkManagerWriter {
    fn rewrite(&mut self, line: &LineContext<'_>) -> Result<Rewrite, CallbackError> {
        if raw_value(line.text, KEY).is_none() {
            return Ok(Rewrite::Keep);
        }
        self.written = true;
        Ok(Rewrite::replace(self.render()))
    }

    fn finish(&mut self) -> Result<String, CallbackError> {
        if self.written {
            Ok(String::new())
        } else {
            Ok(self.render())
        }
    }
}
