use tracing::debug;

use crate::error::CallbackError;
use crate::lineio::{LineContext, LineRewriter, LineVisitor, Rewrite};

const DEFAULT_ROUTE: &str = "default ";

/// Splits the text after `default ` into gateway and trailing columns
fn split_gateway(rest: &str) -> (&str, &str) {
    let rest = rest.trim_start();
    match rest.find(char::is_whitespace) {
        Some(end) => (&rest[..end], &rest[end..]),
        None => (rest, ""),
    }
}

/// Reads the gateway of the first default route
#[derive(Debug, Default)]
pub struct DefaultRouteReader {
    gateway: Option<String>,
}

impl DefaultRouteReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_gateway(self) -> Option<String> {
        self.gateway
    }
}

impl LineVisitor for DefaultRouteReader {
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError> {
        if self.gateway.is_some() {
            return Ok(());
        }
        if let Some(rest) = line.after(DEFAULT_ROUTE) {
            let (gateway, _) = split_gateway(rest);
            if !gateway.is_empty() {
                debug!(path = %line.path.display(), line = line.line_no, gateway, "Read default route");
                self.gateway = Some(gateway.to_string());
            }
        }
        Ok(())
    }
}

/// Points the default route at a new gateway.
///
/// The first default route keeps its position and any columns after the
/// gateway; further default routes are dropped. With no gateway every
/// default route is removed.
#[derive(Debug)]
pub struct DefaultRouteWriter<'a> {
    gateway: Option<&'a str>,
    written: bool,
}

impl<'a> DefaultRouteWriter<'a> {
    pub fn new(gateway: Option<&'a str>) -> Self {
        Self {
            gateway: gateway.map(str::trim).filter(|g| !g.is_empty()),
            written: false,
        }
    }
}

impl LineRewriter for DefaultRouteWriter<'_> {
    fn rewrite(&mut self, line: &LineContext<'_>) -> Result<Rewrite, CallbackError> {
        let Some(rest) = line.after(DEFAULT_ROUTE) else {
            return Ok(Rewrite::Keep);
        };
        let Some(gateway) = self.gateway else {
            return Ok(Rewrite::Drop);
        };
        if self.written {
            return Ok(Rewrite::Drop);
        }

        self.written = true;
        let (_, columns) = split_gateway(rest);
        Ok(Rewrite::replace(format!("{}{}{}", DEFAULT_ROUTE, gateway, columns)))
    }

    fn finish(&mut self) -> Result<String, CallbackError> {
        match self.gateway {
            Some(gateway) if !self.written => Ok(format!("{}{}", DEFAULT_ROUTE, gateway)),
            _ => Ok(String::new()),
        }
    }
}
