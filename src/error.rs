use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for netpatch operations
#[derive(Error, Debug)]
pub enum NetpatchError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    LineIo(#[from] LineIoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown interface: {0}")]
    UnknownInterface(String),
}

/// Where in a file a line callback failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// 1-based line number
    Line(usize),
    /// The append phase that runs after the last line
    EndOfFile,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Line(n) => write!(f, "line {}", n),
            Position::EndOfFile => f.write_str("end of file"),
        }
    }
}

/// Errors raised while reading or patching a file line by line
#[derive(Error, Debug)]
pub enum LineIoError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} at {position}: {source}")]
    Callback {
        path: PathBuf,
        position: Position,
        #[source]
        source: CallbackError,
    },
}

impl LineIoError {
    /// Path of the file the failure belongs to
    pub fn path(&self) -> &PathBuf {
        match self {
            LineIoError::Read { path, .. }
            | LineIoError::Write { path, .. }
            | LineIoError::Callback { path, .. } => path,
        }
    }
}

/// Failure reported by a line visitor or rewriter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("{0}")]
    Message(String),
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid IPv4 address: {0:?}")]
    InvalidIpv4(String),

    #[error("Invalid netmask: {0:?}")]
    InvalidNetmask(String),

    #[error("Invalid nameserver address: {0:?}")]
    InvalidNameserver(String),

    #[error("Invalid interface name: {0:?}")]
    InvalidInterfaceName(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Result type alias for netpatch operations
pub type NetpatchResult<T> = Result<T, NetpatchError>;

/// Helper trait for adding context to I/O errors
pub trait ErrorContext<T> {
    fn with_context<C, F>(self, f: F) -> NetpatchResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T> ErrorContext<T> for Result<T, io::Error> {
    fn with_context<C, F>(self, f: F) -> NetpatchResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            NetpatchError::Io(io::Error::new(e.kind(), format!("{}: {}", f(), e)))
        })
    }
}
