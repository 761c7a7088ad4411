pub mod config;
pub mod error;
pub mod fields;
pub mod lineio;
pub mod storage;
pub mod system;
pub mod validation;

pub use config::{Config, Paths};
pub use error::{CallbackError, LineIoError, NetpatchError, NetpatchResult, Position};
pub use lineio::{patch_file, preview_patch, read_lines, LineContext, LineRewriter, LineVisitor, Rewrite};
pub use system::{Interface, NetworkSystem};
