//! Line-oriented reading and patching of text configuration files.
//!
//! [`read_lines`] streams every line of a file to a [`LineVisitor`].
//! [`patch_file`] runs a [`LineRewriter`] over the same lines, lets it
//! append whatever it did not find, and replaces the file in one write.

pub mod patcher;
pub mod reader;

pub use patcher::{patch_file, preview_patch, rewriter_fn, LineRewriter, OutputBuffer, Rewrite};
pub use reader::{read_lines, visitor_fn, LineVisitor};

use std::path::Path;

/// A single line handed to a visitor or rewriter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext<'a> {
    pub path: &'a Path,
    /// 1-based
    pub line_no: usize,
    /// Line text without its terminator, invalid UTF-8 replaced by U+FFFD
    pub text: &'a str,
    /// The same line exactly as stored in the file
    pub raw: &'a [u8],
}

impl<'a> LineContext<'a> {
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.text.starts_with(prefix)
    }

    /// Remainder of the line after `prefix`, if the line starts with it
    pub fn after(&self, prefix: &str) -> Option<&'a str> {
        self.text.strip_prefix(prefix)
    }
}
