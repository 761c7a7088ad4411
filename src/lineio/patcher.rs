use std::path::Path;
use tracing::{debug, trace};

use super::reader::{self, LineVisitor};
use super::LineContext;
use crate::error::{CallbackError, LineIoError, Position};
use crate::storage::AtomicFile;

/// What a rewriter does with one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    Keep,
    Replace(String),
    Drop,
}

impl Rewrite {
    /// Substitute `text` for the line; an empty string drops it
    pub fn replace(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Rewrite::Drop
        } else {
            Rewrite::Replace(text)
        }
    }
}

/// Rewrites a file line by line, then appends what it never saw.
///
/// `rewrite` is called for every line in file order. `finish` is called
/// exactly once afterwards, also when the file is missing or empty, and
/// returns the text to append (empty for nothing).
pub trait LineRewriter {
    fn rewrite(&mut self, line: &LineContext<'_>) -> Result<Rewrite, CallbackError>;

    fn finish(&mut self) -> Result<String, CallbackError> {
        Ok(String::new())
    }
}

/// Rewriter built from two closures, see [`rewriter_fn`]
pub struct FnRewriter<L, F> {
    rewrite: L,
    finish: F,
}

impl<L, F> LineRewriter for FnRewriter<L, F>
where
    L: FnMut(&LineContext<'_>) -> Result<Rewrite, CallbackError>,
    F: FnMut() -> Result<String, CallbackError>,
{
    fn rewrite(&mut self, line: &LineContext<'_>) -> Result<Rewrite, CallbackError> {
        (self.rewrite)(line)
    }

    fn finish(&mut self) -> Result<String, CallbackError> {
        (self.finish)()
    }
}

pub fn rewriter_fn<L, F>(rewrite: L, finish: F) -> FnRewriter<L, F>
where
    L: FnMut(&LineContext<'_>) -> Result<Rewrite, CallbackError>,
    F: FnMut() -> Result<String, CallbackError>,
{
    FnRewriter { rewrite, finish }
}

/// Accumulates patched output with blank-run collapse.
///
/// A blank line is held back until a non-blank line follows it, so the
/// output never starts or ends with a blank line and never holds two in a
/// row. Lines are bytes so untouched lines survive unchanged.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    content: Vec<u8>,
    started: bool,
    pending_blank: bool,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: impl AsRef<[u8]>) {
        let line = line.as_ref();
        if line.is_empty() {
            if self.started {
                self.pending_blank = true;
            }
            return;
        }
        self.push_raw(line);
    }

    /// Append a possibly multi-line block.
    ///
    /// Only the first line is collapsed against what precedes it; the rest
    /// is copied as is. Trailing terminators are dropped.
    pub fn push_block(&mut self, block: &str) {
        let block = block.trim_end_matches('\n');
        if block.is_empty() {
            return;
        }

        let mut lines = block.split('\n');
        if let Some(first) = lines.next() {
            self.push_line(first);
        }
        for line in lines {
            self.push_raw(line.as_bytes());
        }
    }

    fn push_raw(&mut self, line: &[u8]) {
        if self.pending_blank {
            self.content.push(b'\n');
            self.pending_blank = false;
        }
        self.content.extend_from_slice(line);
        self.content.push(b'\n');
        self.started = true;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }
}

struct PatchVisitor<'a, R: ?Sized> {
    rewriter: &'a mut R,
    buffer: &'a mut OutputBuffer,
    /// Number of the fragment after the last terminator
    final_line: usize,
}

impl<R> LineVisitor for PatchVisitor<'_, R>
where
    R: LineRewriter + ?Sized,
{
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError> {
        match self.rewriter.rewrite(line)? {
            // The empty fragment after a trailing newline is not a line of its own
            Rewrite::Keep if line.raw.is_empty() && line.line_no == self.final_line => {}
            Rewrite::Keep => self.buffer.push_line(line.raw),
            // Every piece of a multi-line replacement is collapsed like a source line
            Rewrite::Replace(text) if !text.is_empty() => {
                trace!(line = line.line_no, from = line.text, to = %text, "Replacing line");
                for piece in text.split('\n') {
                    self.buffer.push_line(piece);
                }
            }
            Rewrite::Replace(_) | Rewrite::Drop => {
                trace!(line = line.line_no, text = line.text, "Dropping line");
            }
        }
        Ok(())
    }
}

/// Compute the patched contents of `path` without touching the file.
///
/// Bytes that are not valid UTF-8 show up as U+FFFD; [`patch_file`]
/// writes them back unchanged.
pub fn preview_patch<R>(path: &Path, rewriter: &mut R) -> Result<String, LineIoError>
where
    R: LineRewriter + ?Sized,
{
    let contents = patched_contents(path, rewriter)?;
    Ok(String::from_utf8_lossy(&contents).into_owned())
}

fn patched_contents<R>(path: &Path, rewriter: &mut R) -> Result<Vec<u8>, LineIoError>
where
    R: LineRewriter + ?Sized,
{
    let mut buffer = OutputBuffer::new();

    if let Some(contents) = reader::load(path)? {
        let mut visitor = PatchVisitor {
            rewriter: &mut *rewriter,
            buffer: &mut buffer,
            final_line: contents.iter().filter(|&&b| b == b'\n').count() + 1,
        };
        reader::visit_contents(path, &contents, &mut visitor)?;
    }

    let tail = rewriter.finish().map_err(|source| LineIoError::Callback {
        path: path.to_path_buf(),
        position: Position::EndOfFile,
        source,
    })?;
    if !tail.is_empty() {
        trace!(text = %tail, "Appending at end of file");
    }
    buffer.push_block(&tail);

    Ok(buffer.into_bytes())
}

/// Rewrite `path` in place.
///
/// Nothing is written unless every line and the append phase succeed; the
/// new contents then replace the file atomically.
pub fn patch_file<R>(path: &Path, rewriter: &mut R) -> Result<(), LineIoError>
where
    R: LineRewriter + ?Sized,
{
    let contents = patched_contents(path, rewriter)?;

    let write_error = |source| LineIoError::Write {
        path: path.to_path_buf(),
        source,
    };
    AtomicFile::new(path)
        .map_err(write_error)?
        .write(&contents)
        .map_err(write_error)?;

    debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}
