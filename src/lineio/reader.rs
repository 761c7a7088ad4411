use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use super::LineContext;
use crate::error::{CallbackError, LineIoError, Position};

/// Receives each line of a file in order
pub trait LineVisitor {
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError>;
}

/// Visitor built from a closure, see [`visitor_fn`]
pub struct FnVisitor<F> {
    visit: F,
}

impl<F> LineVisitor for FnVisitor<F>
where
    F: FnMut(&LineContext<'_>) -> Result<(), CallbackError>,
{
    fn visit(&mut self, line: &LineContext<'_>) -> Result<(), CallbackError> {
        (self.visit)(line)
    }
}

pub fn visitor_fn<F>(visit: F) -> FnVisitor<F>
where
    F: FnMut(&LineContext<'_>) -> Result<(), CallbackError>,
{
    FnVisitor { visit }
}

/// Read `path` and hand every line to `visitor`.
///
/// The content is split on `\n` and the fragment after the last terminator
/// is visited too, even when it is empty. Bytes are not checked: a line
/// that is not UTF-8 reaches the visitor with its raw bytes intact and a
/// lossy `text`. A missing file has no lines and is not an error. The first
/// visitor failure stops the pass.
pub fn read_lines<V>(path: &Path, visitor: &mut V) -> Result<(), LineIoError>
where
    V: LineVisitor + ?Sized,
{
    match load(path)? {
        Some(contents) => visit_contents(path, &contents, visitor),
        None => Ok(()),
    }
}

/// Whole file contents, or `None` if the file does not exist
pub(crate) fn load(path: &Path) -> Result<Option<Vec<u8>>, LineIoError> {
    match fs::read(path) {
        Ok(contents) => {
            debug!(path = %path.display(), bytes = contents.len(), "Read file");
            Ok(Some(contents))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "File absent, treating as empty");
            Ok(None)
        }
        Err(source) => Err(LineIoError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn visit_contents<V>(
    path: &Path,
    contents: &[u8],
    visitor: &mut V,
) -> Result<(), LineIoError>
where
    V: LineVisitor + ?Sized,
{
    for (idx, raw) in contents.split(|&b| b == b'\n').enumerate() {
        let text = String::from_utf8_lossy(raw);
        let line = LineContext {
            path,
            line_no: idx + 1,
            text: &text,
            raw,
        };

        visitor.visit(&line).map_err(|source| LineIoError::Callback {
            path: path.to_path_buf(),
            position: Position::Line(line.line_no),
            source,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn collect(path: &Path) -> Result<Vec<(usize, String)>, LineIoError> {
        let mut seen = Vec::new();
        read_lines(
            path,
            &mut visitor_fn(|line| {
                seen.push((line.line_no, line.text.to_string()));
                Ok(())
            }),
        )?;
        Ok(seen)
    }

    #[test]
    fn test_missing_file_has_no_lines() {
        let temp_dir = TempDir::new().unwrap();
        let seen = collect(&temp_dir.path().join("absent")).unwrap();
        assert!(seen.is_empty());
    }

    #[test]
    fn test_trailing_fragment_is_visited() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("two");
        fs::write(&path, "a\nb\n").unwrap();

        let seen = collect(&path).unwrap();
        assert_eq!(
            seen,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, String::new()),
            ]
        );
    }

    #[test]
    fn test_unterminated_last_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial");
        fs::write(&path, "a\nb").unwrap();

        let seen = collect(&path).unwrap();
        assert_eq!(seen, vec![(1, "a".to_string()), (2, "b".to_string())]);
    }

    #[test]
    fn test_empty_file_has_one_empty_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty");
        fs::write(&path, "").unwrap();

        let seen = collect(&path).unwrap();
        assert_eq!(seen, vec![(1, String::new())]);
    }

    #[test]
    fn test_carriage_return_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crlf");
        fs::write(&path, "a\r\nb").unwrap();

        let seen = collect(&path).unwrap();
        assert_eq!(seen[0], (1, "a\r".to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1");
        fs::write(&path, b"# caf\xe9\nnameserver 1.1.1.1\n").unwrap();

        let mut raws = Vec::new();
        read_lines(
            &path,
            &mut visitor_fn(|line| {
                raws.push(line.raw.to_vec());
                Ok(())
            }),
        )
        .unwrap();

        assert_eq!(raws[0], b"# caf\xe9".to_vec());
        assert_eq!(raws[1], b"nameserver 1.1.1.1".to_vec());
        assert_eq!(raws.len(), 3);

        let seen = collect(&path).unwrap();
        assert_eq!(seen[0], (1, "# caf\u{fffd}".to_string()));
    }

    #[test]
    fn test_visitor_failure_stops_reading() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stop");
        fs::write(&path, "one\ntwo\nthree\n").unwrap();

        let mut visited = 0;
        let err = read_lines(
            &path,
            &mut visitor_fn(|line| {
                visited += 1;
                if line.text == "two" {
                    return Err(CallbackError::Message("bad line".to_string()));
                }
                Ok(())
            }),
        )
        .unwrap_err();

        assert_eq!(visited, 2);
        match err {
            LineIoError::Callback { position, source, .. } => {
                assert_eq!(position, Position::Line(2));
                assert_eq!(source, CallbackError::Message("bad line".to_string()));
            }
            other => panic!("Expected callback error, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_read_error() {
        let temp_dir = TempDir::new().unwrap();

        let err = collect(temp_dir.path()).unwrap_err();
        assert!(matches!(err, LineIoError::Read { .. }));
    }
}
