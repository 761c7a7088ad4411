use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

/// Replaces a file's contents in one step via a sibling temp file
#[derive(Debug)]
pub struct AtomicFile {
    path: PathBuf,
    temp_path: PathBuf,
}

// Matches the kernel's own limit on nested links
const MAX_SYMLINK_DEPTH: usize = 40;

impl AtomicFile {
    /// Symlinks are followed so the link survives the rename, dangling
    /// ones included
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = resolve_links(path.as_ref())?;
        let temp_path = Self::temp_path(&path)?;

        Ok(Self { path, temp_path })
    }

    fn temp_path(path: &Path) -> io::Result<PathBuf> {
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid file path: {}", path.display()),
            )
        })?;

        let temp_name = format!(
            ".{}.tmp.{}",
            file_name.to_string_lossy(),
            std::process::id()
        );

        Ok(path.with_file_name(temp_name))
    }

    /// Write `content` to the temp file, sync it, and rename it over the target.
    ///
    /// An existing target's permission bits are carried over; new files get
    /// 0644. The temp file is removed if any step fails.
    pub fn write(&self, content: &[u8]) -> io::Result<()> {
        let result = self.write_temp(content).and_then(|()| fs::rename(&self.temp_path, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&self.temp_path);
        }
        result
    }

    fn write_temp(&self, content: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        let permissions = {
            let permissions = match fs::metadata(&self.path) {
                Ok(metadata) => metadata.permissions(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => fs::Permissions::from_mode(0o644),
                Err(e) => return Err(e),
            };
            options.mode(permissions.mode());
            permissions
        };

        let mut temp_file = options.open(&self.temp_path)?;

        // A leftover temp file keeps its old mode, and umask trims the new one
        #[cfg(unix)]
        temp_file.set_permissions(permissions)?;

        temp_file.write_all(content)?;
        temp_file.sync_all()?;

        Ok(())
    }
}

/// Final target of `path` after following every symlink on it.
///
/// Unlike `fs::canonicalize` this works when the last link dangles.
fn resolve_links(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();

    for _ in 0..MAX_SYMLINK_DEPTH {
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                let target = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) => parent.join(target),
                    None => target,
                };
            }
            Ok(_) => return Ok(current),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(current),
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::Other,
        format!("Too many levels of symbolic links: {}", path.display()),
    ))
}

/// Advisory lock serialising netpatch processes
#[cfg(unix)]
pub mod lock {
    use std::fs::{File, OpenOptions};
    use std::io;
    use std::os::unix::io::AsRawFd;
    use std::path::Path;

    use crate::error::{ErrorContext, NetpatchResult};

    pub struct FileLock {
        file: File,
    }

    impl FileLock {
        /// Open (creating if needed) `path` and block until the lock is held
        pub fn open(path: &Path) -> NetpatchResult<Self> {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(path)
                .with_context(|| format!("Failed to open lock file {}", path.display()))?;
            Self::acquire(file)
                .with_context(|| format!("Failed to lock {}", path.display()))
        }

        pub fn acquire(file: File) -> io::Result<Self> {
            use libc::{flock, LOCK_EX};

            let fd = file.as_raw_fd();
            let result = unsafe { flock(fd, LOCK_EX) };

            if result != 0 {
                return Err(io::Error::last_os_error());
            }

            Ok(Self { file })
        }
    }

    impl Drop for FileLock {
        fn drop(&mut self) {
            use libc::{flock, LOCK_UN};

            let fd = self.file.as_raw_fd();
            unsafe { flock(fd, LOCK_UN) };
        }
    }
}

#[cfg(not(unix))]
pub mod lock {
    use std::fs::{File, OpenOptions};
    use std::io;
    use std::path::Path;

    use crate::error::{ErrorContext, NetpatchResult};

    pub struct FileLock {
        _file: File,
    }

    impl FileLock {
        pub fn open(path: &Path) -> NetpatchResult<Self> {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(path)
                .with_context(|| format!("Failed to open lock file {}", path.display()))?;
            Ok(Self { _file: file })
        }

        pub fn acquire(file: File) -> io::Result<Self> {
            Ok(Self { _file: file })
        }
    }
}
