use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Permission bits for newly created destination files.
#[cfg(unix)]
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// An open output destination shared by every session that resolves to it.
///
/// Cloning is cheap and every clone writes to the same underlying file or to
/// the process's standard output. Writes are not serialized between clones:
/// concurrent sessions writing one destination may interleave unless the
/// caller holds the serialization gate.
#[derive(Clone)]
pub struct OutputHandle {
    inner: Arc<OutputTarget>,
}

enum OutputTarget {
    Stdout,
    File { path: PathBuf, file: File },
}

impl OutputHandle {
    /// A handle writing to standard output.
    pub fn stdout() -> Self {
        Self {
            inner: Arc::new(OutputTarget::Stdout),
        }
    }

    /// Open `path` for writing, creating it if missing.
    ///
    /// With `append` the file is opened in append mode, otherwise it is
    /// truncated.
    pub fn open(path: impl AsRef<Path>, append: bool) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        if append {
            options.append(true);
        } else {
            options.truncate(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(DEFAULT_FILE_MODE);
        }
        let file = options.open(&path)?;
        Ok(Self {
            inner: Arc::new(OutputTarget::File { path, file }),
        })
    }

    /// The file path, or `None` for standard output.
    pub fn path(&self) -> Option<&Path> {
        match self.inner.as_ref() {
            OutputTarget::Stdout => None,
            OutputTarget::File { path, .. } => Some(path),
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self.inner.as_ref(), OutputTarget::Stdout)
    }

    /// Whether two handles refer to the same opened destination.
    pub fn same_destination(&self, other: &OutputHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Write for OutputHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.inner.as_ref() {
            OutputTarget::Stdout => std::io::stdout().write(buf),
            OutputTarget::File { file, .. } => (&*file).write(buf),
        }
    }

    // Stdout holds its lock for the whole call, so one unit is never split
    // by a concurrent writer.
    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        match self.inner.as_ref() {
            OutputTarget::Stdout => std::io::stdout().write_all(buf),
            OutputTarget::File { file, .. } => (&*file).write_all(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.inner.as_ref() {
            OutputTarget::Stdout => std::io::stdout().flush(),
            OutputTarget::File { file, .. } => (&*file).flush(),
        }
    }
}

impl std::fmt::Debug for OutputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.as_ref() {
            OutputTarget::Stdout => f
                .debug_struct("OutputHandle")
                .field("target", &"stdout")
                .finish(),
            OutputTarget::File { path, .. } => {
                f.debug_struct("OutputHandle").field("path", path).finish()
            }
        }
    }
}

impl std::fmt::Display for OutputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.as_ref() {
            OutputTarget::Stdout => f.write_str("<stdout>"),
            OutputTarget::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}
