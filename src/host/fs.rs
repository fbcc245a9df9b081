//! Filesystem access for the `readFile` and `readTextFile` template functions.
//!
//! Paths are resolved against one of the user's well-known directories, the
//! same way the desktop app scopes file reads to Documents, Desktop or
//! Downloads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Well-known base directory a relative path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaseDirectory {
    Document,
    Desktop,
    #[default]
    Download,
}

impl BaseDirectory {
    /// Maps a user supplied directory name to a base directory.
    ///
    /// Matching ignores case; unknown names fall back to `Download`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "document" => BaseDirectory::Document,
            "desktop" => BaseDirectory::Desktop,
            _ => BaseDirectory::Download,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseDirectory::Document => "document",
            BaseDirectory::Desktop => "desktop",
            BaseDirectory::Download => "download",
        }
    }
}

impl fmt::Display for BaseDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to the host filesystem.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Reads a file as raw bytes.
    async fn read_file(&self, path: &str, base: BaseDirectory) -> io::Result<Vec<u8>>;

    /// Reads a file as UTF-8 text.
    async fn read_text_file(&self, path: &str, base: BaseDirectory) -> io::Result<String> {
        let bytes = self.read_file(path, base).await?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Filesystem backed by the platform's user directories.
///
/// Absolute paths are read as given; relative paths are joined onto the
/// selected base directory.
///
/// Reads are blocking and run on the task that awaits them. Hosts that read
/// large files from an async executor should supply their own [`FileSystem`]
/// that moves the read onto a blocking pool.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    /// Overrides the platform lookup for every base directory.
    root: Option<PathBuf>,
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Resolves every base directory to `root` instead of the user's folders.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Resolves `path` against `base`.
    pub fn resolve(&self, path: &str, base: BaseDirectory) -> io::Result<PathBuf> {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            return Ok(candidate.to_path_buf());
        }

        let dir = match &self.root {
            Some(root) => Some(root.clone()),
            None => match base {
                BaseDirectory::Document => dirs::document_dir(),
                BaseDirectory::Desktop => dirs::desktop_dir(),
                BaseDirectory::Download => dirs::download_dir(),
            },
        };

        dir.map(|d| d.join(candidate)).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} directory is not available", base),
            )
        })
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    /// Reads the whole file with a blocking `std::fs::read`.
    async fn read_file(&self, path: &str, base: BaseDirectory) -> io::Result<Vec<u8>> {
        let full_path = self.resolve(path, base)?;
        log::debug!("reading {} ({})", full_path.display(), base);
        std::fs::read(&full_path)
    }
}
