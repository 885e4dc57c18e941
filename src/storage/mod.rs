//! Durable persistence strategies.
//!
//! Every strategy implements the same contract: [`Store::load`] and
//! [`Store::save`] over a suffix-free storage path, with the strategy
//! owning its file-format suffix. A missing entry is the
//! [`StorageError::NotFound`] case, which the memoization engine treats as
//! a cache miss; every other failure propagates.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

mod bincode_impl;

#[cfg(feature = "json")]
mod json_impl;

#[cfg(feature = "compression")]
mod compression_impl;

pub use self::bincode_impl::BincodeStore;

#[cfg(feature = "json")]
pub use self::json_impl::JsonStore;

#[cfg(feature = "compression")]
pub use self::compression_impl::GzipStore;

/// Errors that can occur while loading or saving cached values.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No entry exists at the derived path. Expected during normal
    /// operation; drives the compute-and-store branch.
    #[error("no cached entry at {}", path.display())]
    NotFound {
        /// The suffixed file path that was probed.
        path: PathBuf,
    },
    /// I/O failure other than a missing file.
    #[error("I/O error")]
    Io(#[from] io::Error),
    /// Binary encoding/decoding failure.
    #[error("binary serialization error")]
    Bincode(#[from] bincode::Error),
    /// JSON encoding/decoding failure.
    #[cfg(feature = "json")]
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),
}

/// Uniform load/save contract over a named storage location.
///
/// Implementations differ only in file suffix and serialization format.
/// The engine holds its strategy behind `Arc<dyn Store<T>>` so the result
/// wrapper can share it for reloads.
pub trait Store<T>: Send + Sync {
    /// The file suffix this strategy appends, including the leading dot.
    fn extension(&self) -> &'static str;

    /// Load the value stored at `path` (suffix-free).
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when no file exists at the suffixed
    /// path; any other I/O or decoding failure otherwise.
    fn load(&self, path: &Path) -> Result<T, StorageError>;

    /// Save `value` at `path` (suffix-free), overwriting any existing
    /// entry.
    ///
    /// # Errors
    ///
    /// Any I/O or encoding failure.
    fn save(&self, path: &Path, value: &T) -> Result<(), StorageError>;
}

/// Append a format suffix to a suffix-free storage path.
pub(crate) fn suffixed(path: &Path, extension: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(extension);
    PathBuf::from(os)
}

/// Open an existing file, mapping a missing file to `NotFound`.
pub(crate) fn open_existing(path: &Path) -> Result<File, StorageError> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixed_appends_to_the_file_name() {
        let path = Path::new("/tmp/cache/f.a-1");
        assert_eq!(
            suffixed(path, ".bin"),
            PathBuf::from("/tmp/cache/f.a-1.bin")
        );
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        match open_existing(&path) {
            Err(StorageError::NotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }
}
