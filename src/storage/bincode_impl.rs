//! Bincode store for compact binary format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{open_existing, suffixed, StorageError, Store};

/// Bincode store for compact binary format.
///
/// The default persistence strategy: fast, space-efficient, suitable for
/// any serde-serializable value.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeStore;

impl<T> Store<T> for BincodeStore
where
    T: Serialize + DeserializeOwned,
{
    fn extension(&self) -> &'static str {
        ".bin"
    }

    fn load(&self, path: &Path) -> Result<T, StorageError> {
        let file = open_existing(&suffixed(path, Store::<T>::extension(self)))?;
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }

    fn save(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        let file = File::create(suffixed(path, Store::<T>::extension(self)))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }
}
