//! JSON store for human-readable format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{open_existing, suffixed, StorageError, Store};

/// JSON store for human-readable format.
///
/// Less compact than [`BincodeStore`](super::BincodeStore) but the stored
/// entries can be inspected and diffed by hand, which is useful during
/// development.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl<T> Store<T> for JsonStore
where
    T: Serialize + DeserializeOwned,
{
    fn extension(&self) -> &'static str {
        ".json"
    }

    fn load(&self, path: &Path) -> Result<T, StorageError> {
        let file = open_existing(&suffixed(path, Store::<T>::extension(self)))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn save(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        let file = File::create(suffixed(path, Store::<T>::extension(self)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry");

        let value = vec![1i64, 2, 3];
        JsonStore.save(&path, &value).unwrap();
        let loaded: Vec<i64> = JsonStore.load(&path).unwrap();
        assert_eq!(loaded, value);

        let raw = std::fs::read_to_string(dir.path().join("entry.json")).unwrap();
        assert!(raw.contains('1'));
    }
}
