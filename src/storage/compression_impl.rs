//! Gzip-compressed binary store.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{open_existing, suffixed, StorageError, Store};

/// Gzip-compressed binary store.
///
/// The bincode format with gzip applied on the way through the file,
/// trading a little CPU for smaller entries. Worthwhile when cached values
/// are large and repetitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipStore;

impl<T> Store<T> for GzipStore
where
    T: Serialize + DeserializeOwned,
{
    fn extension(&self) -> &'static str {
        ".bin.gz"
    }

    fn load(&self, path: &Path) -> Result<T, StorageError> {
        let file = open_existing(&suffixed(path, Store::<T>::extension(self)))?;
        let decoder = GzDecoder::new(BufReader::new(file));
        Ok(bincode::deserialize_from(decoder)?)
    }

    fn save(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        let file = File::create(suffixed(path, Store::<T>::extension(self)))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        bincode::serialize_into(&mut encoder, value)?;
        encoder.finish().map_err(StorageError::Io)?;
        Ok(())
    }
}
