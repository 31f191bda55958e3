//! Helpers that materialize a stream on disk.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use crate::{Consumer, DataType, Producer, Result};

/// Writes the `size`-byte stream of `data_type` for `seed` to `path`, replacing any existing
/// file, and returns a consumer that verifies it.
///
/// A partially written file is removed before the error is returned.
///
/// # Example
/// ```
/// # use randstream::{create_file, DataType};
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("stream.txt");
/// let consumer = create_file(DataType::Text, 5, 10_000, &path)?;
/// consumer.read_from_file(&path)?;
/// consumer.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn create_file<P: AsRef<Path>>(
    data_type: DataType,
    seed: i64,
    size: u64,
    path: P,
) -> Result<Consumer> {
    let path = path.as_ref();
    let producer = Producer::new(data_type, seed, size)?;
    let mut file = File::create(path)?;
    if let Err(err) = producer.write_to(&mut file).and_then(|_| file.sync_all()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            log::warn!("failed to remove {}: {remove_err}", path.display());
        }
        return Err(err.into());
    }
    log::debug!("wrote {} of {data_type} to {}", producer.total_read(), path.display());
    Ok(producer.verifier())
}

/// Like [`create_file`], but writes to a new `randstream*.tmp` file in the system temporary
/// directory and returns its path. The file is not removed automatically.
pub fn create_temp_file(data_type: DataType, seed: i64, size: u64) -> Result<(PathBuf, Consumer)> {
    let producer = Producer::new(data_type, seed, size)?;
    let mut file = tempfile::Builder::new()
        .prefix("randstream")
        .suffix(".tmp")
        .tempfile()?;
    producer.write_to(&mut file)?;
    let path = file.into_temp_path().keep().map_err(io::Error::from)?;
    log::debug!("wrote {} of {data_type} to {}", producer.total_read(), path.display());
    Ok((path, producer.verifier()))
}
