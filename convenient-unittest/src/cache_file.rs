//! On-disk format of a fingerprint generation.
//!
//! ```text
//! [0..8)  count N, native-endian u64
//! [8..)   N native-endian i64 fingerprints
//! ```
//!
//! The format follows the host's byte order and is not portable across
//! architectures. The empty placeholder written on first run has no count
//! and does not decode; a run must persist before the next one can load.

use crate::error::{Result, StalenessError};
use crate::fingerprint::Fingerprint;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const COUNT_WIDTH: usize = size_of::<u64>();
const FINGERPRINT_WIDTH: usize = size_of::<i64>();

/// Serialize a generation.
#[must_use]
pub fn encode(fingerprints: &[Fingerprint]) -> Bytes {
    let mut buf = BytesMut::with_capacity(COUNT_WIDTH + fingerprints.len() * FINGERPRINT_WIDTH);
    buf.put_u64_ne(fingerprints.len() as u64);
    for fingerprint in fingerprints {
        buf.put_i64_ne(fingerprint.value());
    }
    buf.freeze()
}

/// Deserialize a generation.
///
/// Bytes past the declared count are ignored.
///
/// # Errors
///
/// `UnexpectedEof` if the count or any declared fingerprint is missing,
/// `InvalidData` if the declared count cannot be addressed on this host.
pub fn decode(mut data: &[u8]) -> io::Result<Vec<Fingerprint>> {
    if data.remaining() < COUNT_WIDTH {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("cache header is {} bytes, expected {COUNT_WIDTH}", data.len()),
        ));
    }

    let declared = data.get_u64_ne();
    let count = usize::try_from(declared).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("declared count {declared} does not fit in memory"),
        )
    })?;
    let needed = count.checked_mul(FINGERPRINT_WIDTH).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("declared count {count} does not fit in memory"),
        )
    })?;
    if data.remaining() < needed {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "cache declares {count} fingerprints but holds only {}",
                data.remaining() / FINGERPRINT_WIDTH
            ),
        ));
    }

    Ok((0..count).map(|_| Fingerprint::new(data.get_i64_ne())).collect())
}

/// Read the generation stored at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// `StalenessError::CacheRead` if the file exists but cannot be read or its
/// payload is truncated.
pub fn read(path: &Path) -> Result<Option<Vec<Fingerprint>>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StalenessError::CacheRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    decode(&data)
        .map(Some)
        .map_err(|source| StalenessError::CacheRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Create an empty placeholder cache file.
///
/// # Errors
///
/// `StalenessError::CacheCreate` if the file cannot be created.
pub fn create_placeholder(path: &Path) -> Result<()> {
    let _ = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| StalenessError::CacheCreate {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Sibling file that [`write`] stages the new generation in.
///
/// The full file name gets a `.tmp` suffix, so the temp file never collides
/// with the cache file itself or with another file sharing its stem.
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the file at `path` with `fingerprints`.
///
/// Writes to [`temp_path`], fsyncs it and renames it over `path`, so a
/// crash mid-write leaves the previous generation intact.
///
/// # Errors
///
/// `StalenessError::CacheWrite` if any step fails.
pub fn write(path: &Path, fingerprints: &[Fingerprint]) -> Result<()> {
    let to_write_error = |source| StalenessError::CacheWrite {
        path: path.to_path_buf(),
        source,
    };

    let temp_path = temp_path(path);
    let mut file = File::create(&temp_path).map_err(to_write_error)?;
    let staged = file
        .write_all(&encode(fingerprints))
        .and_then(|()| file.sync_all());
    drop(file);

    if let Err(source) = staged.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(to_write_error(source));
    }

    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        // Not every filesystem supports syncing a directory handle
        let _ = dir.sync_all();
    }

    Ok(())
}
