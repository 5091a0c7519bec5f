//! FileStorage - One JSON file per key inside a data directory.

use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use super::BlobStorage;
use crate::error::StorageError;

/// File-backed blob storage.
///
/// Provides:
/// - **Atomicity**: every `set` writes a temp file and renames it over the target,
///   so readers see either the old blob or the new one, never a torn write
/// - **Durability**: the temp file is fsynced before the rename, and the
///   directory after it (on unix)
///
/// Keys made only of `[A-Za-z0-9._-]` map to `<key>.json`. Any other key is
/// rewritten to that alphabet and suffixed with `~<hash of the raw key>`, so
/// two distinct keys never share a file.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a handle rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", file_stem(key)))
    }

    #[cfg(unix)]
    fn sync_dir(&self) {
        if let Err(err) = File::open(&self.dir).and_then(|dir| dir.sync_all()) {
            tracing::warn!(dir = %self.dir.display(), error = %err, "directory fsync failed");
        }
    }

    #[cfg(not(unix))]
    fn sync_dir(&self) {}
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

/// File stem for `key`. Stems never start with `.`, and only rewritten keys
/// contain `~`.
fn file_stem(key: &str) -> String {
    if !key.is_empty() && !key.starts_with('.') && key.chars().all(is_safe) {
        return key.to_string();
    }

    let readable: String = key
        .chars()
        .map(|c| if is_safe(c) { c } else { '_' })
        .collect();
    let readable = match readable.trim_start_matches('.') {
        "" => "_",
        trimmed => trimmed,
    };
    format!("{}~{:016x}", readable, fnv1a(key.as_bytes()))
}

/// 64-bit FNV-1a. Stable across builds, unlike `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

impl BlobStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.path_for(key);
        let tmp_path = self.tmp_path_for(key);

        let written = File::create(&tmp_path)
            .and_then(|mut tmp_file| {
                tmp_file.write_all(value.as_bytes())?;
                tmp_file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(err) = written {
            // The temp file may or may not exist at this point.
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        self.sync_dir();
        tracing::trace!(path = %path.display(), bytes = value.len(), "blob written");
        Ok(())
    }
}
