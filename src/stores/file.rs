//! File-backed persistence store

use crate::core::{LoggerError, PersistenceStore, Result};
#[cfg(feature = "file")]
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// One `<key>.json` file per key inside a directory
///
/// Files are locked while read or written when the `file` feature is enabled.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`, created if missing
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            return Err(LoggerError::config(
                "FileStore",
                format!("{} is not a directory", dir.display()),
            ));
        }
        fs::create_dir_all(&dir).map_err(|e| {
            LoggerError::io_operation("create store directory", dir.display().to_string(), e)
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(|c: char| c == '/' || c == '\\' || c == '\0');
        if invalid {
            return Err(LoggerError::persistence(key, "key is not a valid file name"));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[cfg(feature = "file")]
fn lock_shared(file: &File) -> std::io::Result<()> {
    file.lock_shared()
}

#[cfg(feature = "file")]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    file.lock_exclusive()
}

#[cfg(not(feature = "file"))]
fn lock_shared(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(not(feature = "file"))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

impl PersistenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoggerError::io_operation("open", path.display().to_string(), e)),
        };

        lock_shared(&file)
            .map_err(|e| LoggerError::io_operation("lock", path.display().to_string(), e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| LoggerError::io_operation("read", path.display().to_string(), e))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("open", path.display().to_string(), e))?;

        lock_exclusive(&file)
            .map_err(|e| LoggerError::io_operation("lock", path.display().to_string(), e))?;
        file.set_len(0)?;
        file.write_all(value.as_bytes())
            .map_err(|e| LoggerError::io_operation("write", path.display().to_string(), e))?;
        file.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LoggerError::io_operation("remove", path.display().to_string(), e)),
        }
    }
}
