//! Key-to-JSON-blob persistence under the platform data directory.
//!
//! Every record collection lives under one fixed string key and is written
//! as a whole document: read the blob, deserialize, mutate in memory, write
//! the whole collection back. There is no indexing and no cross-key
//! transaction; [`update`] serializes each read-modify-write cycle behind a
//! process-wide lock so two in-flight service calls cannot lose each
//! other's writes.

use dirs_next as dirs;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

const APP_DIR: &str = "fitlog";

static STORE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(APP_DIR))
}

fn blob_path(key: &str) -> Option<PathBuf> {
    data_dir().map(|d| d.join(format!("{key}.json")))
}

fn read_blob<T: DeserializeOwned + Default>(key: &str) -> T {
    let Some(path) = blob_path(key) else {
        return T::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("ignoring unreadable '{key}' blob: {e}");
                T::default()
            }
        },
        // Missing file is the first-run case, not an error.
        Err(_) => T::default(),
    }
}

fn write_blob<T: Serialize>(key: &str, value: &T) -> io::Result<()> {
    let path = blob_path(key)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no data directory"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    std::fs::write(path, data)
}

/// Read the whole blob stored under `key`.
///
/// Returns `T::default()` when the blob is missing or unreadable; a corrupt
/// document is logged and discarded rather than surfaced.
pub fn read<T: DeserializeOwned + Default>(key: &str) -> T {
    let _guard = STORE_LOCK.lock().unwrap();
    read_blob(key)
}

/// Replace the blob stored under `key`.
pub fn write<T: Serialize>(key: &str, value: &T) -> io::Result<()> {
    let _guard = STORE_LOCK.lock().unwrap();
    write_blob(key, value)
}

/// Read-modify-write the blob under `key` as one atomic step with respect
/// to other callers in this process.
pub fn update<T, R>(key: &str, f: impl FnOnce(&mut T) -> R) -> io::Result<R>
where
    T: DeserializeOwned + Serialize + Default,
{
    let _guard = STORE_LOCK.lock().unwrap();
    let mut value: T = read_blob(key);
    let out = f(&mut value);
    write_blob(key, &value)?;
    Ok(out)
}

/// Delete the blob under `key`. Deleting an absent blob is not an error.
pub fn clear(key: &str) -> io::Result<()> {
    let _guard = STORE_LOCK.lock().unwrap();
    let Some(path) = blob_path(key) else {
        return Ok(());
    };
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use std::ffi::OsString;
    use std::path::Path;
    use tempfile::TempDir;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    /// Points the XDG data and config directories at a temp dir for the
    /// guard's lifetime, restoring the previous values on drop. Tests that
    /// touch persisted state must hold one of these.
    pub(crate) struct StoreGuard {
        _env: std::sync::MutexGuard<'static, ()>,
        dir: TempDir,
        prev_data: Option<OsString>,
        prev_config: Option<OsString>,
    }

    impl StoreGuard {
        pub(crate) fn path(&self) -> &Path {
            self.dir.path()
        }
    }

    impl Drop for StoreGuard {
        fn drop(&mut self) {
            unsafe {
                match &self.prev_data {
                    Some(v) => std::env::set_var("XDG_DATA_HOME", v),
                    None => std::env::remove_var("XDG_DATA_HOME"),
                }
                match &self.prev_config {
                    Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
                    None => std::env::remove_var("XDG_CONFIG_HOME"),
                }
            }
        }
    }

    pub(crate) fn temp_store() -> StoreGuard {
        let env = ENV_MUTEX.lock().unwrap();
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let prev_data = std::env::var_os("XDG_DATA_HOME");
        let prev_config = std::env::var_os("XDG_CONFIG_HOME");
        unsafe {
            std::env::set_var("XDG_DATA_HOME", dir.path());
            std::env::set_var("XDG_CONFIG_HOME", dir.path());
        }
        StoreGuard {
            _env: env,
            dir,
            prev_data,
            prev_config,
        }
    }
}
