use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory flock on `<store>/.lock`, serializing writes between the
/// TUI and any number of `cn` invocations. Released on drop.
pub struct StoreLock {
    _file: File,
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another canopy process may be writing")]
    Timeout { path: PathBuf },
    #[error("lock error: {0}")]
    IoError(#[from] std::io::Error),
}

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

impl StoreLock {
    /// Acquire the store lock, retrying until `timeout` elapses. Creates
    /// the store directory if it does not exist yet.
    pub fn acquire(store_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        fs::create_dir_all(store_dir).map_err(|e| LockError::CreateError {
            path: store_dir.to_path_buf(),
            source: e,
        })?;
        let path = store_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateError {
                path: path.clone(),
                source: e,
            })?;

        let deadline = Instant::now() + timeout;
        while try_lock(&file).is_err() {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
        Ok(StoreLock { _file: file, path })
    }

    /// Acquire with the default 5 second timeout
    pub fn acquire_default(store_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(store_dir, Duration::from_secs(5))
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // flock releases with the fd; the file itself is just tidied away
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
