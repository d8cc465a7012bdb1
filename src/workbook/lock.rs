use crate::error::{Error, ErrorType, IntoResult};
use crate::Result;
use anyhow::Context;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Exclusive access to a workbook, held for the lifetime of the value. The lock is a sibling file
/// created with create-new semantics and removed on drop.
#[derive(Debug)]
pub(crate) struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// # Errors
    /// Returns an `ErrorType::FileAccess` error if another session holds the lock or the lock file
    /// cannot be created.
    pub(crate) fn acquire(workbook: &Path) -> Result<Self> {
        let path = lock_path(workbook);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut f) => {
                if let Err(e) = writeln!(f, "{}", std::process::id()) {
                    warn!("Unable to write the pid to {}: {e}", path.display());
                }
                trace!("Acquired {}", path.display());
                Ok(Self { path })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::new(
                ErrorType::FileAccess,
                anyhow::anyhow!(
                    "The workbook {} is being written by another session. If no other session is \
                    running, delete {} and try again.",
                    workbook.display(),
                    path.display()
                ),
            )),
            Err(e) => Err(e)
                .with_context(|| format!("Unable to create the lock file {}", path.display()))
                .pub_result(ErrorType::FileAccess),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(_) => trace!("Released {}", self.path.display()),
            Err(e) => warn!("Unable to remove the lock file {}: {e}", self.path.display()),
        }
    }
}

/// `/data/Accounts.xlsm` -> `/data/.Accounts.xlsm.lock`
fn lock_path(workbook: &Path) -> PathBuf {
    let name = workbook
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "workbook".to_string());
    workbook.with_file_name(format!(".{name}.lock"))
}
