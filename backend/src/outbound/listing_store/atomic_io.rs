//! Atomic whole-file replacement.
//!
//! The document is written to a uniquely named hidden sibling, synced, then
//! renamed over the target. Readers of the target therefore see either the
//! previous contents or the new contents, never a partial write.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors raised by [`write_atomic`].
#[derive(Debug, thiserror::Error)]
pub enum AtomicWriteError {
    /// The target was not a bare file name inside the directory.
    #[error("target {path} must be a file name, not a path")]
    InvalidTarget {
        /// Rejected target path.
        path: Utf8PathBuf,
    },
    /// Writing, syncing or renaming failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// File being written when the failure happened.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

fn io_error(path: &Utf8Path, source: io::Error) -> AtomicWriteError {
    AtomicWriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Replace `file_name` inside `dir` with `contents`.
///
/// The parent directory is synced on a best-effort basis after the rename.
pub fn write_atomic(
    dir: &Dir,
    file_name: &Utf8Path,
    contents: &[u8],
) -> Result<(), AtomicWriteError> {
    let mut components = file_name.components();
    let (Some(Utf8Component::Normal(name)), None) = (components.next(), components.next()) else {
        return Err(AtomicWriteError::InvalidTarget {
            path: file_name.to_path_buf(),
        });
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{name}.tmp.{}.{counter}", std::process::id());

    write_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = dir.rename(&tmp_name, dir, name) {
        if dir.remove_file(&tmp_name).is_err() {
            // Leftover temp files are harmless and carry a unique name.
        }
        return Err(io_error(file_name, err));
    }
    sync_directory(dir);
    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> Result<(), AtomicWriteError> {
    let tmp_path = Utf8Path::new(tmp_name);
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir
        .open_with(tmp_name, &options)
        .map_err(|err| io_error(tmp_path, err))?;

    let written = file.write_all(contents).and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        if dir.remove_file(tmp_name).is_err() {
            // The write already failed; report that instead.
        }
        return Err(io_error(tmp_path, err));
    }
    Ok(())
}

fn sync_directory(dir: &Dir) {
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Not every platform allows syncing a directory handle.
    }
}
