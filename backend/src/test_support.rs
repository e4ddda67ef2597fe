//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and behind the `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! Tests touch files through `cap_std::fs::Dir` like the store does, so
    //! both sides see the same paths and errors.

    use std::io;

    use camino::Utf8Path;
    use cap_std::{ambient_authority, fs::Dir};

    fn parent_and_name(path: &Utf8Path) -> io::Result<(&Utf8Path, &str)> {
        let name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        Ok((parent, name))
    }

    /// Read a file's raw bytes.
    pub fn read_bytes(path: &Utf8Path) -> io::Result<Vec<u8>> {
        let (parent, name) = parent_and_name(path)?;
        Dir::open_ambient_dir(parent, ambient_authority())?.read(name)
    }

    /// Write `contents` to `path`, creating the parent directory.
    ///
    /// ```rust
    /// use bazaar_backend::test_support::cap_fs::{read_bytes, write_file};
    /// use camino::Utf8PathBuf;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = Utf8PathBuf::from_path_buf(dir.path().join("seed.json")).expect("utf8");
    /// write_file(&path, b"{}")?;
    /// assert_eq!(read_bytes(&path)?, b"{}");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        let (parent, name) = parent_and_name(path)?;
        Dir::create_ambient_dir_all(parent, ambient_authority())?;
        Dir::open_ambient_dir(parent, ambient_authority())?.write(name, contents)
    }
}

pub mod clock {
    //! Deterministic clocks.

    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use mockable::Clock;

    /// Clock that advances by a fixed step every time it is read.
    ///
    /// Listings created one after another therefore get strictly increasing
    /// timestamps, which keeps newest-first ordering deterministic.
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }

        /// One-minute steps from 2026-01-01T00:00:00Z.
        pub fn per_minute() -> Self {
            let start = Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default();
            Self::new(start, Duration::minutes(1))
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }
}

pub mod store {
    //! Listing stores rooted in temporary directories.

    use camino::{Utf8Path, Utf8PathBuf};
    use tempfile::TempDir;

    use crate::domain::ports::ListingRepositoryError;
    use crate::outbound::listing_store::JsonListingStore;

    /// Temporary directory holding a `listings.json` path.
    ///
    /// The directory is deleted when the value is dropped.
    pub struct TempStorePath {
        _dir: TempDir,
        path: Utf8PathBuf,
    }

    impl TempStorePath {
        /// Create a fresh directory; the document itself does not exist yet.
        pub fn new() -> std::io::Result<Self> {
            let dir = TempDir::new()?;
            let path = Utf8PathBuf::from_path_buf(dir.path().join("listings.json"))
                .map_err(|path| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("non UTF-8 temp path {}", path.display()),
                    )
                })?;
            Ok(Self { _dir: dir, path })
        }

        pub fn path(&self) -> &Utf8Path {
            &self.path
        }

        /// Open (or reopen) the JSON store at this path.
        pub fn open(&self) -> Result<JsonListingStore, ListingRepositoryError> {
            JsonListingStore::open(&self.path)
        }
    }
}
