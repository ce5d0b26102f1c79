//! Filename-keyed registry of open log files.
//!
//! Entries are opened lazily on the first write for a timed filename and
//! live until the owning writer is dropped, until
//! [`LoggerRegistry::retain_day`] evicts handles from other days, or until a
//! write through them fails.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use daylog_core::LogError;
use tracing::debug;

/// An append-only file bound to one timed filename.
///
/// Entries go straight to the file with no userspace buffer, so a failed
/// write leaves nothing behind to resurface with a later entry.
pub struct FileHandle {
    path: PathBuf,
    day: NaiveDate,
    sink: Box<dyn Write + Send>,
    records: u64,
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("day", &self.day)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl FileHandle {
    /// Open (creating the directory and file as needed) in append mode.
    pub fn open(path: PathBuf, day: NaiveDate) -> Result<Self, LogError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| LogError::write_failure(dir, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError::write_failure(&path, e))?;

        debug!(path = %path.display(), %day, "Opened log file");
        Ok(Self::with_sink(path, day, Box::new(file)))
    }

    fn with_sink(path: PathBuf, day: NaiveDate, sink: Box<dyn Write + Send>) -> Self {
        Self {
            path,
            day,
            sink,
            records: 0,
        }
    }

    /// Write a whole entry so entries hit the file in call order.
    pub fn write_entry(&mut self, entry: &str) -> Result<(), LogError> {
        self.sink
            .write_all(entry.as_bytes())
            .and_then(|_| self.sink.flush())
            .map_err(|e| LogError::write_failure(&self.path, e))?;
        self.records += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Records written through this handle since it was opened.
    pub fn records(&self) -> u64 {
        self.records
    }
}

#[derive(Debug, Default)]
pub struct LoggerRegistry {
    handles: HashMap<String, FileHandle>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `timed_filename`, opening `path` if none exists.
    pub fn get_or_open(
        &mut self,
        timed_filename: &str,
        path: impl FnOnce() -> PathBuf,
        day: NaiveDate,
    ) -> Result<&mut FileHandle, LogError> {
        match self.handles.entry(timed_filename.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let handle = FileHandle::open(path(), day)?;
                Ok(entry.insert(handle))
            }
        }
    }

    /// Write `entry` to the handle for `timed_filename`, opening it first if
    /// needed. A handle whose write fails is dropped, so the next call
    /// reopens the file.
    pub fn write_entry(
        &mut self,
        timed_filename: &str,
        path: impl FnOnce() -> PathBuf,
        day: NaiveDate,
        entry: &str,
    ) -> Result<(), LogError> {
        let handle = self.get_or_open(timed_filename, path, day)?;
        let result = handle.write_entry(entry);
        if result.is_err() {
            self.handles.remove(timed_filename);
            debug!(filename = timed_filename, "Dropped log file handle after failed write");
        }
        result
    }

    pub fn get(&self, timed_filename: &str) -> Option<&FileHandle> {
        self.handles.get(timed_filename)
    }

    pub fn contains(&self, timed_filename: &str) -> bool {
        self.handles.contains_key(timed_filename)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Sorted timed filenames with an open handle.
    pub fn filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop every handle not opened for `day`. Returns how many were closed.
    pub fn retain_day(&mut self, day: NaiveDate) -> usize {
        let before = self.handles.len();
        self.handles.retain(|name, handle| {
            let keep = handle.day == day;
            if !keep {
                debug!(filename = %name, day = %handle.day, "Closing stale log file");
            }
            keep
        });
        before - self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// In-memory sink that rejects the writes whose index is listed in `fail_on`.
    struct FlakySink {
        bytes: Arc<Mutex<Vec<u8>>>,
        fail_on: Vec<usize>,
        calls: usize,
    }

    impl Write for FlakySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on.contains(&call) {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
            }
            self.bytes.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn flaky_handle(fail_on: Vec<usize>) -> (FileHandle, Arc<Mutex<Vec<u8>>>) {
        let bytes = Arc::new(Mutex::new(Vec::new()));
        let sink = FlakySink {
            bytes: Arc::clone(&bytes),
            fail_on,
            calls: 0,
        };
        let handle = FileHandle::with_sink(PathBuf::from("flaky.log"), day(1), Box::new(sink));
        (handle, bytes)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn opens_once_per_filename() {
        let dir = TempDir::new().unwrap();
        let mut registry = LoggerRegistry::new();
        let mut opened = 0;

        for _ in 0..3 {
            let handle = registry
                .get_or_open(
                    "orders-2024-03-01",
                    || {
                        opened += 1;
                        dir.path().join("orders-2024-03-01.log")
                    },
                    day(1),
                )
                .unwrap();
            handle.write_entry("line\n").unwrap();
        }

        assert_eq!(opened, 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("orders-2024-03-01").unwrap().records(), 3);
        let content = fs::read_to_string(dir.path().join("orders-2024-03-01.log")).unwrap();
        assert_eq!(content, "line\nline\nline\n");
    }

    #[test]
    fn creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("x.log");
        let mut handle = FileHandle::open(nested.clone(), day(1)).unwrap();
        handle.write_entry("hello\n").unwrap();
        assert!(nested.exists());
        assert_eq!(handle.path(), nested.as_path());
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut handle = FileHandle::open(path.clone(), day(1)).unwrap();
        handle.write_entry("later\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn open_failure_is_write_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = FileHandle::open(blocker.join("x.log"), day(1)).unwrap_err();
        assert!(matches!(err, LogError::WriteFailure { .. }));
    }

    #[test]
    fn rejected_entry_never_reaches_the_file_later() {
        let (mut handle, bytes) = flaky_handle(vec![1]);
        handle.write_entry("A-first\n").unwrap();
        let err = handle.write_entry(&format!("{}\n", "b".repeat(1500))).unwrap_err();
        assert!(matches!(err, LogError::WriteFailure { .. }));
        handle.write_entry("C-third\n").unwrap();

        let written = String::from_utf8(bytes.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "A-first\nC-third\n");
        assert_eq!(handle.records(), 2);
    }

    #[test]
    fn failed_write_evicts_the_handle() {
        let dir = TempDir::new().unwrap();
        let mut registry = LoggerRegistry::new();
        let (handle, bytes) = flaky_handle(vec![0]);
        registry.handles.insert("orders-01".to_string(), handle);

        let err = registry
            .write_entry("orders-01", || dir.path().join("orders-01.log"), day(1), "lost\n")
            .unwrap_err();
        assert!(matches!(err, LogError::WriteFailure { .. }));
        assert!(!registry.contains("orders-01"));
        assert!(bytes.lock().unwrap().is_empty());

        registry
            .write_entry("orders-01", || dir.path().join("orders-01.log"), day(1), "kept\n")
            .unwrap();
        let content = fs::read_to_string(dir.path().join("orders-01.log")).unwrap();
        assert_eq!(content, "kept\n");
        assert_eq!(registry.get("orders-01").unwrap().records(), 1);
    }

    #[test]
    fn retain_day_evicts_other_days() {
        let dir = TempDir::new().unwrap();
        let mut registry = LoggerRegistry::new();
        for (name, d) in [("a-01", 1), ("b-01", 1), ("a-02", 2)] {
            registry
                .get_or_open(name, || dir.path().join(format!("{name}.log")), day(d))
                .unwrap();
        }

        assert_eq!(registry.retain_day(day(2)), 2);
        assert_eq!(registry.filenames(), vec!["a-02".to_string()]);
        assert!(registry.contains("a-02"));
        assert!(!registry.contains("a-01"));
    }
}
