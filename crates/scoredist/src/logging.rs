//! File logging under the data directory.
//!
//! The terminal belongs to the UI, so every event goes to
//! `{data_dir}/scoredist.log`. The file is trimmed on startup once it grows
//! past [`LogRotation::max_bytes`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "scoredist.log";
const ROTATION_MARKER: &[u8] = b"--- log rotated, older entries removed ---\n";

/// Size-based trimming of the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRotation {
    pub max_bytes: u64,
    /// Newest bytes kept after a trim, cut forward to a line start.
    pub keep_bytes: u64,
}

impl Default for LogRotation {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            keep_bytes: 1024 * 1024,
        }
    }
}

impl LogRotation {
    /// Trim `path` if it is over the limit. Returns the size before trimming
    /// when a trim happened.
    pub fn apply(&self, path: &Path) -> io::Result<Option<u64>> {
        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if size <= self.max_bytes {
            return Ok(None);
        }

        let tail = read_tail(path, size.saturating_sub(self.keep_bytes))?;
        let from_line = tail.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);

        let mut file = File::create(path)?;
        file.write_all(ROTATION_MARKER)?;
        file.write_all(&tail[from_line..])?;
        Ok(Some(size))
    }
}

fn read_tail(path: &Path, offset: u64) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut tail = Vec::new();
    file.read_to_end(&mut tail)?;
    Ok(tail)
}

/// One append-mode file shared by every writer the fmt layer asks for.
#[derive(Clone)]
struct LogSink(Arc<Mutex<File>>);

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A poisoned lock only means another writer panicked mid-line.
        self.0.lock().unwrap_or_else(|p| p.into_inner()).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Filter used when `RUST_LOG` is unset: the front end at `level`, the
/// engine at warn so per-frame layout passes stay out of the file.
pub fn default_filter(level: &str) -> String {
    format!("scoredist={level},scoredist_core=warn")
}

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

/// Install the global subscriber writing to `{data_dir}/scoredist.log`.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = log_path(data_dir);

    let rotated = LogRotation::default().apply(&path).unwrap_or_else(|e| {
        eprintln!("Warning: failed to rotate {}: {e}", path.display());
        None
    });

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let sink = LogSink(Arc::new(Mutex::new(file)));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(sink).with_ansi(false).with_target(true))
        .init();

    tracing::info!(log_path = %path.display(), rotated_from_bytes = ?rotated, "scoredist logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> LogRotation {
        LogRotation {
            max_bytes: 1_000,
            keep_bytes: 250,
        }
    }

    #[test]
    fn test_missing_log_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(small().apply(&log_path(dir.path())).unwrap(), None);
    }

    #[test]
    fn test_small_log_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_path(dir.path());
        fs::write(&path, "one\ntwo\n").unwrap();
        assert_eq!(small().apply(&path).unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_large_log_trimmed_to_line_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_path(dir.path());
        let line = "x".repeat(19) + "\n";
        fs::write(&path, line.repeat(60)).unwrap();

        assert_eq!(small().apply(&path).unwrap(), Some(1_200));
        let rotated = fs::read_to_string(&path).unwrap();
        assert!(rotated.starts_with("--- log rotated"));
        assert!(rotated.len() <= 250 + ROTATION_MARKER.len());
        assert!(rotated.lines().skip(1).all(|l| l.len() == 19));
    }

    #[test]
    fn test_default_rotation_limits() {
        let rotation = LogRotation::default();
        assert_eq!(rotation.max_bytes, 5 * 1024 * 1024);
        assert_eq!(rotation.keep_bytes, 1024 * 1024);
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter("debug"), "scoredist=debug,scoredist_core=warn");
    }
}
