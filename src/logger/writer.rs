//! Shared file writer for the logger

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Log file writer shared by every event
#[derive(Clone)]
pub struct FileWriter {
    file: Arc<Mutex<BufWriter<File>>>,
}

impl FileWriter {
    /// Opens the log file, creating parent directories as needed.
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterGuard {
            file: self.file.clone(),
        }
    }
}

/// Per-event handle onto the shared file
pub struct FileWriterGuard {
    file: Arc<Mutex<BufWriter<File>>>,
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;
        file.flush()
    }
}

impl Drop for FileWriterGuard {
    fn drop(&mut self) {
        // Each event is complete once its guard drops
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::LogFormat;
    use tempfile::TempDir;

    fn file_config(path: &Path, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path: path.to_path_buf(),
            append,
            format: LogFormat::Json,
        }
    }

    fn write_line(writer: &FileWriter, line: &str) {
        let mut guard = writer.make_writer();
        guard.write_all(line.as_bytes()).unwrap();
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/lookout.log");

        let writer = FileWriter::new(&file_config(&path, true)).unwrap();
        write_line(&writer, "hello\n");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lookout.log");
        std::fs::write(&path, "old\n").unwrap();

        let writer = FileWriter::new(&file_config(&path, true)).unwrap();
        write_line(&writer, "new\n");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_truncate_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lookout.log");
        std::fs::write(&path, "old\n").unwrap();

        let writer = FileWriter::new(&file_config(&path, false)).unwrap();
        write_line(&writer, "new\n");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_clones_share_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lookout.log");

        let writer = FileWriter::new(&file_config(&path, true)).unwrap();
        let other = writer.clone();
        write_line(&writer, "a\n");
        write_line(&other, "b\n");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
