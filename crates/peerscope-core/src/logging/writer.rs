//! Append-only JSONL writer for one session

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::entry::LogEntry;

/// Appends entries to `<logs_dir>/raw/<date>_<session>.jsonl`.
pub struct SessionLogWriter {
    session: String,
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl SessionLogWriter {
    /// Open (or create) today's file for `session`.
    pub fn new(logs_dir: impl AsRef<Path>, session: impl Into<String>) -> io::Result<Self> {
        let session = session.into();
        let raw_dir = logs_dir.as_ref().join("raw");
        fs::create_dir_all(&raw_dir)?;

        let date = chrono::Local::now().format("%Y-%m-%d");
        let path = raw_dir.join(format!("{}_{}.jsonl", date, session));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            session,
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush, so an export sees everything logged so far.
    pub fn write(&self, entry: &LogEntry) -> io::Result<()> {
        let line = entry
            .to_json_line()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        writer.flush()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

impl Drop for SessionLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Parse a JSONL log file, skipping blank and malformed lines.
pub fn read_entries(path: impl AsRef<Path>) -> io::Result<Vec<LogEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match LogEntry::from_json_line(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "Skipping malformed log line"),
        }
    }
    Ok(entries)
}

/// Copy a log file to `dest`, returning the bytes written.
///
/// A missing source yields 0 bytes and no file.
pub fn copy_log(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<u64> {
    let source = source.as_ref();
    if !source.exists() {
        return Ok(0);
    }
    fs::copy(source, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writer_creates_dated_file() {
        let temp = TempDir::new().unwrap();
        let writer = SessionLogWriter::new(temp.path().join("logs"), "desktop").unwrap();

        assert!(temp.path().join("logs").join("raw").is_dir());
        assert!(writer.path().exists());
        assert!(writer.path().to_string_lossy().ends_with("_desktop.jsonl"));
        assert_eq!(writer.session(), "desktop");
    }

    #[test]
    fn test_entries_read_back_in_order() {
        let temp = TempDir::new().unwrap();
        let writer = SessionLogWriter::new(temp.path(), "s1").unwrap();
        writer.write(&LogEntry::new("info", "s1", "t", "first")).unwrap();
        writer.write(&LogEntry::new("warn", "s1", "t", "second")).unwrap();

        let mut raw = fs::OpenOptions::new().append(true).open(writer.path()).unwrap();
        writeln!(raw, "not json").unwrap();

        let entries = read_entries(writer.path()).unwrap();
        let msgs: Vec<_> = entries.iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(msgs, vec!["first", "second"]);
    }

    #[test]
    fn test_copy_missing_log_is_zero_bytes() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.json");
        assert_eq!(copy_log(temp.path().join("absent.jsonl"), &dest).unwrap(), 0);
        assert!(!dest.exists());
    }
}
