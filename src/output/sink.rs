//! Append-only line sinks
//!
//! Every `append` completes its write before returning, so the order of lines
//! in the sink is exactly the order of calls.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// An ordered, append-only destination for history lines
pub trait AggregationSink {
    /// Appends one line; the newline terminator is added by the sink
    fn append(&mut self, line: &str) -> io::Result<()>;
}

/// In-memory sink, one entry per appended line
impl AggregationSink for Vec<String> {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// File-backed sink
///
/// The file handle is unbuffered: each line goes to the OS in a single
/// `write_all` before `append` returns.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Truncates or creates `path` and writes the header line
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file
    /// * `header` - First line of the file
    ///
    /// # Returns
    ///
    /// * `Ok(FileSink)` - Sink positioned after the header
    /// * `Err(io::Error)` - The file could not be created or written
    pub fn create(path: &Path, header: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut sink = Self {
            file,
            path: path.to_path_buf(),
        };
        sink.append(header)?;
        tracing::debug!("Initialized output file {}", path.display());
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AggregationSink for FileSink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.file.write_all(record.as_bytes())?;
        self.file.flush()
    }
}
