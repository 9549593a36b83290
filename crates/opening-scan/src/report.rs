//! The human-readable scan log.
//!
//! This is an explicit sink handed to the scanner, separate from the process
//! wide `tracing` subscriber, so repeated scans in one process never fight
//! over global logger state.

use std::io::{self, Write};

/// Writes to both inner writers. Used to mirror the log file on stdout.
#[derive(Debug)]
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Line-oriented scan log. Write failures are reported through `tracing` and
/// otherwise ignored: losing a log line must not stop a scan.
#[derive(Debug)]
pub struct ScanLog<W: Write> {
    sink: W,
}

impl<W: Write> ScanLog<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        if let Err(e) = writeln!(self.sink, "{}", text.as_ref()) {
            tracing::warn!(error = %e, "Failed to write scan log line");
        }
    }

    pub fn blank(&mut self) {
        self.line("");
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.sink.flush() {
            tracing::warn!(error = %e, "Failed to flush scan log");
        }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writes_both() {
        let mut tee = Tee::new(Vec::new(), Vec::new());
        write!(tee, "hello").unwrap();
        let Tee { first, second } = tee;
        assert_eq!(first, b"hello");
        assert_eq!(second, b"hello");
    }

    #[test]
    fn test_scan_log_lines() {
        let mut log = ScanLog::new(Vec::new());
        log.line("Process PGN = a.pgn");
        log.blank();
        log.line(format!("Summary {}: {}:", 3, 1));

        let text = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(text, "Process PGN = a.pgn\n\nSummary 3: 1:\n");
    }
}
