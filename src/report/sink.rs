//! Report output that goes to the console and a log file at the same time.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use chrono::Local;

/// Writes everything to both the console and a log file.
///
/// The log file is flushed when the sink is dropped; call [`ReportSink::finish`]
/// to see flush errors.
pub struct ReportSink<W: Write = Stdout> {
    console: W,
    log: BufWriter<File>,
}

impl ReportSink<Stdout> {
    /// Create a sink that writes to stdout and `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::with_console(io::stdout(), path)
    }
}

impl<W: Write> ReportSink<W> {
    /// Create a sink over an arbitrary console writer.
    pub fn with_console<P: AsRef<Path>>(console: W, path: P) -> io::Result<Self> {
        let mut log = BufWriter::new(File::create(path.as_ref())?);
        writeln!(
            log,
            "=== Analysis started at {} ===\n",
            Local::now().format("%Y/%m/%d %H:%M:%S")
        )?;
        tracing::debug!("Writing report log to {}", path.as_ref().display());

        Ok(Self { console, log })
    }

    /// Flush both destinations and close the log file.
    pub fn finish(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W: Write> Write for ReportSink<W> {
    /// The log file is written even when the console fails; the first error
    /// is returned afterwards.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let logged = self.log.write_all(buf);
        let shown = self.console.write_all(buf);
        logged.and(shown)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let logged = self.log.flush();
        let shown = self.console.flush();
        logged.and(shown)
    }
}
