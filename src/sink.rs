//! Where diagnostics go. The planner never prints on its own; every progress
//! line and reported error goes through a [`Sink`] handed to it by the caller.

use std::cell::RefCell;
use std::io::Write;

pub trait Sink {
    /// Progress output, only produced when the configuration is verbose.
    fn progress(&self, message: &str);
    /// Reported problems. Always produced.
    fn error(&self, message: &str);
}

/// Forwards to `tracing` under the `strips_planner` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn progress(&self, message: &str) {
        tracing::info!(target: "strips_planner", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "strips_planner", "{}", message);
    }
}

/// Writes one line per message, errors prefixed with `ERROR: `.
pub struct WriterSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer: RefCell::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn line(&self, message: &str) {
        // A sink that cannot write has nowhere to report that.
        if writeln!(self.writer.borrow_mut(), "{}", message).is_err() {
            tracing::warn!(target: "strips_planner", "diagnostics writer failed");
        }
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn progress(&self, message: &str) {
        self.line(message)
    }

    fn error(&self, message: &str) {
        self.line(&format!("ERROR: {}", message))
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|l| l.strip_prefix("ERROR: ").map(str::to_owned))
            .collect()
    }
}

impl Sink for MemorySink {
    fn progress(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_owned())
    }

    fn error(&self, message: &str) {
        self.lines.borrow_mut().push(format!("ERROR: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Seek, SeekFrom};

    use super::{MemorySink, Sink, WriterSink};

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        sink.progress("Depth: 0, 3 child states.");
        sink.error("No parameter values found in domain values");
        assert_eq!(sink.lines().len(), 2);
        assert_eq!(sink.errors(), vec!["No parameter values found in domain values".to_owned()]);
    }

    #[test]
    fn test_writer_sink_to_file() {
        let file = tempfile::tempfile().expect("Unable to create temporary file");
        let sink = WriterSink::new(file);
        sink.progress("Using A*.");
        sink.error("bad type");
        let mut file = sink.into_inner();
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut written = String::new();
        file.read_to_string(&mut written).unwrap();
        assert_eq!(written, "Using A*.\nERROR: bad type\n");
    }
}
