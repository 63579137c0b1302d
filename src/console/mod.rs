//! Build console output
//!
//! The console is an explicit collaborator passed into each component rather
//! than a process-wide logger: the runner writes tagged progress lines and
//! the interpreter's streamed output into a caller-supplied sink. The
//! annotator colorizes the tagged lines.

mod annotator;

pub use annotator::{annotate, CONSOLE_TAG};

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Line-oriented sink for build console output
///
/// Cloneable so the stdout/stderr pump threads of a running process can
/// share it. Write failures are swallowed: losing a console line must never
/// fail a build step.
#[derive(Clone)]
pub struct ConsoleLogger {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    colored: bool,
}

impl ConsoleLogger {
    /// Creates a logger writing to the given sink
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            colored: true,
        }
    }

    /// Creates a logger writing to the process stdout
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Disables ANSI annotation (for non-terminal sinks)
    #[must_use]
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Writes a plain line, untagged and unannotated
    pub fn log(&self, message: &str) {
        self.write_line(message);
    }

    /// Writes a tagged progress line, annotated when color is enabled
    ///
    /// The tag prefix is what makes the line eligible for annotation, both
    /// here and in any downstream console markup.
    pub fn log_tagged(&self, message: &str) {
        let line = format!("{CONSOLE_TAG} {message}");
        if self.colored {
            self.write_line(&annotate(&line));
        } else {
            self.write_line(&line);
        }
    }

    /// Writes one line of interpreter output, passing it through the
    /// annotator
    pub fn stream(&self, line: &str) {
        if self.colored {
            self.write_line(&annotate(line));
        } else {
            self.write_line(line);
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{line}");
            let _ = sink.flush();
        }
    }
}

impl std::fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("colored", &self.colored)
            .finish_non_exhaustive()
    }
}
