//! Common Test Utilities
//!
//! A trace harness writing into a temporary log directory, plus helpers for
//! reading the emitted lines back.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use chat_bot::trace::{CallTracer, LogLevel, SinkConfig, SinkManager};

/// Sink manager + tracer wired to a temporary log directory.
pub struct TraceHarness {
    pub dir: TempDir,
    pub sinks: Arc<SinkManager>,
    pub tracer: Arc<CallTracer>,
}

impl TraceHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp log dir");
        let sinks = Arc::new(SinkManager::new());
        sinks
            .initialize_global(SinkConfig {
                directory: dir.path().to_path_buf(),
                min_level: LogLevel::Trace,
                ..SinkConfig::default()
            })
            .expect("sink init");
        let tracer = Arc::new(CallTracer::new(Arc::clone(&sinks)));
        Self { dir, sinks, tracer }
    }

    /// Raw lines of the shared log file.
    pub fn all_log_lines(&self) -> Vec<String> {
        self.log_lines("debug.all.log")
    }

    /// Raw lines of a named thread's dedicated log file.
    pub fn thread_log_lines(&self, thread_name: &str) -> Vec<String> {
        self.log_lines(&format!("debug.thread.{}.log", thread_name))
    }

    /// The indented message field of each shared-log line, with the
    /// timestamp/thread/level prefix stripped.
    pub fn messages(&self) -> Vec<String> {
        Self::message_fields(&self.all_log_lines())
    }

    /// Strip each line down to its indented message field.
    pub fn message_fields(lines: &[String]) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| line.splitn(3, " | ").nth(2).map(str::to_string))
            .collect()
    }

    fn log_lines(&self, file: &str) -> Vec<String> {
        let path = self.dir.path().join(file);
        let contents = fs::read_to_string(&path).unwrap_or_default();
        contents.lines().map(str::to_string).collect()
    }
}

/// Leading-space count of a message field.
pub fn indent_of(message: &str) -> usize {
    message.len() - message.trim_start().len()
}
