//! Thread-Scoped Log Sink Manager
//!
//! Registry mapping each active thread to its own call-depth counter and its
//! own log file, plus one shared global file. Thread contexts are created
//! lazily on first use; the shared state is set up once by
//! [`SinkManager::initialize_global`] (guarded at the composition root) and
//! torn down explicitly.
//!
//! Concurrency model: each thread only ever touches its own depth counter and
//! its own sink, so the hot path takes no exclusive lock; the registry itself
//! is a [`DashMap`] (insert-only growth, lock-free steady-state reads) and
//! only the shared global file serializes writes.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use crate::shared::error::AppError;

/// Log severity for trace lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Parse a settings string; unknown values fall back to `Debug`.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Stable identity of a logging thread.
pub type ThreadKey = u64;

/// Source of the calling thread's identity. Injected so depth bookkeeping is
/// testable without spinning real threads.
pub trait ThreadIdProvider: Send + Sync {
    fn current(&self) -> ThreadKey;
    fn name(&self) -> String;
}

static NEXT_THREAD_KEY: AtomicU64 = AtomicU64::new(1);

/// Default provider: assigns each OS thread a stable key on first use and
/// reports the thread's configured name.
pub struct SystemThreads;

impl ThreadIdProvider for SystemThreads {
    fn current(&self) -> ThreadKey {
        thread_local! {
            static KEY: u64 = NEXT_THREAD_KEY.fetch_add(1, Ordering::Relaxed);
        }
        KEY.with(|key| *key)
    }

    fn name(&self) -> String {
        std::thread::current()
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("thread-{}", self.current()))
    }
}

/// Configuration consumed by [`SinkManager::initialize_global`].
#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub directory: PathBuf,
    pub min_level: LogLevel,
    /// Line cap for file sinks.
    pub file_line_limit: usize,
    /// Line cap for the optional console echo.
    pub console_line_limit: usize,
    /// Spaces per call-depth level.
    pub indent_width: usize,
    /// Echo every accepted line to stdout.
    pub echo_console: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("log"),
            min_level: LogLevel::Debug,
            file_line_limit: 1024,
            console_line_limit: 120,
            indent_width: 3,
            echo_console: false,
        }
    }
}

/// Shared file name inside the log directory.
const GLOBAL_LOG_FILE: &str = "debug.all.log";

/// Indent width used before global initialization.
const DEFAULT_INDENT_WIDTH: usize = 3;

/// Per-thread logging state: a depth counter only its own thread adjusts,
/// and an optional dedicated sink (absent when the thread started before
/// global initialization or its file could not be opened).
struct ThreadLogContext {
    name: String,
    depth: AtomicI64,
    sink: Option<Mutex<fs::File>>,
}

/// Process-wide shared sink state, created once and torn down explicitly.
struct GlobalLogState {
    directory: PathBuf,
    min_level: LogLevel,
    file_line_limit: usize,
    console_line_limit: usize,
    indent_width: usize,
    echo_console: bool,
    all_sink: Mutex<fs::File>,
}

/// Registry of thread contexts plus the shared global sink.
pub struct SinkManager {
    threads: DashMap<ThreadKey, ThreadLogContext>,
    global: RwLock<Option<GlobalLogState>>,
    ids: Arc<dyn ThreadIdProvider>,
}

impl SinkManager {
    pub fn new() -> Self {
        Self::with_provider(Arc::new(SystemThreads))
    }

    pub fn with_provider(ids: Arc<dyn ThreadIdProvider>) -> Self {
        Self {
            threads: DashMap::new(),
            global: RwLock::new(None),
            ids,
        }
    }

    /// Open the shared sink and record the configured thresholds.
    ///
    /// Clears any `*.log` files left in the log directory by a previous run.
    /// Callers guard this with the single-call decorator; calling it directly
    /// a second time reinitializes the shared state.
    pub fn initialize_global(&self, config: SinkConfig) -> Result<(), AppError> {
        if config.directory.exists() {
            clear_log_files(&config.directory)?;
        } else {
            fs::create_dir_all(&config.directory)?;
        }

        let all_sink = fs::File::create(config.directory.join(GLOBAL_LOG_FILE))?;
        *self.global.write() = Some(GlobalLogState {
            directory: config.directory,
            min_level: config.min_level,
            file_line_limit: config.file_line_limit,
            console_line_limit: config.console_line_limit,
            indent_width: config.indent_width,
            echo_console: config.echo_console,
            all_sink: Mutex::new(all_sink),
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.global.read().is_some()
    }

    /// Close the shared sink. Exists for symmetry and tests; per-thread
    /// contexts are torn down separately.
    pub fn teardown_global(&self) {
        *self.global.write() = None;
    }

    /// The calling thread's key, as reported by the identity provider.
    pub fn current_thread(&self) -> ThreadKey {
        self.ids.current()
    }

    /// Ensure the calling thread has a context, creating its depth counter
    /// and dedicated sink on first use. Returns the thread's key.
    pub fn ensure_thread_context(&self) -> ThreadKey {
        let key = self.ids.current();
        self.with_context(|_| {});
        key
    }

    /// Adjust the calling thread's depth counter; returns the new depth.
    pub fn adjust_depth(&self, delta: i64) -> i64 {
        self.with_context(|ctx| ctx.depth.fetch_add(delta, Ordering::Relaxed) + delta)
    }

    pub fn current_depth(&self) -> i64 {
        self.with_context(|ctx| ctx.depth.load(Ordering::Relaxed))
    }

    /// Indentation string for the calling thread's current depth.
    pub fn current_indent(&self) -> String {
        let width = self
            .global
            .read()
            .as_ref()
            .map(|state| state.indent_width)
            .unwrap_or(DEFAULT_INDENT_WIDTH);
        let depth = self.current_depth().max(0) as usize;
        " ".repeat(width * depth)
    }

    /// Write one record through the shared sink and, when present, the
    /// calling thread's dedicated sink. Each line is flushed immediately so
    /// interleaved multi-thread output stays line-atomic. Records below the
    /// configured severity are dropped; messages are truncated to each sink's
    /// line cap at write time.
    pub fn write(&self, message: &str, level: LogLevel) {
        self.with_context(|ctx| {
            let global = self.global.read();
            let Some(state) = global.as_ref() else {
                return;
            };
            if level < state.min_level {
                return;
            }

            let depth = ctx.depth.load(Ordering::Relaxed).max(0) as usize;
            let indent = " ".repeat(state.indent_width * depth);
            let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let body = truncate_line(message, state.file_line_limit);
            let line = format!(
                "[{}] {:<11} | {:<7} | {}{}",
                stamp, ctx.name, level, indent, body
            );

            {
                let mut sink = state.all_sink.lock();
                let _ = writeln!(sink, "{}", line);
                let _ = sink.flush();
            }
            if let Some(sink) = &ctx.sink {
                let mut sink = sink.lock();
                let _ = writeln!(sink, "{}", line);
                let _ = sink.flush();
            }
            if state.echo_console {
                println!("{}", truncate_line(&line, state.console_line_limit));
            }
        });
    }

    /// Close and forget a thread's context. The next logging call from that
    /// thread starts over with a fresh counter and sink.
    pub fn teardown_thread(&self, key: ThreadKey) {
        self.threads.remove(&key);
    }

    /// Number of live thread contexts.
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    fn with_context<R>(&self, f: impl FnOnce(&ThreadLogContext) -> R) -> R {
        let key = self.ids.current();
        if let Some(ctx) = self.threads.get(&key) {
            return f(&ctx);
        }
        let ctx = self.create_context();
        let entry = self.threads.entry(key).or_insert(ctx);
        f(&entry)
    }

    fn create_context(&self) -> ThreadLogContext {
        let name = self.ids.name();
        let sink = self.open_thread_sink(&name);
        ThreadLogContext {
            name,
            depth: AtomicI64::new(0),
            sink,
        }
    }

    /// Open the thread's dedicated file. A failure here must not take down
    /// the thread's business logic: it is reported and the thread falls back
    /// to the shared sink only.
    fn open_thread_sink(&self, name: &str) -> Option<Mutex<fs::File>> {
        let global = self.global.read();
        let state = global.as_ref()?;
        let path = state.directory.join(format!("debug.thread.{}.log", name));
        match fs::File::create(&path) {
            Ok(file) => Some(Mutex::new(file)),
            Err(e) => {
                tracing::warn!(
                    thread = %name,
                    path = %path.display(),
                    error = %e,
                    "per-thread log sink unavailable, falling back to shared sink"
                );
                None
            }
        }
    }
}

impl Default for SinkManager {
    fn default() -> Self {
        Self::new()
    }
}

fn clear_log_files(directory: &Path) -> Result<(), AppError> {
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "log") {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Truncate to `cap` bytes without splitting a character.
fn truncate_line(message: &str, cap: usize) -> &str {
    if message.len() <= cap {
        return message;
    }
    let mut end = cap;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}
