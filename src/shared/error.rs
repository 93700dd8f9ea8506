//! Application Error Types
//!
//! Centralized error handling for the tracing core and the client boundary.

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A bare proxy was invoked without a concrete call behavior attached.
    /// This is a programming error and is never recovered from.
    #[error("invoke() has no concrete behavior for '{0}'")]
    NotImplemented(String),

    /// A callable that requires a receiver or owner type was invoked
    /// without one (e.g. an instance method called through an unbound proxy).
    #[error("callable '{0}' invoked without required binding")]
    UnboundCall(String),

    /// A wrapped callable reported a failure of its own. The tracer
    /// propagates this unchanged after restoring depth state.
    #[error("wrapped call failed: {0}")]
    WrappedCall(String),

    /// The log directory or a log file could not be created or written.
    /// Fatal when raised from global sink initialization.
    #[error("log sink unavailable: {0}")]
    SinkUnavailable(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("gateway error: {0}")]
    Gateway(String),
}
