//! # Chat Bot Library
//!
//! This crate provides a Discord-style chat bot client whose engineered core
//! is a call-tracing/logging facility:
//! - A generic decorating proxy that keeps a wrapped callable usable as a
//!   free function, bound instance method, class-level method, or static
//!   method
//! - A call tracer emitting indented step-in/step-out lines per thread
//! - A thread-scoped log sink manager (one shared file plus one file per
//!   thread)
//! - A single-call guard for process-lifetime initialization
//!
//! The chat platform itself is consumed as a black box behind the `client`
//! interface; handler bodies live in `bot`.
//!
//! ## Module Structure
//!
//! ```text
//! chat_bot/
//! +-- config/    Configuration management
//! +-- trace/     Call-trace core: proxy, tracer, sinks, guard
//! +-- client/    Chat platform boundary (events, gateway)
//! +-- bot/       Handler bodies (greet, echo, typing)
//! +-- shared/    Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Call-trace core
pub mod trace;

// Chat platform boundary
pub mod client;

// Bot handler bodies
pub mod bot;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
