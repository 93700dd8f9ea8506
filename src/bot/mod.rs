//! Bot Layer
//!
//! Handler bodies and their wiring to the trace core.

pub mod handlers;

pub use handlers::{greet, traced_handlers, Bot};
