//! Call-Trace Integration Tests

mod bot_tests;
mod tracing_tests;
