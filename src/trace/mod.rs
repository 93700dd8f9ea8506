//! Call-Trace Core
//!
//! The engineered subsystem of this crate: a generic decorating proxy for
//! callables, a call tracer emitting indented step-in/step-out lines, a
//! thread-scoped log sink manager, and a single-call guard.

pub mod guard;
pub mod proxy;
pub mod record;
pub mod sink;
pub mod tracer;
pub mod value;

pub use guard::{SingleCallGate, SingleCallGuard};
pub use proxy::{
    AbstractBehavior, BindingKind, CallBehavior, CallTarget, CallableProxy, Receiver, TargetKind,
};
pub use record::CallRecord;
pub use sink::{LogLevel, SinkConfig, SinkManager, SystemThreads, ThreadIdProvider, ThreadKey};
pub use tracer::CallTracer;
pub use value::{CallArgs, Value};
