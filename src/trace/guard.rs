//! Single-Call Guard
//!
//! A decorator letting at most one invocation succeed per gate. The gate is
//! shared: every guard built over the same [`SingleCallGate`] trips it, so a
//! second call to *any* guarded function is a reported no-op, not an error.
//! The composition root owns the gate explicitly; `reset` exists for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::shared::error::AppError;
use crate::trace::proxy::{CallBehavior, CallTarget, CallableProxy};
use crate::trace::value::{CallArgs, Value};

/// Shared "already called" state.
#[derive(Debug, Default)]
pub struct SingleCallGate {
    fired: AtomicBool,
}

impl SingleCallGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the gate; returns `true` only for the first caller.
    pub fn try_fire(&self) -> bool {
        !self.fired.swap(true, Ordering::SeqCst)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Re-arm the gate. Test support only.
    pub fn reset(&self) {
        self.fired.store(false, Ordering::SeqCst);
    }
}

/// Guard behavior over a shared gate.
pub struct SingleCallGuard {
    gate: Arc<SingleCallGate>,
}

impl SingleCallGuard {
    pub fn new(gate: Arc<SingleCallGate>) -> Arc<Self> {
        Arc::new(Self { gate })
    }

    /// Wrap a target so only the first invocation through this gate runs.
    pub fn wrap(self: &Arc<Self>, target: CallTarget) -> Arc<CallableProxy> {
        CallableProxy::wrap(target, Arc::clone(self) as Arc<dyn CallBehavior>)
    }
}

impl CallBehavior for SingleCallGuard {
    fn invoke(&self, proxy: &CallableProxy, args: &CallArgs) -> Result<Value, AppError> {
        if !self.gate.try_fire() {
            tracing::debug!(
                callable = %proxy.qualified_name(),
                "already called, skipping subsequent call"
            );
            return Ok(Value::None);
        }
        tracing::debug!(callable = %proxy.qualified_name(), "called");
        proxy.call_target(args)
    }
}
