//! Call-Trace Decorator
//!
//! A [`CallBehavior`] that records entry and exit of every invocation:
//! step-in line, inner call, step-out line with the return value, with the
//! calling thread's depth counter raised around the inner call so nested
//! traced calls indent one level deeper.

use std::sync::Arc;

use crate::shared::error::AppError;
use crate::trace::proxy::{CallBehavior, CallTarget, CallableProxy};
use crate::trace::record::CallRecord;
use crate::trace::sink::{LogLevel, SinkManager};
use crate::trace::value::{CallArgs, Value};

/// Tracing decorator over the sink manager.
pub struct CallTracer {
    sinks: Arc<SinkManager>,
}

impl CallTracer {
    pub fn new(sinks: Arc<SinkManager>) -> Self {
        Self { sinks }
    }

    /// Wrap a target so every invocation is traced.
    pub fn wrap(self: &Arc<Self>, target: CallTarget) -> Arc<CallableProxy> {
        CallableProxy::wrap(target, Arc::clone(self) as Arc<dyn CallBehavior>)
    }

    pub fn sinks(&self) -> &Arc<SinkManager> {
        &self.sinks
    }
}

impl CallBehavior for CallTracer {
    fn invoke(&self, proxy: &CallableProxy, args: &CallArgs) -> Result<Value, AppError> {
        self.sinks.ensure_thread_context();
        let record = CallRecord::new(proxy, args, self.sinks.current_depth());

        self.sinks.adjust_depth(1);
        self.sinks.write(&record.step_in(), LogLevel::Debug);

        // Restores the counter on every exit path, including propagated
        // failures and unwinds; disarmed on the normal return path where the
        // decrement happens after the step-out line.
        let mut unwind = DepthRestore {
            sinks: &self.sinks,
            delta: -1,
            armed: true,
        };
        let ret = proxy.call_target(args)?;
        unwind.armed = false;

        self.sinks.write(&record.step_out(&ret), LogLevel::Debug);
        self.sinks.adjust_depth(-1);
        Ok(ret)
    }
}

struct DepthRestore<'a> {
    sinks: &'a SinkManager,
    delta: i64,
    armed: bool,
}

impl Drop for DepthRestore<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.sinks.adjust_depth(self.delta);
        }
    }
}
