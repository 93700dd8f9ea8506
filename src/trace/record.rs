//! Call Records
//!
//! Ephemeral per-invocation record: a rendered call signature created at
//! entry, consumed for the exit line, and discarded when the call completes.

use crate::trace::proxy::{BindingKind, CallableProxy};
use crate::trace::value::{CallArgs, Value};

/// One traced invocation's display data.
pub struct CallRecord {
    qualified_name: String,
    rendered_args: String,
    depth_at_entry: i64,
}

impl CallRecord {
    /// Capture the proxy's binding context and the supplied arguments.
    /// Rendering keeps full content; the sink truncates at write time.
    pub fn new(proxy: &CallableProxy, args: &CallArgs, depth_at_entry: i64) -> Self {
        let mut segments = Vec::new();
        if proxy.binding_kind() == BindingKind::InstanceBound {
            if let Some(receiver) = proxy.bound_receiver() {
                segments.push(format!("self={}", receiver.render()));
            }
        }
        segments.extend(args.render_segments());

        Self {
            qualified_name: proxy.qualified_name(),
            rendered_args: segments.join(", "),
            depth_at_entry,
        }
    }

    fn call_display(&self, include_args: bool) -> String {
        let args = if include_args { &self.rendered_args } else { "" };
        format!("{}({})", self.qualified_name, args)
    }

    /// Entry line: `-> Name(args)`.
    pub fn step_in(&self) -> String {
        format!("-> {}", self.call_display(true))
    }

    /// Exit line: `<- Name() ==> result`. Arguments are omitted on exit.
    pub fn step_out(&self, ret: &Value) -> String {
        format!("<- {} ==> {}", self.call_display(false), ret)
    }

    pub fn depth_at_entry(&self) -> i64 {
        self.depth_at_entry
    }
}
