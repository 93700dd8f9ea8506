//! Decorating Proxy
//!
//! A generic wrapper around an arbitrary callable. The proxy intercepts
//! invocations through an attached [`CallBehavior`] and re-binds itself when
//! resolved against an instance or owner type, mirroring method-binding
//! semantics: the same wrapped target can act as a free function, a bound
//! instance method, a class-level method, or a static method.
//!
//! Attribute lookups other than the proxy's own control fields are forwarded
//! to the wrapped target, so generic code inspecting a decorated callable
//! (name, documentation, repr) sees the callable itself.

use std::sync::{Arc, Weak};

use crate::shared::error::AppError;
use crate::trace::value::{CallArgs, Value};

/// How a proxy is attached to an object graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Unbound,
    InstanceBound,
    ClassBound,
    Static,
}

/// Classification of the underlying callable, used by binding resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A free function; binds instance-style when resolved through a receiver.
    Plain,
    /// An instance method, dispatched by name through the bound [`Receiver`].
    Method,
    /// A static method; binding resolution never attaches a receiver.
    Static,
    /// A class-level method; receives the owner type name instead of a receiver.
    ClassLevel,
}

/// The instance side of binding. A receiver exposes its type name, a display
/// rendering for trace lines, and named-method dispatch for bound calls.
pub trait Receiver: Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Rendering used for the `self=...` segment of a trace line.
    fn render(&self) -> String;

    fn call_method(&self, name: &str, args: &CallArgs) -> Result<Value, AppError>;
}

type TargetFn = Arc<dyn Fn(&CallArgs) -> Result<Value, AppError> + Send + Sync>;
type ClassFn = Arc<dyn Fn(&'static str, &CallArgs) -> Result<Value, AppError> + Send + Sync>;

#[derive(Clone)]
enum TargetBody {
    /// Free function or static method body.
    Function(TargetFn),
    /// Class-level body; first argument is the resolved owner type name.
    ClassLevel(ClassFn),
    /// No body of its own; dispatched through the bound receiver by name.
    Method,
}

/// A named callable the proxy wraps. The proxy exclusively owns its target
/// for the proxy's lifetime.
#[derive(Clone)]
pub struct CallTarget {
    name: &'static str,
    doc: Option<&'static str>,
    kind: TargetKind,
    body: TargetBody,
}

impl CallTarget {
    /// A free function.
    pub fn function<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<Value, AppError> + Send + Sync + 'static,
    {
        Self {
            name,
            doc: None,
            kind: TargetKind::Plain,
            body: TargetBody::Function(Arc::new(body)),
        }
    }

    /// An instance method, dispatched through the bound receiver by name.
    pub fn method(name: &'static str) -> Self {
        Self {
            name,
            doc: None,
            kind: TargetKind::Method,
            body: TargetBody::Method,
        }
    }

    /// A static method: callable through a binding, but the receiver is ignored.
    pub fn static_method<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<Value, AppError> + Send + Sync + 'static,
    {
        Self {
            name,
            doc: None,
            kind: TargetKind::Static,
            body: TargetBody::Function(Arc::new(body)),
        }
    }

    /// A class-level method: receives the resolved owner type name.
    pub fn class_method<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&'static str, &CallArgs) -> Result<Value, AppError> + Send + Sync + 'static,
    {
        Self {
            name,
            doc: None,
            kind: TargetKind::ClassLevel,
            body: TargetBody::ClassLevel(Arc::new(body)),
        }
    }

    pub fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

/// Per-invocation hook attached to a proxy. This is the extension seam:
/// concrete decorators (call tracer, single-call guard) implement it and
/// delegate to [`CallableProxy::call_target`] for the real call.
pub trait CallBehavior: Send + Sync {
    fn invoke(&self, proxy: &CallableProxy, args: &CallArgs) -> Result<Value, AppError>;
}

/// The base behavior: invoking it directly is a programming error.
pub struct AbstractBehavior;

impl CallBehavior for AbstractBehavior {
    fn invoke(&self, proxy: &CallableProxy, _args: &CallArgs) -> Result<Value, AppError> {
        Err(AppError::NotImplemented(proxy.qualified_name()))
    }
}

/// Control fields answered by the proxy itself; every other attribute lookup
/// forwards to the wrapped target. [`CallableProxy::attribute`] consults this
/// list, so extending it requires a matching arm in `control_field`.
pub const CONTROL_FIELDS: &[&str] = &[
    "target_callable",
    "bound_instance",
    "owner_type",
    "binding_kind",
];

/// Generic decorating proxy around a [`CallTarget`].
pub struct CallableProxy {
    target: CallTarget,
    bound_instance: Option<Weak<dyn Receiver>>,
    owner_type: Option<&'static str>,
    binding_kind: BindingKind,
    behavior: Arc<dyn CallBehavior>,
}

impl CallableProxy {
    /// Wrap a target with a call behavior. The result is unbound: no
    /// receiver, no owner type.
    pub fn wrap(target: CallTarget, behavior: Arc<dyn CallBehavior>) -> Arc<Self> {
        Arc::new(Self {
            target,
            bound_instance: None,
            owner_type: None,
            binding_kind: BindingKind::Unbound,
            behavior,
        })
    }

    /// Resolve this proxy against an `(instance, owner_type)` pair.
    ///
    /// Re-binding is idempotent: resolving against the pair the proxy is
    /// already bound to returns the same proxy (pointer identity), so callers
    /// must not assume a fresh object. Otherwise the underlying target is
    /// classified and a new bound proxy is returned, sharing the target and
    /// behavior with this one.
    pub fn resolve_binding(
        self: &Arc<Self>,
        instance: Option<&Arc<dyn Receiver>>,
        owner_type: &'static str,
    ) -> Arc<Self> {
        let same_instance = match (&self.bound_instance, instance) {
            (None, None) => true,
            (Some(held), Some(incoming)) => held
                .upgrade()
                .map(|held| Arc::ptr_eq(&held, incoming))
                .unwrap_or(false),
            _ => false,
        };
        if same_instance && self.owner_type == Some(owner_type) {
            return Arc::clone(self);
        }

        let binding_kind = match self.target.kind() {
            TargetKind::Static => BindingKind::Static,
            TargetKind::ClassLevel => BindingKind::ClassBound,
            TargetKind::Plain | TargetKind::Method => BindingKind::InstanceBound,
        };

        Arc::new(Self {
            target: self.target.clone(),
            bound_instance: instance.map(Arc::downgrade),
            owner_type: Some(owner_type),
            binding_kind,
            behavior: Arc::clone(&self.behavior),
        })
    }

    /// Invoke through the attached behavior.
    pub fn invoke(&self, args: &CallArgs) -> Result<Value, AppError> {
        self.behavior.invoke(self, args)
    }

    /// Call the underlying target directly, honoring the current binding.
    /// Behaviors use this for the inner call; external callers go through
    /// [`invoke`](Self::invoke).
    pub fn call_target(&self, args: &CallArgs) -> Result<Value, AppError> {
        match &self.target.body {
            TargetBody::Function(body) => body(args),
            TargetBody::ClassLevel(body) => {
                let owner = self
                    .owner_type
                    .ok_or_else(|| AppError::UnboundCall(self.qualified_name()))?;
                body(owner, args)
            }
            TargetBody::Method => {
                let receiver = self
                    .bound_receiver()
                    .ok_or_else(|| AppError::UnboundCall(self.qualified_name()))?;
                receiver.call_method(self.target.name(), args)
            }
        }
    }

    /// Attribute access. Names on the [`CONTROL_FIELDS`] list are answered by
    /// the proxy; everything else forwards transparently to the wrapped
    /// target.
    pub fn attribute(&self, name: &str) -> Option<String> {
        if CONTROL_FIELDS.contains(&name) {
            return self.control_field(name);
        }
        match name {
            "name" | "__name__" => Some(self.target.name().to_string()),
            "doc" | "__doc__" => self.target.doc().map(str::to_string),
            "repr" | "__repr__" => Some(self.repr()),
            _ => None,
        }
    }

    fn control_field(&self, name: &str) -> Option<String> {
        match name {
            "target_callable" => Some(self.target.name().to_string()),
            "bound_instance" => self.bound_receiver().map(|r| r.render()),
            "owner_type" => self.owner_type.map(str::to_string),
            "binding_kind" => Some(format!("{:?}", self.binding_kind)),
            _ => None,
        }
    }

    pub fn binding_kind(&self) -> BindingKind {
        self.binding_kind
    }

    pub fn owner_type(&self) -> Option<&'static str> {
        self.owner_type
    }

    /// The bound receiver, if any and still alive. The proxy holds the
    /// instance weakly; the composition root owns it.
    pub fn bound_receiver(&self) -> Option<Arc<dyn Receiver>> {
        self.bound_instance.as_ref().and_then(Weak::upgrade)
    }

    pub fn name(&self) -> &'static str {
        self.target.name()
    }

    /// `Owner.name` when bound to an owner type, bare name otherwise.
    pub fn qualified_name(&self) -> String {
        match self.owner_type {
            Some(owner) => format!("{}.{}", owner, self.target.name()),
            None => self.target.name().to_string(),
        }
    }

    fn repr(&self) -> String {
        format!("<callable {}>", self.qualified_name())
    }
}
