//! Dynamic Call Values
//!
//! Arguments and return values that cross the proxy boundary. Wrapped
//! callables all share one dynamic signature
//! (`fn(&CallArgs) -> Result<Value, AppError>`), so a single proxy type can
//! stand in for any of them.

use std::collections::BTreeMap;
use std::fmt;

/// A dynamically-typed value passed into or returned from a wrapped callable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Render the value the way it appears inside a trace line's argument
    /// list: strings quoted, lists bracketed. `Display` keeps the raw payload
    /// for return values (`<- greet() ==> hi Sal`).
    pub fn render(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Str(s) => format!("'{}'", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::render).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.pad("None"),
            Value::Bool(b) => fmt::Display::fmt(b, f),
            Value::Int(n) => fmt::Display::fmt(n, f),
            Value::Float(x) => fmt::Display::fmt(x, f),
            Value::Str(s) => f.pad(s),
            Value::List(_) => f.pad(&self.render()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Positional and keyword arguments for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument (builder style).
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument (builder style).
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_kwarg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Positional argument expected to be a string; errors name the callable
    /// context the caller supplies.
    pub fn str_at(&self, index: usize) -> Option<&str> {
        match self.positional.get(index) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn str_kwarg(&self, name: &str) -> Option<&str> {
        match self.keyword.get(name) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn int_at(&self, index: usize) -> Option<i64> {
        match self.positional.get(index) {
            Some(Value::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Render the `args=...` / `kwargs=...` segments of a call display.
    /// Empty collections produce no segment, matching the rendered form
    /// `greet(args=('Sal',))`.
    pub fn render_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        if !self.positional.is_empty() {
            let parts: Vec<String> = self.positional.iter().map(Value::render).collect();
            let tuple = if parts.len() == 1 {
                format!("({},)", parts[0])
            } else {
                format!("({})", parts.join(", "))
            };
            segments.push(format!("args={}", tuple));
        }
        if !self.keyword.is_empty() {
            let parts: Vec<String> = self
                .keyword
                .iter()
                .map(|(k, v)| format!("'{}': {}", k, v.render()))
                .collect();
            segments.push(format!("kwargs={{{}}}", parts.join(", ")));
        }
        segments
    }
}
