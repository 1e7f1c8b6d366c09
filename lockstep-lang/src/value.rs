use serde::{Deserialize, Serialize};

/// A value stored in an activity context or passed between activities.
///
/// A closed tagged union instead of an open `Any`: every argument,
/// parameter and context slot carries one of these. The two signal
/// variants are "presencable" — their `present` flag is valid only for
/// the tick in which it was set and is cleared by the context's per-tick
/// reset pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Pure signal: present for exactly the tick it was emitted in.
    Signal { present: bool },
    /// Valued signal: presence plus a payload.
    ValueSignal { present: bool, value: Box<Value> },
}

impl Value {
    /// A fresh, absent pure signal.
    pub fn signal() -> Self {
        Value::Signal { present: false }
    }

    /// A fresh, absent valued signal carrying `value` as its payload.
    pub fn value_signal(value: impl Into<Value>) -> Self {
        Value::ValueSignal {
            present: false,
            value: Box::new(value.into()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(x) = self {
            Some(*x)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::Str(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Whether this value takes part in the per-tick presence reset.
    pub fn is_presencable(&self) -> bool {
        matches!(
            self,
            Value::Signal { .. } | Value::ValueSignal { .. }
        )
    }

    /// Presence this tick. Always `false` for non-signal values.
    pub fn is_present(&self) -> bool {
        match self {
            Value::Signal { present } => *present,
            Value::ValueSignal { present, .. } => *present,
            _ => false,
        }
    }

    /// Payload of a valued signal, if this is one.
    pub fn payload(&self) -> Option<&Value> {
        if let Value::ValueSignal { value, .. } = self {
            Some(value)
        } else {
            None
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Outcome of ticking a statement, block, or whole activity.
///
/// `Wait` suspends the enclosing levels until the next reaction, `Done`
/// lets the sequence advance, and `Result` unwinds the owning activity
/// invocation with an exit value.
#[derive(Clone, Debug)]
pub enum TickResult {
    Wait,
    Done,
    Result(Value),
}

impl TickResult {
    pub fn is_wait(&self) -> bool {
        matches!(self, TickResult::Wait)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TickResult::Done)
    }
}

/// Control flow only ever distinguishes the three cases; the payload of
/// `Result` never takes part in comparisons.
impl PartialEq for TickResult {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (TickResult::Wait, TickResult::Wait)
                | (TickResult::Done, TickResult::Done)
                | (TickResult::Result(_), TickResult::Result(_))
        )
    }
}
