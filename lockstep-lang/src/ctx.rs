use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::loc::Loc;
use crate::value::Value;

#[derive(Default)]
struct CtxState {
    vars: HashMap<String, Value>,
    prev: HashMap<String, Value>,
    /// Names of registered presencables, in first-write order.
    presencables: Vec<String>,
}

/// Named-variable store scoped to one activity invocation.
///
/// Cloning yields another handle to the same store; statement closures
/// capture such clones. All access goes through an internal lock, so
/// trails ticked in parallel see single-writer-at-a-time semantics. The
/// lock guarantees exclusion, not ordering, between parallel trails
/// within one tick.
///
/// Besides the live map a context owns the previous-tick snapshot
/// (refreshed by the engine at the top of every tick, before any new
/// mutation) and the set of registered presencable values, reset to
/// absent once per tick before the activity body runs.
#[derive(Clone, Default)]
pub struct Ctx {
    state: Arc<Mutex<CtxState>>,
}

impl Ctx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a variable.
    ///
    /// Reading a name that was never written indicates a bug in how the
    /// statement tree was constructed and panics. Use [`Ctx::try_get`]
    /// for a recoverable lookup.
    pub fn get(&self, name: &str) -> Value {
        self.try_get(name)
            .unwrap_or_else(|| panic!("`{name}` is not a variable"))
    }

    pub fn try_get(&self, name: &str) -> Option<Value> {
        self.state.lock().vars.get(name).cloned()
    }

    pub fn get_bool(&self, name: &str) -> bool {
        match self.get(name) {
            Value::Bool(b) => b,
            other => panic!("`{name}` is not a Bool: {other:?}"),
        }
    }

    pub fn get_int(&self, name: &str) -> i64 {
        match self.get(name) {
            Value::Int(n) => n,
            other => panic!("`{name}` is not an Int: {other:?}"),
        }
    }

    pub fn get_str(&self, name: &str) -> String {
        match self.get(name) {
            Value::Str(s) => s,
            other => panic!("`{name}` is not a Str: {other:?}"),
        }
    }

    /// Write a variable, registering it for the per-tick presence reset
    /// if the value is a signal.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        let mut st = self.state.lock();
        if value.is_presencable() && !st.presencables.iter().any(|n| n == name) {
            st.presencables.push(name.to_string());
        }
        st.vars.insert(name.to_string(), value);
    }

    /// Emit a pure signal: present for the remainder of this tick.
    pub fn emit(&self, name: &str) {
        self.set(name, Value::Signal { present: true });
    }

    /// Emit a valued signal carrying `value` for the remainder of this
    /// tick.
    pub fn emit_value(&self, name: &str, value: impl Into<Value>) {
        self.set(
            name,
            Value::ValueSignal {
                present: true,
                value: Box::new(value.into()),
            },
        );
    }

    /// Presence of a signal this tick. Panics if the name was never
    /// written, like any other read of an unset variable.
    pub fn present(&self, name: &str) -> bool {
        self.get(name).is_present()
    }

    /// Value the variable held at the end of the previous tick. Panics if
    /// the variable had no value then.
    pub fn prev(&self, name: &str) -> Value {
        self.state
            .lock()
            .prev
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("`{name}` has no previous value"))
    }

    /// Previous-tick value, or `default` if the variable had none.
    pub fn prev_or(&self, name: &str, default: impl Into<Value>) -> Value {
        self.state
            .lock()
            .prev
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// A location bound to the named slot of this context.
    pub fn loc(&self, name: &str) -> Loc {
        Loc::var(self.clone(), name)
    }

    /// Copy the live map into the previous-tick snapshot. The engine
    /// calls this at the top of every tick, before any new-tick mutation
    /// is applied.
    pub fn snapshot_previous(&self) {
        let mut st = self.state.lock();
        st.prev = st.vars.clone();
    }

    /// Reset every registered presencable to absent. The engine calls
    /// this once per tick, after the snapshot and before the body runs.
    pub fn reset_presence(&self) {
        let mut st = self.state.lock();
        let CtxState {
            vars, presencables, ..
        } = &mut *st;
        for name in presencables.iter() {
            match vars.get_mut(name) {
                Some(Value::Signal { present }) => *present = false,
                Some(Value::ValueSignal { present, .. }) => *present = false,
                _ => {}
            }
        }
    }
}
