use std::sync::Arc;

use parking_lot::Mutex;

use crate::ctx::Ctx;
use crate::value::Value;

/// Read/write indirection over a variable slot.
///
/// In-out arguments and receive targets write through a `Loc` so the
/// caller decides what backs the storage: a directly owned cell, or a
/// named slot in some context.
#[derive(Clone)]
pub enum Loc {
    Direct(Arc<Mutex<Value>>),
    Var { ctx: Ctx, name: String },
}

impl Loc {
    /// A location backed by its own cell, seeded with `value`.
    pub fn direct(value: impl Into<Value>) -> Self {
        Loc::Direct(Arc::new(Mutex::new(value.into())))
    }

    /// A location bound to a named context slot.
    pub fn var(ctx: Ctx, name: &str) -> Self {
        Loc::Var {
            ctx,
            name: name.to_string(),
        }
    }

    pub fn get(&self) -> Value {
        match self {
            Loc::Direct(cell) => cell.lock().clone(),
            Loc::Var { ctx, name } => ctx.get(name),
        }
    }

    pub fn set(&self, value: impl Into<Value>) {
        match self {
            Loc::Direct(cell) => *cell.lock() = value.into(),
            Loc::Var { ctx, name } => ctx.set(name, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_loc() {
        let loc = Loc::direct(1);
        assert_eq!(loc.get(), Value::Int(1));
        loc.set(2);
        assert_eq!(loc.get(), Value::Int(2));

        // Clones alias the same cell.
        let alias = loc.clone();
        alias.set(3);
        assert_eq!(loc.get(), Value::Int(3));
    }

    #[test]
    fn test_var_loc_writes_through() {
        let ctx = Ctx::new();
        ctx.set("x", 0);
        let loc = ctx.loc("x");
        loc.set(7);
        assert_eq!(ctx.get("x"), Value::Int(7));
        assert_eq!(loc.get(), Value::Int(7));
    }
}
