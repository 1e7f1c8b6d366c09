//! Plain constructor functions for assembling statement trees.
//!
//! These are ordinary functions, not a fluent DSL: the engine's contract
//! depends only on the resulting tree shape. Sugar constructs
//! (`while_loop`, `if_else`, `when_reset`, ...) desugar here into the
//! core statement kinds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::loc::Loc;
use crate::receiver::Receiver;
use crate::stmt::{Cond, Conditional, Stmt, Trail, WhenKind};
use crate::value::Value;

/// Wait at least one tick, then complete once `cond` holds.
pub fn wait_for(cond: impl Fn() -> bool + Send + Sync + 'static) -> Stmt {
    Stmt::Await(Arc::new(cond))
}

/// Wait exactly one tick.
pub fn pause() -> Stmt {
    wait_for(|| true)
}

/// Run `action` synchronously within the current tick.
pub fn exec(action: impl Fn() + Send + Sync + 'static) -> Stmt {
    Stmt::Exec(Arc::new(action))
}

/// Register `action` to run when the innermost enclosing block is torn
/// down, LIFO relative to sibling defers.
pub fn defer(action: impl Fn() + Send + Sync + 'static) -> Stmt {
    Stmt::Defer(Arc::new(action))
}

/// Terminate the owning activity invocation with `f()`.
pub fn exit_with(f: impl Fn() -> Value + Send + Sync + 'static) -> Stmt {
    Stmt::Exit(Arc::new(f))
}

pub fn nop() -> Stmt {
    Stmt::Nop
}

/// Run a nested activity, forwarding input arguments evaluated per tick.
pub fn run(name: &str, in_args: impl Fn() -> Vec<Value> + Send + Sync + 'static) -> Stmt {
    let name = name.to_string();
    Stmt::Run {
        name: Arc::new(move || name.clone()),
        in_args: Arc::new(in_args),
        out_locs: Arc::new(Vec::new),
        on_result: None,
    }
}

/// Run a nested activity with in-out arguments written back through the
/// given locations.
pub fn run_with_outs(
    name: &str,
    in_args: impl Fn() -> Vec<Value> + Send + Sync + 'static,
    out_locs: impl Fn() -> Vec<Loc> + Send + Sync + 'static,
) -> Stmt {
    let name = name.to_string();
    Stmt::Run {
        name: Arc::new(move || name.clone()),
        in_args: Arc::new(in_args),
        out_locs: Arc::new(out_locs),
        on_result: None,
    }
}

/// Run a nested activity and hand its exit value to `on_result`.
pub fn run_with_result(
    name: &str,
    in_args: impl Fn() -> Vec<Value> + Send + Sync + 'static,
    on_result: impl Fn(Value) + Send + Sync + 'static,
) -> Stmt {
    let name = name.to_string();
    Stmt::Run {
        name: Arc::new(move || name.clone()),
        in_args: Arc::new(in_args),
        out_locs: Arc::new(Vec::new),
        on_result: Some(Arc::new(on_result)),
    }
}

/// Bridge to an external asynchronous source; the target location keeps
/// its value from the previous tick whenever nothing arrives.
pub fn receive(
    loc: impl Fn() -> Loc + Send + Sync + 'static,
    setup: impl Fn(Receiver) + Send + Sync + 'static,
) -> Stmt {
    Stmt::Receive {
        loc: Arc::new(loc),
        reset_value: None,
        setup: Arc::new(setup),
    }
}

/// Like [`receive`], but writes `reset_value` into the target on every
/// tick where no value arrived.
pub fn receive_with_reset(
    loc: impl Fn() -> Loc + Send + Sync + 'static,
    reset_value: impl Into<Value>,
    setup: impl Fn(Receiver) + Send + Sync + 'static,
) -> Stmt {
    Stmt::Receive {
        loc: Arc::new(loc),
        reset_value: Some(reset_value.into()),
        setup: Arc::new(setup),
    }
}

/// Fork into concurrent trails.
pub fn cobegin(trails: Vec<Trail>) -> Stmt {
    Stmt::Cobegin(trails)
}

/// Fork into trails that are all ticked in parallel.
pub fn parbegin(trails: Vec<Trail>) -> Stmt {
    Stmt::Cobegin(trails.into_iter().map(Trail::parallel).collect())
}

pub fn strong(stmts: Vec<Stmt>) -> Trail {
    Trail::strong(stmts)
}

pub fn weak(stmts: Vec<Stmt>) -> Trail {
    Trail::weak(stmts)
}

/// Run `body` to completion, stop once `until` holds, otherwise restart
/// within the same tick.
pub fn repeat_until(body: Vec<Stmt>, until: impl Fn() -> bool + Send + Sync + 'static) -> Stmt {
    Stmt::RepeatUntil {
        body,
        until: Arc::new(until),
    }
}

/// Loop `body` forever. Callers must ensure the body suspends somewhere.
pub fn forever(body: Vec<Stmt>) -> Stmt {
    Stmt::RepeatUntil {
        body,
        until: Arc::new(|| false),
    }
}

/// Pre-checked loop: immediately done if `cond` is false at entry,
/// otherwise repeats `body` until `cond` turns false.
pub fn while_loop(cond: impl Fn() -> bool + Send + Sync + 'static, body: Vec<Stmt>) -> Stmt {
    let cond: Cond = Arc::new(cond);
    let until = {
        let c = cond.clone();
        Arc::new(move || !c()) as Cond
    };
    Stmt::Select(vec![Conditional {
        cond,
        body: vec![Stmt::RepeatUntil { body, until }],
    }])
}

/// Abort preemption: `cond` checked before the body on every tick but
/// the first; a firing trigger discards the body and completes.
pub fn when_abort(cond: impl Fn() -> bool + Send + Sync + 'static, body: Vec<Stmt>) -> Stmt {
    Stmt::When {
        kind: WhenKind::Abort,
        cond: Arc::new(cond),
        body,
    }
}

/// Suspend preemption: a firing trigger freezes the body for the tick.
pub fn when_suspend(cond: impl Fn() -> bool + Send + Sync + 'static, body: Vec<Stmt>) -> Stmt {
    Stmt::When {
        kind: WhenKind::Suspend,
        cond: Arc::new(cond),
        body,
    }
}

/// Restart preemption: like [`when_abort`], but an aborted body restarts
/// from the top instead of terminating the statement. Completes only when
/// the body runs to the end un-aborted.
pub fn when_reset(cond: impl Fn() -> bool + Send + Sync + 'static, body: Vec<Stmt>) -> Stmt {
    let finished = Arc::new(AtomicBool::new(false));

    let entered = finished.clone();
    let completed = finished.clone();
    let mut guarded = Vec::with_capacity(body.len() + 2);
    guarded.push(Stmt::Exec(Arc::new(move || {
        entered.store(false, Ordering::Relaxed)
    })));
    guarded.extend(body);
    guarded.push(Stmt::Exec(Arc::new(move || {
        completed.store(true, Ordering::Relaxed)
    })));

    Stmt::RepeatUntil {
        body: vec![Stmt::When {
            kind: WhenKind::Abort,
            cond: Arc::new(cond),
            body: guarded,
        }],
        until: Arc::new(move || finished.load(Ordering::Relaxed)),
    }
}

/// A guarded arm for [`select`].
pub fn arm(cond: impl Fn() -> bool + Send + Sync + 'static, body: Vec<Stmt>) -> Conditional {
    Conditional {
        cond: Arc::new(cond),
        body,
    }
}

/// Commit to the first arm whose guard holds at first entry; immediately
/// done if none match. Guards are evaluated exactly once.
pub fn select(arms: Vec<Conditional>) -> Stmt {
    Stmt::Select(arms)
}

/// Single-arm select.
pub fn if_then(cond: impl Fn() -> bool + Send + Sync + 'static, body: Vec<Stmt>) -> Stmt {
    Stmt::Select(vec![arm(cond, body)])
}

/// Two-arm select with an unconditional fallback.
pub fn if_else(
    cond: impl Fn() -> bool + Send + Sync + 'static,
    then_body: Vec<Stmt>,
    else_body: Vec<Stmt>,
) -> Stmt {
    Stmt::Select(vec![arm(cond, then_body), arm(|| true, else_body)])
}
