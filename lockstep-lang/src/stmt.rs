use std::fmt;
use std::sync::Arc;

use crate::loc::Loc;
use crate::receiver::Receiver;
use crate::value::Value;

/// Guard condition evaluated by the engine.
pub type Cond = Arc<dyn Fn() -> bool + Send + Sync>;
/// Side-effecting procedure run by `exec` and deferred actions.
pub type Action = Arc<dyn Fn() + Send + Sync>;
/// Produces an exit value.
pub type ValueFn = Arc<dyn Fn() -> Value + Send + Sync>;
/// Produces the activity name for a `run` statement.
pub type NameFn = Arc<dyn Fn() -> String + Send + Sync>;
/// Produces the input arguments for a `run` statement, per tick.
pub type ArgsFn = Arc<dyn Fn() -> Vec<Value> + Send + Sync>;
/// Produces the in-out argument locations for a `run` statement, per tick.
pub type LocsFn = Arc<dyn Fn() -> Vec<Loc> + Send + Sync>;
/// Produces the target location of a `receive` statement.
pub type LocFn = Arc<dyn Fn() -> Loc + Send + Sync>;
/// Consumes the exit value of a nested activity.
pub type ResultFn = Arc<dyn Fn(Value) + Send + Sync>;
/// Hands the receiver handle to the external producer, once.
pub type SetupFn = Arc<dyn Fn(Receiver) + Send + Sync>;

/// Preemption flavor of a `when` statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhenKind {
    /// Discard the body and complete when the trigger fires.
    Abort,
    /// Freeze the body for the tick when the trigger fires.
    Suspend,
}

/// A guarded arm of a `select` statement.
#[derive(Clone)]
pub struct Conditional {
    pub cond: Cond,
    pub body: Vec<Stmt>,
}

/// One branch of concurrent execution under `cobegin`.
///
/// Strong trails drive the cobegin's completion; weak trails may be cut
/// short once all strong trails finish. Parallel trails are ticked on
/// worker threads inside a bounded per-tick fork-join.
#[derive(Clone)]
pub struct Trail {
    pub strong: bool,
    pub parallel: bool,
    pub stmts: Vec<Stmt>,
}

impl Trail {
    pub fn strong(stmts: Vec<Stmt>) -> Self {
        Self {
            strong: true,
            parallel: false,
            stmts,
        }
    }

    pub fn weak(stmts: Vec<Stmt>) -> Self {
        Self {
            strong: false,
            parallel: false,
            stmts,
        }
    }

    /// Mark this trail for parallel execution.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }
}

/// A statement of the activity language. Immutable once built; a body is
/// an ordered sequence of statements, nested bodies recurse.
///
/// Closure payloads are capability values: the engine only ever invokes
/// them, it never inspects captured state.
#[derive(Clone)]
pub enum Stmt {
    /// Wait at least one tick, then complete once the condition holds.
    Await(Cond),
    /// Bridge to an external asynchronous source via a [`Receiver`].
    Receive {
        loc: LocFn,
        reset_value: Option<Value>,
        setup: SetupFn,
    },
    /// Run a nested activity to completion, forwarding arguments.
    Run {
        name: NameFn,
        in_args: ArgsFn,
        out_locs: LocsFn,
        on_result: Option<ResultFn>,
    },
    /// Fork into concurrent trails; see [`Trail`] for completion rules.
    Cobegin(Vec<Trail>),
    /// Run the body to completion, then stop if the condition holds,
    /// otherwise restart the body within the same tick.
    RepeatUntil { body: Vec<Stmt>, until: Cond },
    /// Preemption: check the trigger before descending into the body on
    /// every tick but the first.
    When {
        kind: WhenKind,
        cond: Cond,
        body: Vec<Stmt>,
    },
    /// Commit to the first arm whose guard holds at first entry.
    Select(Vec<Conditional>),
    /// Run a procedure synchronously and complete.
    Exec(Action),
    /// Register a scope-exit action on the innermost enclosing block.
    Defer(Action),
    /// Terminate the owning activity invocation with a result value.
    Exit(ValueFn),
    Nop,
}

impl Stmt {
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::Await(_) => "await",
            Stmt::Receive { .. } => "receive",
            Stmt::Run { .. } => "run",
            Stmt::Cobegin(_) => "cobegin",
            Stmt::RepeatUntil { .. } => "repeat-until",
            Stmt::When {
                kind: WhenKind::Abort,
                ..
            } => "when-abort",
            Stmt::When {
                kind: WhenKind::Suspend,
                ..
            } => "when-suspend",
            Stmt::Select(_) => "select",
            Stmt::Exec(_) => "exec",
            Stmt::Defer(_) => "defer",
            Stmt::Exit(_) => "exit",
            Stmt::Nop => "nop",
        }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}
