//! Data model for the Lockstep activity language.
//!
//! An activity is a named behavior whose body is an immutable tree of
//! [`Stmt`] values. Statements describe work that spans discrete reaction
//! steps (ticks) rather than running to completion: awaiting a condition,
//! receiving from an asynchronous source, running a nested activity,
//! branching into concurrent trails, looping, selecting, and preempting.
//! The interpreter that steps these trees lives in `lockstep-engine`;
//! this crate holds everything the engine consumes: the tagged [`Value`]
//! union, the per-invocation [`Ctx`] variable store with its
//! previous-tick snapshot and signal presence model, the [`Loc`]
//! read/write indirection, the [`Receiver`] bridge contract, and plain
//! constructor functions for assembling statement trees.

#![warn(rust_2018_idioms)]

pub mod activity;
pub mod builder;
pub mod ctx;
pub mod error;
pub mod loc;
pub mod receiver;
pub mod stmt;
pub mod value;

pub use crate::activity::{Activity, Module};
pub use crate::ctx::Ctx;
pub use crate::error::{EngineError, EngineResult};
pub use crate::loc::Loc;
pub use crate::receiver::{ReactTrigger, Receiver, TriggerSlot};
pub use crate::stmt::{
    Action, ArgsFn, Cond, Conditional, LocFn, LocsFn, NameFn, ResultFn, SetupFn, Stmt, Trail,
    ValueFn, WhenKind,
};
pub use crate::value::{TickResult, Value};
