//! Tick-driven interpreter for the Lockstep activity language.
//!
//! An external driver calls [`Processor::tick`] once per reaction. The
//! call descends into the entry activity's block processor, which
//! dispatches to whichever statement is active, recursing into nested
//! processors (loops, selects, preemption, cobegin trails, nested
//! activities). Each level returns wait, done, or a result value; wait
//! short-circuits every enclosing level immediately, preserving each
//! level's position for the next tick.
//!
//! Within one tick execution is a single-threaded recursive descent,
//! except for the bounded per-tick fork-join used by parallel trails,
//! which borrows scoped worker threads and joins before the tick
//! returns.

#![warn(rust_2018_idioms)]

mod block;
mod cobegin;
mod leaf;
mod processor;
mod structured;

pub use crate::processor::{ModuleExt, Processor};
