#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use lockstep_engine::{ModuleExt, Processor};
use lockstep_lang::{Activity, Ctx, Module, Stmt, TickResult};

/// A module whose only activity is `Main` with no parameters.
pub fn main_module(build: impl Fn(&Ctx) -> Vec<Stmt> + Send + Sync + 'static) -> Module {
    Module::new(vec![Activity::new("Main", &[], &[], build)])
}

pub fn main_processor(module: Module) -> Processor {
    module.processor().expect("module has a Main activity")
}

/// One reaction of a parameterless entry activity.
pub fn tick(p: &mut Processor) -> TickResult {
    p.tick(&[], &[]).expect("reaction failed")
}

/// Tick until the first non-wait outcome; returns the 1-based tick number
/// it occurred on.
pub fn run_to_completion(p: &mut Processor, max_ticks: usize) -> (usize, TickResult) {
    for n in 1..=max_ticks {
        let res = tick(p);
        if !res.is_wait() {
            return (n, res);
        }
    }
    panic!("no completion within {max_ticks} ticks");
}

/// Shared, clonable event log for observing execution order.
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: &str) {
        self.0.lock().push(event.to_string());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}
