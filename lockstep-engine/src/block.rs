use lockstep_lang::{Action, EngineError, EngineResult, Stmt, TickResult};

use crate::cobegin::CobeginProcessor;
use crate::leaf::{AwaitProcessor, ReceiveProcessor};
use crate::processor::{ActivityProcessor, EngineCtx};
use crate::structured::{LoopProcessor, MatchProcessor, WhenProcessor};

/// Step processor for one structured or suspended statement.
///
/// A block holds at most one of these, since only one statement of a
/// sequence can be pending across a tick boundary.
pub(crate) enum StepProcessor {
    Await(AwaitProcessor),
    Receive(ReceiveProcessor),
    Activity(Box<ActivityProcessor>),
    Loop(Box<LoopProcessor>),
    Cobegin(Box<CobeginProcessor>),
    Match(Box<MatchProcessor>),
    When(Box<WhenProcessor>),
}

impl StepProcessor {
    pub(crate) fn teardown(&mut self) {
        match self {
            StepProcessor::Await(_) | StepProcessor::Receive(_) => {}
            StepProcessor::Activity(p) => p.teardown(),
            StepProcessor::Loop(p) => p.teardown(),
            StepProcessor::Cobegin(p) => p.teardown(),
            StepProcessor::Match(p) => p.teardown(),
            StepProcessor::When(p) => p.teardown(),
        }
    }
}

/// The core recursive interpreter: sequences a statement list one active
/// child at a time, persisting a program counter and a deferred-action
/// stack across ticks.
pub(crate) struct BlockProcessor {
    stmts: Vec<Stmt>,
    engine: EngineCtx,
    pc: usize,
    child: Option<StepProcessor>,
    defers: Vec<Action>,
}

impl BlockProcessor {
    pub(crate) fn new(stmts: Vec<Stmt>, engine: EngineCtx) -> Self {
        Self {
            stmts,
            engine,
            pc: 0,
            child: None,
            defers: Vec::new(),
        }
    }

    /// Advance as far as possible within this tick. Wait propagates up
    /// without moving the counter; Done advances and continues in the
    /// same tick; Result unwinds immediately.
    pub(crate) fn tick(&mut self) -> EngineResult<TickResult> {
        while self.pc < self.stmts.len() {
            // Cheap clone: statement payloads are Arc-backed.
            let stmt = self.stmts[self.pc].clone();
            match stmt {
                Stmt::Exec(action) => {
                    action();
                    self.pc += 1;
                }

                Stmt::Defer(action) => {
                    self.defers.push(action);
                    self.pc += 1;
                }

                Stmt::Exit(f) => return Ok(TickResult::Result(f())),

                Stmt::Nop => self.pc += 1,

                Stmt::Await(cond) => {
                    if self.child.is_none() {
                        self.child = Some(StepProcessor::Await(AwaitProcessor::new(cond)));
                    }
                    let res = match self.child.as_mut() {
                        Some(StepProcessor::Await(p)) => p.tick(),
                        _ => unreachable!("child kind mismatch at await"),
                    };
                    if res.is_wait() {
                        return Ok(TickResult::Wait);
                    }
                    self.finish_child();
                    self.pc += 1;
                }

                Stmt::Receive {
                    loc,
                    reset_value,
                    setup,
                } => {
                    if self.child.is_none() {
                        self.child = Some(StepProcessor::Receive(ReceiveProcessor::new(
                            loc(),
                            reset_value,
                            &setup,
                            &self.engine,
                        )));
                    }
                    let res = match self.child.as_mut() {
                        Some(StepProcessor::Receive(p)) => p.tick(),
                        _ => unreachable!("child kind mismatch at receive"),
                    };
                    if res.is_wait() {
                        return Ok(TickResult::Wait);
                    }
                    self.finish_child();
                    self.pc += 1;
                }

                Stmt::Run {
                    name,
                    in_args,
                    out_locs,
                    on_result,
                } => {
                    if self.child.is_none() {
                        let act_name = name();
                        let act = self
                            .engine
                            .module
                            .lookup(&act_name)
                            .cloned()
                            .ok_or(EngineError::ActivityNotFound(act_name))?;
                        self.child = Some(StepProcessor::Activity(Box::new(
                            ActivityProcessor::new(act, self.engine.clone()),
                        )));
                    }
                    let args = in_args();
                    let locs = out_locs();
                    let res = match self.child.as_mut() {
                        Some(StepProcessor::Activity(p)) => p.tick(&args, &locs)?,
                        _ => unreachable!("child kind mismatch at run"),
                    };
                    if res.is_wait() {
                        return Ok(TickResult::Wait);
                    }
                    // The nested activity's exit value is consumed here;
                    // it does not unwind the caller.
                    if let TickResult::Result(val) = res {
                        if let Some(cb) = &on_result {
                            cb(val);
                        }
                    }
                    self.finish_child();
                    self.pc += 1;
                }

                Stmt::RepeatUntil { body, until } => {
                    if self.child.is_none() {
                        self.child = Some(StepProcessor::Loop(Box::new(LoopProcessor::new(
                            body,
                            until,
                            self.engine.clone(),
                        ))));
                    }
                    let res = match self.child.as_mut() {
                        Some(StepProcessor::Loop(p)) => p.tick()?,
                        _ => unreachable!("child kind mismatch at repeat-until"),
                    };
                    match res {
                        TickResult::Wait => return Ok(TickResult::Wait),
                        TickResult::Done => {
                            self.finish_child();
                            self.pc += 1;
                        }
                        TickResult::Result(_) => {
                            self.finish_child();
                            return Ok(res);
                        }
                    }
                }

                Stmt::Cobegin(trails) => {
                    if self.child.is_none() {
                        self.child = Some(StepProcessor::Cobegin(Box::new(
                            CobeginProcessor::new(&trails, &self.engine),
                        )));
                    }
                    let res = match self.child.as_mut() {
                        Some(StepProcessor::Cobegin(p)) => p.tick()?,
                        _ => unreachable!("child kind mismatch at cobegin"),
                    };
                    if res.is_wait() {
                        return Ok(TickResult::Wait);
                    }
                    self.finish_child();
                    self.pc += 1;
                }

                Stmt::Select(arms) => {
                    if self.child.is_none() {
                        self.child = Some(StepProcessor::Match(Box::new(MatchProcessor::new(
                            &arms,
                            &self.engine,
                        ))));
                    }
                    let res = match self.child.as_mut() {
                        Some(StepProcessor::Match(p)) => p.tick()?,
                        _ => unreachable!("child kind mismatch at select"),
                    };
                    match res {
                        TickResult::Wait => return Ok(TickResult::Wait),
                        TickResult::Done => {
                            self.finish_child();
                            self.pc += 1;
                        }
                        TickResult::Result(_) => {
                            self.finish_child();
                            return Ok(res);
                        }
                    }
                }

                Stmt::When { kind, cond, body } => {
                    if self.child.is_none() {
                        self.child = Some(StepProcessor::When(Box::new(WhenProcessor::new(
                            kind,
                            cond,
                            body,
                            self.engine.clone(),
                        ))));
                    }
                    let res = match self.child.as_mut() {
                        Some(StepProcessor::When(p)) => p.tick()?,
                        _ => unreachable!("child kind mismatch at when"),
                    };
                    match res {
                        TickResult::Wait => return Ok(TickResult::Wait),
                        TickResult::Done => {
                            self.finish_child();
                            self.pc += 1;
                        }
                        TickResult::Result(_) => {
                            self.finish_child();
                            return Ok(res);
                        }
                    }
                }
            }
        }
        Ok(TickResult::Done)
    }

    /// Rewind for the next loop iteration. Reset counts as a discard:
    /// the current iteration's defers fire before the counter rewinds.
    pub(crate) fn reset(&mut self) {
        self.teardown();
        self.pc = 0;
    }

    /// Discard this block: cascade into the active child first, then run
    /// the local deferred actions newest-first. Innermost defers fire
    /// before outer ones, declaration order preserved within a level.
    pub(crate) fn teardown(&mut self) {
        self.finish_child();
        while let Some(action) = self.defers.pop() {
            action();
        }
    }

    fn finish_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            child.teardown();
        }
    }
}
