use tracing::trace;

use lockstep_lang::{Cond, Conditional, EngineResult, Stmt, TickResult, WhenKind};

use crate::block::BlockProcessor;
use crate::processor::EngineCtx;

/// `repeat ... until`: runs the body to completion, checks the condition,
/// and restarts within the same tick when it does not hold.
///
/// A body that completes without suspending while the condition stays
/// false never yields. Liveness is the program's responsibility.
pub(crate) struct LoopProcessor {
    body: BlockProcessor,
    until: Cond,
}

impl LoopProcessor {
    pub(crate) fn new(stmts: Vec<Stmt>, until: Cond, engine: EngineCtx) -> Self {
        Self {
            body: BlockProcessor::new(stmts, engine),
            until,
        }
    }

    pub(crate) fn tick(&mut self) -> EngineResult<TickResult> {
        loop {
            let res = self.body.tick()?;
            if !res.is_done() {
                return Ok(res);
            }
            // The condition is sampled after the iteration, so the body
            // runs at least once.
            if (self.until)() {
                return Ok(TickResult::Done);
            }
            self.body.reset();
        }
    }

    pub(crate) fn teardown(&mut self) {
        self.body.teardown();
    }
}

/// `select`: guards are sampled exactly once, at entry, and the chosen
/// arm is committed to for the statement's whole lifetime.
pub(crate) struct MatchProcessor {
    body: Option<BlockProcessor>,
}

impl MatchProcessor {
    pub(crate) fn new(arms: &[Conditional], engine: &EngineCtx) -> Self {
        let body = arms
            .iter()
            .find(|arm| (arm.cond)())
            .map(|arm| BlockProcessor::new(arm.body.clone(), engine.clone()));
        Self { body }
    }

    pub(crate) fn tick(&mut self) -> EngineResult<TickResult> {
        match &mut self.body {
            Some(body) => body.tick(),
            // No guard held at entry.
            None => Ok(TickResult::Done),
        }
    }

    pub(crate) fn teardown(&mut self) {
        if let Some(body) = &mut self.body {
            body.teardown();
        }
    }
}

/// `when`: preemption wrapper around a body.
///
/// The trigger is never sampled on the entry tick. On every later tick it
/// is sampled before the body runs, so an outer preemption wins over any
/// progress the body would have made.
pub(crate) struct WhenProcessor {
    kind: WhenKind,
    cond: Cond,
    body: BlockProcessor,
    armed: bool,
}

impl WhenProcessor {
    pub(crate) fn new(kind: WhenKind, cond: Cond, body: Vec<Stmt>, engine: EngineCtx) -> Self {
        Self {
            kind,
            cond,
            body: BlockProcessor::new(body, engine),
            armed: false,
        }
    }

    pub(crate) fn tick(&mut self) -> EngineResult<TickResult> {
        if self.armed && (self.cond)() {
            trace!(kind = ?self.kind, "preemption trigger fired");
            match self.kind {
                WhenKind::Abort => {
                    self.body.teardown();
                    return Ok(TickResult::Done);
                }
                WhenKind::Suspend => return Ok(TickResult::Wait),
            }
        }
        let res = self.body.tick()?;
        self.armed = true;
        Ok(res)
    }

    pub(crate) fn teardown(&mut self) {
        self.body.teardown();
    }
}
