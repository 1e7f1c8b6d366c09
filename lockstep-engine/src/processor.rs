use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use lockstep_lang::{
    Activity, Ctx, EngineError, EngineResult, Loc, Module, TickResult, TriggerSlot, Value,
};

use crate::block::BlockProcessor;

/// State shared by every processor of one engine instance: the module
/// used for `run` lookups and the trigger slot handed to receivers.
#[derive(Clone)]
pub(crate) struct EngineCtx {
    pub(crate) module: Arc<Module>,
    pub(crate) trigger: TriggerSlot,
}

/// Binds one activity invocation to its own context and drives its block
/// processor, copying parameters in before the body and in-out results
/// back out after it.
pub(crate) struct ActivityProcessor {
    act: Activity,
    ctx: Ctx,
    body: BlockProcessor,
}

impl ActivityProcessor {
    pub(crate) fn new(act: Activity, engine: EngineCtx) -> Self {
        let ctx = Ctx::new();
        let stmts = act.make_stmts(&ctx);
        Self {
            act,
            ctx,
            body: BlockProcessor::new(stmts, engine),
        }
    }

    /// One reaction. Per-tick order: snapshot previous values, reset
    /// signal presence, bind inputs, bind in-out inputs, run the body,
    /// write in-out outputs back. Argument binding is zip-truncate.
    pub(crate) fn tick(
        &mut self,
        in_args: &[Value],
        out_locs: &[Loc],
    ) -> EngineResult<TickResult> {
        self.ctx.snapshot_previous();
        self.ctx.reset_presence();
        for (param, arg) in self.act.in_params().iter().zip(in_args) {
            self.ctx.set(param, arg.clone());
        }
        for (param, loc) in self.act.inout_params().iter().zip(out_locs) {
            self.ctx.set(param, loc.get());
        }

        let res = self.body.tick()?;

        for (param, loc) in self.act.inout_params().iter().zip(out_locs) {
            loc.set(self.ctx.get(param));
        }
        Ok(res)
    }

    pub(crate) fn teardown(&mut self) {
        self.body.teardown();
    }
}

/// Top-level entry point: owns the entry activity's processor and drives
/// one reaction per [`Processor::tick`] call.
pub struct Processor {
    engine: EngineCtx,
    entry: ActivityProcessor,
    finished: bool,
}

impl Processor {
    pub fn new(module: Module, entry_point: &str) -> EngineResult<Self> {
        let engine = EngineCtx {
            module: Arc::new(module),
            trigger: Arc::new(Mutex::new(None)),
        };
        let act = engine
            .module
            .lookup(entry_point)
            .cloned()
            .ok_or_else(|| EngineError::ActivityNotFound(entry_point.to_string()))?;
        let entry = ActivityProcessor::new(act, engine.clone());
        Ok(Self {
            engine,
            entry,
            finished: false,
        })
    }

    /// Install the callback that [`lockstep_lang::Receiver::react`]
    /// invokes so an external producer can ask the driver for an
    /// immediate extra reaction.
    pub fn set_react_trigger(&self, f: impl Fn() + Send + Sync + 'static) {
        *self.engine.trigger.lock() = Some(Arc::new(f));
    }

    /// Drive one reaction. `in_args` and `out_locs` are matched to the
    /// entry activity's declared parameter lists zip-truncate style.
    pub fn tick(&mut self, in_args: &[Value], out_locs: &[Loc]) -> EngineResult<TickResult> {
        let res = self.entry.tick(in_args, out_locs)?;
        trace!(result = ?res, "reaction complete");
        if !res.is_wait() && !self.finished {
            self.finished = true;
            self.entry.teardown();
        }
        Ok(res)
    }
}

/// Entry-point conveniences on [`Module`].
pub trait ModuleExt {
    /// Processor for this module's `Main` activity.
    fn processor(&self) -> EngineResult<Processor>;

    /// Processor for the named entry activity.
    fn processor_at(&self, entry_point: &str) -> EngineResult<Processor>;
}

impl ModuleExt for Module {
    fn processor(&self) -> EngineResult<Processor> {
        Processor::new(self.clone(), "Main")
    }

    fn processor_at(&self, entry_point: &str) -> EngineResult<Processor> {
        Processor::new(self.clone(), entry_point)
    }
}
