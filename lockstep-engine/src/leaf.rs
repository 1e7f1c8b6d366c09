use lockstep_lang::{Cond, Loc, Receiver, SetupFn, TickResult, Value};

use crate::processor::EngineCtx;

/// Suspends on its entry tick unconditionally, then completes on the
/// first later tick where the condition holds.
pub(crate) struct AwaitProcessor {
    cond: Cond,
    fresh: bool,
}

impl AwaitProcessor {
    pub(crate) fn new(cond: Cond) -> Self {
        Self { cond, fresh: true }
    }

    pub(crate) fn tick(&mut self) -> TickResult {
        if self.fresh {
            self.fresh = false;
            return TickResult::Wait;
        }
        if (self.cond)() {
            TickResult::Done
        } else {
            TickResult::Wait
        }
    }
}

/// Applies posts from an external producer to the target location, one
/// tick at a time, until the producer signals completion.
pub(crate) struct ReceiveProcessor {
    loc: Loc,
    reset_value: Option<Value>,
    receiver: Receiver,
}

impl ReceiveProcessor {
    /// The setup callback runs exactly once, here, handing the producer
    /// its clonable [`Receiver`] handle.
    pub(crate) fn new(
        loc: Loc,
        reset_value: Option<Value>,
        setup: &SetupFn,
        engine: &EngineCtx,
    ) -> Self {
        let receiver = Receiver::new(engine.trigger.clone());
        setup(receiver.clone());
        Self {
            loc,
            reset_value,
            receiver,
        }
    }

    pub(crate) fn tick(&mut self) -> TickResult {
        if let Some(value) = self.receiver.take_value() {
            self.loc.set(value);
        } else if let Some(reset) = &self.reset_value {
            self.loc.set(reset.clone());
        }
        if self.receiver.is_done() {
            TickResult::Done
        } else {
            TickResult::Wait
        }
    }
}
