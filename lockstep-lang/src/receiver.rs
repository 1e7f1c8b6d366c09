use std::sync::Arc;

use parking_lot::Mutex;

use crate::value::Value;

/// Callback an external driver registers so `Receiver::react` can request
/// an immediate extra reaction.
pub type ReactTrigger = Arc<dyn Fn() + Send + Sync>;

/// Shared slot holding the driver's trigger, if one was installed.
pub type TriggerSlot = Arc<Mutex<Option<ReactTrigger>>>;

#[derive(Default)]
struct Inbox {
    value: Option<Value>,
    done: bool,
}

/// Handle passed to the setup callback of a `receive` statement.
///
/// The external producer may clone it and call it from any thread. Posts
/// land in a locked inbox and are observed only when the receive
/// statement next ticks — never mid-tick — so a burst of posts between
/// two reactions collapses to the last value.
#[derive(Clone)]
pub struct Receiver {
    inbox: Arc<Mutex<Inbox>>,
    trigger: TriggerSlot,
}

impl Receiver {
    /// Constructed by the engine when a receive statement first ticks.
    pub fn new(trigger: TriggerSlot) -> Self {
        Self {
            inbox: Arc::new(Mutex::new(Inbox::default())),
            trigger,
        }
    }

    /// Deliver a value for the next reaction.
    pub fn post_value(&self, value: impl Into<Value>) {
        self.inbox.lock().value = Some(value.into());
    }

    /// Mark the source exhausted; the receive statement completes on its
    /// next tick.
    pub fn post_done(&self) {
        self.inbox.lock().done = true;
    }

    /// Ask the external driver for an immediate extra reaction, if one
    /// registered a trigger. Pumping ticks is the driver's concern, not
    /// the engine's.
    pub fn react(&self) {
        let trigger = self.trigger.lock().clone();
        if let Some(t) = trigger {
            t();
        }
    }

    /// Take the value delivered since the last tick, if any.
    pub fn take_value(&self) -> Option<Value> {
        self.inbox.lock().value.take()
    }

    pub fn is_done(&self) -> bool {
        self.inbox.lock().done
    }
}
