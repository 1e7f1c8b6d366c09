mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use lockstep_engine::Processor;
use lockstep_lang::builder::{receive, receive_with_reset};
use lockstep_lang::{Loc, Receiver, TickResult, Value};

use common::{main_module, main_processor, tick};

/// A `Main` that receives into `target`, handing the producer handle out
/// through `handle`.
fn receiving_processor(
    target: Loc,
    handle: Arc<Mutex<Option<Receiver>>>,
    reset_value: Option<Value>,
) -> Processor {
    let module = main_module(move |_| {
        let target = target.clone();
        let handle = handle.clone();
        let stmt = match reset_value.clone() {
            None => receive(move || target.clone(), move |r| *handle.lock() = Some(r)),
            Some(reset) => receive_with_reset(
                move || target.clone(),
                reset,
                move |r| *handle.lock() = Some(r),
            ),
        };
        vec![stmt]
    });
    main_processor(module)
}

fn producer(handle: &Arc<Mutex<Option<Receiver>>>) -> Receiver {
    handle.lock().clone().expect("setup ran on the first tick")
}

#[test]
fn test_posted_value_lands_on_the_next_tick() {
    let cell = Loc::direct(Value::Nil);
    let handle = Arc::new(Mutex::new(None));
    let mut p = receiving_processor(cell.clone(), handle.clone(), None);

    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(cell.get(), Value::Nil);

    let r = producer(&handle);
    r.post_value(5);
    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(cell.get(), Value::Int(5));

    r.post_value(6);
    r.post_done();
    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(cell.get(), Value::Int(6));
}

#[test]
fn test_value_persists_across_empty_ticks() {
    let cell = Loc::direct(Value::Nil);
    let handle = Arc::new(Mutex::new(None));
    let mut p = receiving_processor(cell.clone(), handle.clone(), None);

    tick(&mut p);
    producer(&handle).post_value(5);
    tick(&mut p);
    assert_eq!(cell.get(), Value::Int(5));

    // Nothing posted: the target keeps its value.
    tick(&mut p);
    assert_eq!(cell.get(), Value::Int(5));
}

#[test]
fn test_reset_value_written_on_empty_ticks() {
    let cell = Loc::direct(Value::Nil);
    let handle = Arc::new(Mutex::new(None));
    let mut p = receiving_processor(cell.clone(), handle.clone(), Some(Value::Int(0)));

    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(cell.get(), Value::Int(0));

    producer(&handle).post_value(7);
    tick(&mut p);
    assert_eq!(cell.get(), Value::Int(7));

    tick(&mut p);
    assert_eq!(cell.get(), Value::Int(0));
}

#[test]
fn test_posts_between_ticks_collapse_to_the_last() {
    let cell = Loc::direct(Value::Nil);
    let handle = Arc::new(Mutex::new(None));
    let mut p = receiving_processor(cell.clone(), handle.clone(), None);

    tick(&mut p);
    let r = producer(&handle);
    r.post_value(1);
    r.post_value(2);
    r.post_value(3);
    tick(&mut p);
    assert_eq!(cell.get(), Value::Int(3));
}

#[test]
fn test_react_invokes_the_installed_trigger() {
    let cell = Loc::direct(Value::Nil);
    let handle = Arc::new(Mutex::new(None));
    let mut p = receiving_processor(cell.clone(), handle.clone(), None);

    let pinged = Arc::new(AtomicUsize::new(0));
    let observed = pinged.clone();
    p.set_react_trigger(move || {
        observed.fetch_add(1, Ordering::SeqCst);
    });

    tick(&mut p);
    let r = producer(&handle);
    r.post_value(1);
    r.react();
    assert_eq!(pinged.load(Ordering::SeqCst), 1);

    // The driver decides what to do with the request; here it just ticks.
    tick(&mut p);
    assert_eq!(cell.get(), Value::Int(1));
}
