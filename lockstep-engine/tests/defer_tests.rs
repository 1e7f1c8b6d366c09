mod common;

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use lockstep_lang::builder::{
    arm, defer, exec, exit_with, forever, pause, repeat_until, run, select, when_abort,
};
use lockstep_lang::{Activity, Module, TickResult, Value};

use common::{main_module, main_processor, tick, Trace};

#[test]
fn test_defers_run_lifo_at_completion() {
    let trace = Trace::new();
    let t = trace.clone();
    let module = main_module(move |_| {
        let (a, b) = (t.clone(), t.clone());
        vec![
            defer(move || a.push("a")),
            defer(move || b.push("b")),
            pause(),
        ]
    });
    let mut p = main_processor(module);

    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(trace.events(), Vec::<String>::new());

    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(trace.events(), ["b", "a"].map(String::from));
}

#[test]
fn test_inner_block_defers_run_before_outer() {
    let trace = Trace::new();
    let t = trace.clone();
    let module = main_module(move |_| {
        let (outer, inner) = (t.clone(), t.clone());
        vec![
            defer(move || outer.push("outer")),
            select(vec![arm(
                || true,
                vec![defer(move || inner.push("inner")), pause()],
            )]),
        ]
    });
    let mut p = main_processor(module);

    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(trace.events(), ["inner", "outer"].map(String::from));
}

#[test]
fn test_exit_unwind_runs_defers() {
    let trace = Trace::new();
    let t = trace.clone();
    let module = main_module(move |_| {
        let t = t.clone();
        vec![
            defer(move || t.push("cleanup")),
            exit_with(|| Value::Int(42)),
        ]
    });
    let mut p = main_processor(module);

    match tick(&mut p) {
        TickResult::Result(v) => assert_eq!(v, Value::Int(42)),
        other => panic!("expected a result, got {other:?}"),
    }
    assert_eq!(trace.events(), ["cleanup"].map(String::from));
}

#[test]
fn test_abort_runs_nested_activity_defers_first() {
    let trigger = Arc::new(AtomicBool::new(false));
    let trace = Trace::new();

    let t = trace.clone();
    let child = Activity::new("Child", &[], &[], move |_| {
        let t = t.clone();
        vec![defer(move || t.push("d3")), forever(vec![pause()])]
    });
    let t = trace.clone();
    let cond = {
        let trigger = trigger.clone();
        move || trigger.load(Ordering::SeqCst)
    };
    let main = Activity::new("Main", &[], &[], move |_| {
        let (d1, d2) = (t.clone(), t.clone());
        let cond = cond.clone();
        vec![when_abort(
            cond,
            vec![
                defer(move || d1.push("d1")),
                defer(move || d2.push("d2")),
                run("Child", Vec::new),
            ],
        )]
    });
    let mut p = main_processor(Module::new(vec![main, child]));

    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(trace.events(), Vec::<String>::new());

    // Teardown cascades into the nested invocation before the local
    // stack drains.
    trigger.store(true, Ordering::SeqCst);
    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(trace.events(), ["d3", "d2", "d1"].map(String::from));
}

#[test]
fn test_loop_restart_drains_the_iteration_defers() {
    let count = Arc::new(AtomicI64::new(0));
    let trace = Trace::new();

    let inc = {
        let count = count.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    };
    let until = {
        let count = count.clone();
        move || count.load(Ordering::SeqCst) >= 2
    };
    let t = trace.clone();
    let module = main_module(move |_| {
        let t = t.clone();
        let inc = inc.clone();
        let until = until.clone();
        vec![repeat_until(
            vec![exec(inc), defer(move || t.push("iter")), pause()],
            until,
        )]
    });
    let mut p = main_processor(module);

    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(trace.events(), Vec::<String>::new());

    // First iteration's defer fires on the restart, second on teardown.
    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(trace.events(), ["iter"].map(String::from));

    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(trace.events(), ["iter", "iter"].map(String::from));
}
