mod common;

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use lockstep_engine::ModuleExt;
use lockstep_lang::builder::{exec, exit_with, pause, run_with_result};
use lockstep_lang::{Activity, EngineError, Module, TickResult, Value};

use common::{main_module, main_processor, tick};

#[test]
fn test_missing_entry_activity_is_an_error() {
    let module = Module::new(vec![]);
    assert!(matches!(
        module.processor(),
        Err(EngineError::ActivityNotFound(name)) if name == "Main"
    ));
}

#[test]
fn test_alternate_entry_point() {
    let aux = Activity::new("Aux", &[], &[], |_| vec![exit_with(|| Value::Int(3))]);
    let module = Module::new(vec![aux]);

    assert!(module.processor().is_err());

    let mut p = module.processor_at("Aux").unwrap();
    match tick(&mut p) {
        TickResult::Result(v) => assert_eq!(v, Value::Int(3)),
        other => panic!("expected a result, got {other:?}"),
    }
}

#[test]
fn test_imported_activities_are_runnable() {
    let lib = Module::new(vec![Activity::new("Seven", &[], &[], |_| {
        vec![exit_with(|| Value::Int(7))]
    })]);

    let got = Arc::new(Mutex::new(None));
    let sink = got.clone();
    let main = Activity::new("Main", &[], &[], move |_| {
        let sink = sink.clone();
        vec![run_with_result("Seven", Vec::new, move |v| {
            *sink.lock() = Some(v)
        })]
    });
    let module = Module::with_imports(vec![main], vec![lib]);

    let mut p = module.processor().unwrap();
    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(*got.lock(), Some(Value::Int(7)));
}

#[test]
fn test_signal_presence_resets_each_tick() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    let module = main_module(move |ctx| {
        let emitter = ctx.clone();
        let first = sink.clone();
        let checker = ctx.clone();
        let second = sink.clone();
        vec![
            exec(move || {
                emitter.emit("s");
                first.lock().push(emitter.present("s"));
            }),
            pause(),
            exec(move || second.lock().push(checker.present("s"))),
        ]
    });
    let mut p = main_processor(module);

    assert_eq!(tick(&mut p), TickResult::Wait);
    // Present in the tick it was emitted, absent in the next.
    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(*observed.lock(), vec![true, false]);
}

#[test]
fn test_previous_tick_values_are_snapshotted() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    let module = main_module(move |ctx| {
        let writer = ctx.clone();
        let mid = ctx.clone();
        let mid_sink = sink.clone();
        let last = ctx.clone();
        let last_sink = sink.clone();
        vec![
            exec(move || writer.set("x", 1)),
            pause(),
            exec(move || {
                mid_sink.lock().push(mid.prev("x"));
                mid.set("x", 2);
            }),
            pause(),
            exec(move || last_sink.lock().push(last.prev("x"))),
        ]
    });
    let mut p = main_processor(module);

    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(tick(&mut p), TickResult::Wait);
    assert_eq!(tick(&mut p), TickResult::Done);
    assert_eq!(*observed.lock(), vec![Value::Int(1), Value::Int(2)]);
}
