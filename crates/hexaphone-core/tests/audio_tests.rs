// Timbre gating and gain rules of the audio bridge.

mod common;

use common::FakeEngine;
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use hexaphone_core::*;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

type Outcome = Rc<RefCell<Option<Result<(), AudioError>>>>;

fn spawn(pool: &LocalPool, fut: impl Future<Output = Result<(), AudioError>> + 'static) -> Outcome {
    let outcome: Outcome = Rc::default();
    let slot = outcome.clone();
    pool.spawner()
        .spawn_local(async move {
            *slot.borrow_mut() = Some(fut.await);
        })
        .expect("spawn");
    outcome
}

fn started() -> (FakeEngine, AudioBridge<FakeEngine>) {
    let engine = FakeEngine::default();
    let bridge = AudioBridge::new(engine.clone());
    block_on(bridge.start()).expect("start");
    (engine, bridge)
}

#[test]
fn trigger_before_start_is_refused() {
    let engine = FakeEngine::default();
    let bridge = AudioBridge::new(engine.clone());
    assert!(!bridge.is_started());
    assert_eq!(bridge.trigger(440.0, 1.0), Err(AudioError::NotStarted));
    assert!(engine.triggers().is_empty());
}

#[test]
fn basic_timbre_plays_once_started() {
    let (engine, bridge) = started();
    assert!(bridge.is_started());
    assert!(engine.state.borrow().started);
    assert_eq!(bridge.timbre(), Timbre::Basic);
    assert_eq!(bridge.load_state(Timbre::Basic), LoadState::Loaded);

    bridge.trigger(440.0, 1.0).expect("trigger");
    assert_eq!(engine.triggers(), vec![(440.0, 1.0, NOTE_DURATION_SEC)]);
}

#[test]
fn start_is_idempotent() {
    let (_engine, bridge) = started();
    assert_eq!(block_on(bridge.start()), Ok(()));
}

#[test]
fn sample_timbre_is_gated_until_loaded() {
    let mut pool = LocalPool::new();
    let (engine, bridge) = started();

    let outcome = spawn(&pool, bridge.set_timbre(Timbre::Piano));
    pool.run_until_stalled();

    // selected right away, but not playable yet
    assert_eq!(bridge.timbre(), Timbre::Piano);
    assert_eq!(engine.state.borrow().active, Timbre::Piano);
    assert_eq!(bridge.load_state(Timbre::Piano), LoadState::Loading);
    assert_eq!(
        bridge.trigger(440.0, 1.0),
        Err(AudioError::TimbreNotReady(Timbre::Piano))
    );
    assert!(outcome.borrow().is_none());

    engine.finish_load(Ok(()));
    pool.run_until_stalled();

    assert_eq!(*outcome.borrow(), Some(Ok(())));
    assert_eq!(bridge.load_state(Timbre::Piano), LoadState::Loaded);
    bridge.trigger(220.0, 0.8).expect("trigger");
    // sampled timbres use the intensity as is
    assert_eq!(engine.triggers(), vec![(220.0, 0.8, NOTE_DURATION_SEC)]);
}

#[test]
fn failed_load_can_be_retried() {
    let mut pool = LocalPool::new();
    let (engine, bridge) = started();

    let first = spawn(&pool, bridge.set_timbre(Timbre::Violin));
    pool.run_until_stalled();
    let failure = AudioError::LoadFailed {
        timbre: Timbre::Violin,
        reason: "404".into(),
    };
    engine.finish_load(Err(failure.clone()));
    pool.run_until_stalled();

    assert_eq!(*first.borrow(), Some(Err(failure)));
    assert_eq!(bridge.load_state(Timbre::Violin), LoadState::Failed);
    assert!(matches!(
        bridge.trigger(440.0, 1.0),
        Err(AudioError::TimbreNotReady(Timbre::Violin))
    ));

    let retry = spawn(&pool, bridge.load_timbre(Timbre::Violin));
    pool.run_until_stalled();
    engine.finish_load(Ok(()));
    pool.run_until_stalled();

    assert_eq!(*retry.borrow(), Some(Ok(())));
    assert!(bridge.trigger(440.0, 1.0).is_ok());
    assert_eq!(engine.state.borrow().load_calls, vec![Timbre::Violin, Timbre::Violin]);
}

#[test]
fn repeated_requests_share_one_load() {
    let mut pool = LocalPool::new();
    let (engine, bridge) = started();

    let first = spawn(&pool, bridge.set_timbre(Timbre::Piano));
    let second = spawn(&pool, bridge.set_timbre(Timbre::Piano));
    let third = spawn(&pool, bridge.load_timbre(Timbre::Piano));
    pool.run_until_stalled();
    assert_eq!(engine.state.borrow().load_calls, vec![Timbre::Piano]);

    engine.finish_load(Ok(()));
    pool.run_until_stalled();

    for outcome in [&first, &second, &third] {
        assert_eq!(*outcome.borrow(), Some(Ok(())));
    }
    assert_eq!(bridge.load_state(Timbre::Piano), LoadState::Loaded);
    assert!(engine.state.borrow().pending.is_empty());
    assert!(bridge.trigger(440.0, 1.0).is_ok());
}

#[test]
fn shared_load_failure_reaches_every_caller() {
    let mut pool = LocalPool::new();
    let (engine, bridge) = started();

    let first = spawn(&pool, bridge.set_timbre(Timbre::Harp));
    let second = spawn(&pool, bridge.set_timbre(Timbre::Harp));
    pool.run_until_stalled();
    let failure = AudioError::LoadFailed {
        timbre: Timbre::Harp,
        reason: "offline".into(),
    };
    engine.finish_load(Err(failure.clone()));
    pool.run_until_stalled();

    assert_eq!(*first.borrow(), Some(Err(failure.clone())));
    assert_eq!(*second.borrow(), Some(Err(failure)));
    assert_eq!(bridge.load_state(Timbre::Harp), LoadState::Failed);
    assert_eq!(engine.state.borrow().load_calls, vec![Timbre::Harp]);
}

#[test]
fn loaded_timbres_are_not_fetched_again() {
    let mut pool = LocalPool::new();
    let (engine, bridge) = started();

    spawn(&pool, bridge.set_timbre(Timbre::Harp));
    pool.run_until_stalled();
    engine.finish_load(Ok(()));
    pool.run_until_stalled();

    spawn(&pool, bridge.set_timbre(Timbre::Basic));
    let again = spawn(&pool, bridge.set_timbre(Timbre::Harp));
    pool.run_until_stalled();

    assert_eq!(*again.borrow(), Some(Ok(())));
    assert_eq!(engine.state.borrow().load_calls, vec![Timbre::Harp]);
}

#[test]
fn switching_back_to_basic_plays_immediately() {
    let mut pool = LocalPool::new();
    let (engine, bridge) = started();

    spawn(&pool, bridge.set_timbre(Timbre::Saxophone));
    pool.run_until_stalled();
    assert!(bridge.trigger(440.0, 1.0).is_err());

    let basic = spawn(&pool, bridge.set_timbre(Timbre::Basic));
    pool.run_until_stalled();
    assert_eq!(*basic.borrow(), Some(Ok(())));
    assert!(bridge.trigger(440.0, 1.0).is_ok());
    // the saxophone load is still pending in the background
    assert_eq!(bridge.load_state(Timbre::Saxophone), LoadState::Loading);
    assert_eq!(engine.state.borrow().active, Timbre::Basic);
}

#[test]
fn basic_gain_compensates_low_notes() {
    assert_eq!(basic_gain(440.0), 1.0);
    assert_eq!(basic_gain(220.0), 2.0);
    assert_eq!(basic_gain(110.0), 4.0);
    assert_eq!(basic_gain(27.5), BASIC_GAIN_MAX);
    assert_eq!(basic_gain(8800.0), BASIC_GAIN_MIN);
    assert_eq!(basic_gain(0.0), BASIC_GAIN_MIN);
}

#[test]
fn intensity_is_clamped_and_scales_gain() {
    let (engine, bridge) = started();
    bridge.trigger(220.0, 0.5).expect("trigger");
    bridge.trigger(440.0, 3.0).expect("trigger");
    bridge.trigger(440.0, -1.0).expect("trigger");
    let gains: Vec<f32> = engine.triggers().iter().map(|t| t.1).collect();
    assert_eq!(gains, vec![1.0, 1.0, 0.0]);
}
