//! Integration test: the background stepper advances while playing,
//! halts on pause, and hands the simulator back on shutdown.

use std::thread;
use std::time::{Duration, Instant};

use cosmos_core::Coord;
use cosmos_engine::{EngineConfig, RealtimeUniverse};
use cosmos_space::Rect;

fn config() -> EngineConfig {
    EngineConfig {
        seed: Some(404),
        big_bang_delay: 2,
        tick_base_ms: 1,
        idle_poll_ms: 1,
        default_speed: 6,
        ..EngineConfig::default()
    }
}

fn latest_time(rt: &RealtimeUniverse) -> u64 {
    rt.latest_snapshot().map_or(0, |s| s.time_step)
}

fn wait_until(rt: &RealtimeUniverse, mut f: impl FnMut(&RealtimeUniverse) -> bool) -> bool {
    let end = Instant::now() + Duration::from_secs(10);
    while Instant::now() < end {
        if f(rt) {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

#[test]
fn stepper_advances_and_pauses() {
    let mut rt = RealtimeUniverse::spawn(config()).unwrap();
    assert_eq!(latest_time(&rt), 0);

    rt.play();
    assert!(wait_until(&rt, |rt| latest_time(rt) > 5), "stepper never advanced");
    assert!(rt.latest_snapshot().unwrap().grid.len() > 1);

    rt.pause();
    // Let any in-flight step publish before sampling.
    thread::sleep(Duration::from_millis(50));
    let paused_at = latest_time(&rt);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(latest_time(&rt), paused_at);
    assert!(!rt.latest_snapshot().unwrap().running);

    let report = rt.shutdown();
    assert!(report.stepper_joined);
    assert!(report.snapshots_published > 1);
}

#[test]
fn recovered_simulator_matches_the_last_snapshot() {
    let rt = RealtimeUniverse::spawn(config()).unwrap();
    rt.play();
    assert!(wait_until(&rt, |rt| latest_time(rt) > 3));
    rt.pause();
    thread::sleep(Duration::from_millis(50));
    let snap = rt.latest_snapshot().unwrap();

    let sim = rt.into_simulator().unwrap();
    assert_eq!(sim.time_step(), snap.time_step);
    assert_eq!(sim.grid(), &*snap.grid);
}

#[test]
fn region_queries_read_the_latest_snapshot() {
    let rt = RealtimeUniverse::spawn(config()).unwrap();
    rt.play();
    assert!(wait_until(&rt, |rt| latest_time(rt) > 2));
    rt.pause();

    let hits = rt.query_region(&Rect::new(-0.5, -0.5, 1.0, 1.0));
    assert_eq!(hits, vec![Coord::ORIGIN]);
    let snap = rt.latest_snapshot().unwrap();
    let everything = snap.query_region(&Rect::centred(0.0, 0.0, 1_000.0));
    assert_eq!(everything.len(), snap.index.len());
}

#[test]
fn speed_changes_are_visible_in_snapshots() {
    let rt = RealtimeUniverse::spawn(config()).unwrap();
    assert!(!rt.set_speed(42));
    assert!(rt.set_speed(4));
    rt.play();
    assert!(wait_until(&rt, |rt| rt
        .latest_snapshot()
        .is_some_and(|s| s.speed == 4 && s.time_step > 0)));
}
