//! Cosmos realtime run: a universe stepping on its own thread.
//!
//! Demonstrates:
//!   1. Spawning a RealtimeUniverse from an EngineConfig
//!   2. Reading snapshots while the stepper runs
//!   3. Changing speed, pausing, and focusing a cell
//!   4. Shutting down and recovering the simulator
//!
//! Run with:
//!   cargo run --example realtime

use std::thread;
use std::time::Duration;

use cosmos_core::Coord;
use cosmos_engine::{EngineConfig, RealtimeUniverse};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Cosmos Realtime Example ===\n");

    let config = EngineConfig {
        seed: Some(7),
        big_bang_delay: 10,
        tick_base_ms: 5,
        ..EngineConfig::default()
    };
    let rt = RealtimeUniverse::spawn(config)?;
    rt.set_speed(6);
    rt.play();

    for _ in 0..5 {
        thread::sleep(Duration::from_millis(100));
        if let Some(snap) = rt.latest_snapshot() {
            println!(
                "t={:>5}  {:<18} speed={} cells={}",
                snap.time_step,
                snap.phase.to_string(),
                snap.speed,
                snap.grid.len()
            );
        }
    }

    rt.pause();
    rt.open_cell_view(Coord::new(1, 0));
    thread::sleep(Duration::from_millis(50));
    if let Some(cell) = rt.latest_snapshot().as_deref().and_then(|s| s.focused_cell().cloned()) {
        println!(
            "\nFocused {}: density {:.3}, temperature {:.1}, {} bodies",
            cell.coord(),
            cell.density,
            cell.temperature,
            cell.bodies().len()
        );
    }

    let sim = rt
        .into_simulator()
        .ok_or("stepper thread panicked")?;
    println!("\nRecovered simulator: {sim:?}");
    Ok(())
}
