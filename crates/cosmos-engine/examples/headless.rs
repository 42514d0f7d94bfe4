//! Cosmos headless run: step a universe by hand and print its progress.
//!
//! Demonstrates:
//!   1. Building a UniverseSimulator from an EngineConfig
//!   2. Driving steps through the dormant period and the big bang
//!   3. Reading step metrics and bodies from the current grid
//!   4. Saving the universe as JSON and restoring it
//!
//! Run with:
//!   cargo run --example headless

use cosmos_core::Coord;
use cosmos_engine::{grid_hash, EngineConfig, SavedUniverse, StepOutcome, UniverseSimulator};
use cosmos_space::Rect;

// ─── Parameters ─────────────────────────────────────────────────

const SEED: u64 = 42;
const STEPS: usize = 80;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Cosmos Headless Example ===\n");

    let config = EngineConfig {
        seed: Some(SEED),
        big_bang_delay: 20,
        max_grid_span: 60,
        start_running: true,
        ..EngineConfig::default()
    };
    let mut sim = UniverseSimulator::new(config.clone())?;
    println!("Universe seed {}, big bang after {} steps\n", sim.seed(), config.big_bang_delay);

    for _ in 0..STEPS {
        let outcome = sim.step();
        let m = sim.last_metrics();
        match outcome {
            StepOutcome::Dormant => {}
            StepOutcome::BigBang => println!("t={:>4}  big bang", sim.time_step()),
            StepOutcome::Expanded | StepOutcome::Frozen => println!(
                "t={:>4}  {:<18} r={:<3} cells={:<6} dropped={:.3}{}",
                sim.time_step(),
                sim.phase().to_string(),
                m.radius,
                m.cells_after,
                m.density_dropped,
                if m.frozen { "  (frozen)" } else { "" },
            ),
            StepOutcome::Paused => break,
        }
    }

    // Bodies near the origin.
    let snapshot = sim.snapshot();
    let near = snapshot.cells_in(&Rect::centred(0.0, 0.0, 5.0));
    let bodies: usize = near.iter().map(|cell| cell.bodies().len()).sum();
    println!("\n{} cells within 2 of the origin hold {} bodies", near.len(), bodies);
    if let Some(cell) = sim.grid().get(Coord::ORIGIN) {
        for body in cell.bodies() {
            let style = body.render_style();
            println!("  origin: {:?} drawn in {:?}", body.kind(), style.color);
        }
    }

    // Save and restore.
    let mut buf = Vec::new();
    sim.save().save_json(&mut buf)?;
    println!("\nSaved {} bytes, grid hash {:#018x}", buf.len(), grid_hash(sim.grid()));
    let restored = UniverseSimulator::restore(config, SavedUniverse::load_json(buf.as_slice())?)?;
    println!(
        "Restored at t={} with {} cells",
        restored.time_step(),
        restored.grid().len()
    );

    Ok(())
}
