//! Benchmark profiles for the Cosmos universe simulator.
//!
//! - [`reference_profile`]: default span, big bang on the first step
//! - [`stress_profile`]: a larger span with the ceiling out of reach
//! - [`grown_simulator`]: a simulator already stepped `n` times

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cosmos_engine::{ConfigError, EngineConfig, UniverseSimulator};

/// Default settings with a fixed seed, playing, and no dormant delay.
pub fn reference_profile(seed: u64) -> EngineConfig {
    EngineConfig {
        seed: Some(seed),
        big_bang_delay: 0,
        start_running: true,
        ..EngineConfig::default()
    }
}

/// A 1000-wide span, for long growth runs.
pub fn stress_profile(seed: u64) -> EngineConfig {
    EngineConfig {
        max_grid_span: 1_000,
        ..reference_profile(seed)
    }
}

/// Build a simulator from `config` and step it `steps` times.
pub fn grown_simulator(config: EngineConfig, steps: usize) -> Result<UniverseSimulator, ConfigError> {
    let mut sim = UniverseSimulator::new(config)?;
    for _ in 0..steps {
        sim.step();
    }
    Ok(sim)
}
