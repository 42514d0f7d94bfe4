//! Decorative celestial bodies placed inside cells.
//!
//! Bodies are generated once, when a cell is constructed with a seed, and
//! never mutated afterwards. Generation draws from a private ChaCha8
//! stream derived from `seed XOR coord_hash(coord)`, so it is a pure
//! function of the seed, the coordinate, and the cell's initial density
//! and temperature. It never touches the engine's generator.

use crate::coord::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

/// Upper bound on bodies generated for one cell.
pub const MAX_BODIES_PER_CELL: usize = 4;

/// Inline storage for a cell's bodies.
pub type BodyList = SmallVec<[CelestialBody; 2]>;

/// Absolute position of a body: the owning cell's coordinate plus a
/// sub-cell offset in `[0, 1)` on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPosition {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// Bulk composition of small bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Composition {
    /// Silicate rock.
    Rocky,
    /// Iron-nickel.
    Metallic,
    /// Volatile ices.
    Icy,
}

/// A decorative celestial body.
///
/// `Planet::star` and `Moon::planet` are indices into the owning cell's
/// body list, always pointing at an earlier entry.
#[derive(Clone, Debug, PartialEq)]
pub enum CelestialBody {
    /// Diffuse gas cloud.
    Nebula {
        /// Where the body sits.
        position: BodyPosition,
        /// Extent of the cloud.
        size: f64,
        /// Density of the host cell at generation time.
        density: f64,
    },
    /// A star.
    Star {
        /// Where the body sits.
        position: BodyPosition,
        /// Stellar mass.
        mass: f64,
        /// Surface temperature, taken from the host cell.
        temperature: f64,
    },
    /// A planet orbiting a star in the same cell.
    Planet {
        /// Where the body sits.
        position: BodyPosition,
        /// Index of the parent star in the cell's body list.
        star: usize,
        /// Orbital distance from the parent.
        distance: f64,
        /// Planet radius.
        size: f64,
        /// Whether the planet holds an atmosphere.
        atmosphere: bool,
    },
    /// A moon orbiting a planet in the same cell.
    Moon {
        /// Where the body sits.
        position: BodyPosition,
        /// Index of the parent planet in the cell's body list.
        planet: usize,
        /// Orbital distance from the parent.
        distance: f64,
        /// Moon radius.
        size: f64,
    },
    /// A small rocky or metallic body.
    Asteroid {
        /// Where the body sits.
        position: BodyPosition,
        /// Body radius.
        size: f64,
        /// Bulk composition.
        composition: Composition,
    },
    /// An icy wanderer on a long orbit.
    Comet {
        /// Where the body sits.
        position: BodyPosition,
        /// Nucleus radius.
        size: f64,
        /// Bulk composition.
        composition: Composition,
        /// Orbital period, in time steps.
        orbit: f64,
    },
    /// A collapsed remnant.
    BlackHole {
        /// Where the body sits.
        position: BodyPosition,
        /// Remnant mass.
        mass: f64,
    },
    /// A whole galaxy, seen from far away.
    Galaxy {
        /// Where the body sits.
        position: BodyPosition,
        /// Apparent extent.
        size: f64,
    },
}

/// Variant tag of a [`CelestialBody`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyKind {
    /// See [`CelestialBody::Nebula`].
    Nebula,
    /// See [`CelestialBody::Star`].
    Star,
    /// See [`CelestialBody::Planet`].
    Planet,
    /// See [`CelestialBody::Moon`].
    Moon,
    /// See [`CelestialBody::Asteroid`].
    Asteroid,
    /// See [`CelestialBody::Comet`].
    Comet,
    /// See [`CelestialBody::BlackHole`].
    BlackHole,
    /// See [`CelestialBody::Galaxy`].
    Galaxy,
}

/// How the rendering collaborator should draw a body kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    /// RGB fill colour.
    pub color: [u8; 3],
    /// Marker radius in cell units.
    pub radius: f32,
}

/// Render parameters indexed by `BodyKind as usize`.
const RENDER_TABLE: [RenderStyle; 8] = [
    RenderStyle { color: [150, 90, 200], radius: 0.45 },
    RenderStyle { color: [255, 230, 120], radius: 0.30 },
    RenderStyle { color: [80, 160, 220], radius: 0.15 },
    RenderStyle { color: [200, 200, 200], radius: 0.08 },
    RenderStyle { color: [140, 120, 100], radius: 0.06 },
    RenderStyle { color: [180, 240, 255], radius: 0.07 },
    RenderStyle { color: [20, 0, 30], radius: 0.25 },
    RenderStyle { color: [240, 220, 255], radius: 0.50 },
];

impl BodyKind {
    /// All kinds, in dispatch-table order.
    pub const ALL: [BodyKind; 8] = [
        BodyKind::Nebula,
        BodyKind::Star,
        BodyKind::Planet,
        BodyKind::Moon,
        BodyKind::Asteroid,
        BodyKind::Comet,
        BodyKind::BlackHole,
        BodyKind::Galaxy,
    ];

    /// Render parameters for this kind.
    pub fn render_style(self) -> RenderStyle {
        RENDER_TABLE[self as usize]
    }
}

impl CelestialBody {
    /// The variant tag.
    pub fn kind(&self) -> BodyKind {
        match self {
            Self::Nebula { .. } => BodyKind::Nebula,
            Self::Star { .. } => BodyKind::Star,
            Self::Planet { .. } => BodyKind::Planet,
            Self::Moon { .. } => BodyKind::Moon,
            Self::Asteroid { .. } => BodyKind::Asteroid,
            Self::Comet { .. } => BodyKind::Comet,
            Self::BlackHole { .. } => BodyKind::BlackHole,
            Self::Galaxy { .. } => BodyKind::Galaxy,
        }
    }

    /// Where the body sits.
    pub fn position(&self) -> BodyPosition {
        match self {
            Self::Nebula { position, .. }
            | Self::Star { position, .. }
            | Self::Planet { position, .. }
            | Self::Moon { position, .. }
            | Self::Asteroid { position, .. }
            | Self::Comet { position, .. }
            | Self::BlackHole { position, .. }
            | Self::Galaxy { position, .. } => *position,
        }
    }

    /// Render parameters, via the kind dispatch table.
    pub fn render_style(&self) -> RenderStyle {
        self.kind().render_style()
    }
}

/// Mix a coordinate into a 64-bit value (splitmix64 finaliser).
pub fn coord_hash(c: Coord) -> u64 {
    let packed = (u64::from(c.x as u32) << 32) | u64::from(c.y as u32);
    let mut z = packed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn place(rng: &mut ChaCha8Rng, at: Coord) -> BodyPosition {
    BodyPosition {
        x: f64::from(at.x) + rng.gen::<f64>(),
        y: f64::from(at.y) + rng.gen::<f64>(),
    }
}

fn composition(rng: &mut ChaCha8Rng) -> Composition {
    match rng.gen_range(0..3u8) {
        0 => Composition::Rocky,
        1 => Composition::Metallic,
        _ => Composition::Icy,
    }
}

/// Generate the decorative bodies for a freshly constructed cell.
///
/// Every rule draws its chance roll unconditionally, so the stream
/// position of later rules does not depend on earlier outcomes.
pub fn generate_bodies(seed: u64, at: Coord, density: f64, temperature: f64) -> BodyList {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ coord_hash(at));
    let mut bodies = BodyList::new();

    let star_roll: f64 = rng.gen();
    if temperature > 5000.0 && density > 5.0 && star_roll < 0.10 {
        let position = place(&mut rng, at);
        bodies.push(CelestialBody::Star {
            position,
            mass: rng.gen_range(0.5..50.0),
            temperature,
        });
        let star = bodies.len() - 1;

        if rng.gen::<f64>() < 0.30 {
            let position = place(&mut rng, at);
            bodies.push(CelestialBody::Planet {
                position,
                star,
                distance: rng.gen_range(0.05..0.5),
                size: rng.gen_range(0.1..2.0),
                atmosphere: rng.gen_bool(0.5),
            });
            let planet = bodies.len() - 1;

            if rng.gen::<f64>() < 0.20 {
                let position = place(&mut rng, at);
                bodies.push(CelestialBody::Moon {
                    position,
                    planet,
                    distance: rng.gen_range(0.01..0.05),
                    size: rng.gen_range(0.01..0.5),
                });
            }
        }
    }

    let nebula_roll: f64 = rng.gen();
    if temperature < 3000.0 && density > 2.0 && nebula_roll < 0.05 {
        push_capped(&mut bodies, &mut rng, |rng| CelestialBody::Nebula {
            position: place(rng, at),
            size: rng.gen_range(5.0..15.0),
            density,
        });
    }

    let asteroid_roll: f64 = rng.gen();
    if temperature < 500.0 && density > 0.5 && asteroid_roll < 0.05 {
        push_capped(&mut bodies, &mut rng, |rng| CelestialBody::Asteroid {
            position: place(rng, at),
            size: rng.gen_range(0.001..0.1),
            composition: composition(rng),
        });
    }

    let comet_roll: f64 = rng.gen();
    if temperature < 100.0 && comet_roll < 0.02 {
        push_capped(&mut bodies, &mut rng, |rng| CelestialBody::Comet {
            position: place(rng, at),
            size: rng.gen_range(0.001..0.05),
            composition: Composition::Icy,
            orbit: rng.gen_range(50.0..5000.0),
        });
    }

    let hole_roll: f64 = rng.gen();
    if density > 8.0 && hole_roll < 0.01 {
        push_capped(&mut bodies, &mut rng, |rng| CelestialBody::BlackHole {
            position: place(rng, at),
            mass: rng.gen_range(5.0..100.0),
        });
    }

    let galaxy_roll: f64 = rng.gen();
    if density > 9.5 && temperature > 9000.0 && galaxy_roll < 0.005 {
        push_capped(&mut bodies, &mut rng, |rng| CelestialBody::Galaxy {
            position: place(rng, at),
            size: rng.gen_range(10.0..100.0),
        });
    }

    bodies
}

fn push_capped(
    bodies: &mut BodyList,
    rng: &mut ChaCha8Rng,
    make: impl FnOnce(&mut ChaCha8Rng) -> CelestialBody,
) {
    if bodies.len() < MAX_BODIES_PER_CELL {
        bodies.push(make(rng));
    }
}
