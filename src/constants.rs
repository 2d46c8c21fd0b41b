//! Centralised simulation constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::UniverseConfig::default`] reads its defaults from this file.

// ── Host Buffer ───────────────────────────────────────────────────────────────

/// Number of `f32` fields per atom in the shared host buffer:
/// `x, y, vx, vy, color`.
///
/// The page indexes the buffer as `atoms[i * FIELDS_PER_ATOM + k]`, so this
/// must stay in sync with `FIELDS_PER_ATOM` in the JavaScript.
pub const FIELDS_PER_ATOM: usize = 5;

/// Greeting logged once when the module is instantiated.
pub const GREETING: &str = "Hello from the particle-life wasm module!";

// ── World Bounds ──────────────────────────────────────────────────────────────

/// Default world width (canvas pixels).
pub const DEFAULT_WIDTH: f32 = 800.0;

/// Default world height (canvas pixels).
pub const DEFAULT_HEIGHT: f32 = 600.0;

// ── Population ────────────────────────────────────────────────────────────────

/// Default number of color groups. The page's palette has seven entries.
pub const DEFAULT_NUM_COLORS: u32 = 6;

/// Default atoms per color group.
pub const DEFAULT_ATOMS_PER_COLOR: u32 = 500;

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Interaction radius assigned to every color by [`crate::rules::Rules::random`].
pub const DEFAULT_RADIUS: f32 = 80.0;

/// Upper bound for radii picked by an exploration mutation.
///
/// `radius = 1 + floor(r * MAX_RADIUS)`, so mutated radii fall in `[1, 200]`.
pub const MAX_RADIUS: f32 = 200.0;

/// Probability that an exploration step mutates a strength rather than a radius.
pub const EXPLORE_STRENGTH_PROBABILITY: f32 = 0.8;

// ── Physics: Integration ──────────────────────────────────────────────────────

/// Fraction of velocity removed each tick. Velocity keeps `1 - VISCOSITY`.
///
/// Values near 1.0 make the system overdamped and nearly frozen; values near
/// 0.0 let energy accumulate and clusters fly apart.
pub const DEFAULT_VISCOSITY: f32 = 0.7;

/// Largest accepted viscosity.
///
/// Above 1.0 the kept fraction `1 - viscosity` turns negative, so velocity
/// flips direction every tick and the system jitters in place. Past 2.0 its
/// magnitude exceeds 1 and velocities grow without bound.
pub const MAX_VISCOSITY: f32 = 2.0;

/// Scale applied to the summed force before it is added to velocity.
pub const DEFAULT_TIME_SCALE: f32 = 0.2;

/// Constant downward pull added to every atom's force each tick.
pub const DEFAULT_GRAVITY: f32 = 0.0;

// ── Physics: Walls ────────────────────────────────────────────────────────────

/// Width of the band along each wall inside which atoms are pushed inward.
/// Only used when the world is not a toroid.
pub const DEFAULT_WALL_REPEL: f32 = 40.0;

/// Force per unit of penetration into the wall band.
pub const WALL_REPEL_STRENGTH: f32 = 0.1;

// ── Physics: Short-Range Repulsion ────────────────────────────────────────────

/// Distance below which "real forces" replace the color rule with a universal
/// repulsion, keeping atoms from collapsing onto one point.
pub const CORE_RADIUS: f32 = 20.0;

/// Peak repulsion at zero distance when "real forces" are enabled.
pub const CORE_REPULSION: f32 = 1.0;
