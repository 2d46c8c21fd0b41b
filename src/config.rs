//! Universe configuration, loadable from TOML.
//!
//! [`UniverseConfig`] mirrors the defaults in [`crate::constants`]. Missing
//! keys fall back to those defaults, so a minimal TOML can override just the
//! values you care about:
//!
//! ```toml
//! num_colors = 4
//! atoms_per_color = 300
//! seed = 3762108977281
//! toroid = false
//! ```
//!
//! The host page builds the same struct through the `Universe` constructor and
//! setters; the headless runner reads it from `assets/universe.toml`.

use crate::constants::*;
use crate::error::{validate_extent, validate_range, SimError, SimResult};
use serde::Deserialize;
use std::path::Path;

/// Runtime-tunable simulation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    // ── World ────────────────────────────────────────────────────────────────
    pub width: f32,
    pub height: f32,
    pub toroid: bool,

    // ── Population ───────────────────────────────────────────────────────────
    pub num_colors: u32,
    pub atoms_per_color: u32,
    /// Seed for atom placement and random rules; `None` draws from entropy.
    pub seed: Option<u64>,

    // ── Physics ──────────────────────────────────────────────────────────────
    pub viscosity: f32,
    pub time_scale: f32,
    pub gravity: f32,
    pub wall_repel: f32,
    pub real_forces: bool,

    // ── Rules ────────────────────────────────────────────────────────────────
    pub symmetric_rules: bool,
    /// Row-major `num_colors²` strengths; empty means random.
    pub rules: Vec<f32>,
    /// One radius per color; empty means [`DEFAULT_RADIUS`] for all.
    pub radii: Vec<f32>,

    // ── Diagnostics ──────────────────────────────────────────────────────────
    pub debug: bool,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            // World
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            toroid: true,
            // Population
            num_colors: DEFAULT_NUM_COLORS,
            atoms_per_color: DEFAULT_ATOMS_PER_COLOR,
            seed: None,
            // Physics
            viscosity: DEFAULT_VISCOSITY,
            time_scale: DEFAULT_TIME_SCALE,
            gravity: DEFAULT_GRAVITY,
            wall_repel: DEFAULT_WALL_REPEL,
            real_forces: true,
            // Rules
            symmetric_rules: false,
            rules: Vec::new(),
            radii: Vec::new(),
            // Diagnostics
            debug: false,
        }
    }
}

impl UniverseConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(src: &str) -> SimResult<Self> {
        Ok(toml::from_str::<UniverseConfig>(src)?)
    }

    /// Read `path` and parse it, falling back to defaults.
    ///
    /// A missing file is not an error. A parse error is logged and also
    /// falls back, so a typo never stops the simulation from starting.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(loaded) => {
                    log::info!("loaded universe config from {}", path.display());
                    loaded
                }
                Err(e) => {
                    log::warn!("failed to parse {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no {} found; using compiled defaults", path.display());
                Self::default()
            }
        }
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> SimResult<()> {
        validate_extent("width", self.width)?;
        validate_extent("height", self.height)?;
        if self.num_colors == 0 {
            return Err(SimError::InvalidArgument {
                name: "num_colors",
                value: 0.0,
                expected: "at least one color",
            });
        }
        validate_range("viscosity", self.viscosity, 0.0, MAX_VISCOSITY, "a value in [0, 2]")?;
        validate_range("time_scale", self.time_scale, 0.0, f32::MAX, "a finite value >= 0")?;
        validate_range("wall_repel", self.wall_repel, 0.0, f32::MAX, "a finite value >= 0")?;
        validate_range("gravity", self.gravity, f32::MIN, f32::MAX, "a finite value")?;

        let n = self.num_colors as usize;
        if !self.rules.is_empty() && self.rules.len() != n * n {
            return Err(SimError::RuleShape {
                what: "rules",
                expected: n * n,
                got: self.rules.len(),
            });
        }
        if !self.radii.is_empty() && self.radii.len() != n {
            return Err(SimError::RuleShape {
                what: "radii",
                expected: n,
                got: self.radii.len(),
            });
        }
        Ok(())
    }

}
