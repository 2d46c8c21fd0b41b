//! `Universe` class exported to the host page.
//!
//! A thin wrapper: every method forwards to [`crate::universe::Universe`] and
//! turns a [`crate::error::SimError`] into a thrown JS `Error`.

use crate::config::UniverseConfig;
use crate::error::{SimError, SimResult};
use crate::universe::Universe;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(js_name = Universe)]
pub struct HostUniverse {
    inner: Universe,
}

#[wasm_bindgen(js_class = Universe)]
impl HostUniverse {
    /// `Universe.new({ width, height, num_colors, atoms_per_color, toroid, ... })`.
    ///
    /// The object uses the same snake_case keys as `assets/universe.toml`;
    /// missing keys keep their defaults and `undefined` means all defaults.
    pub fn new(config: JsValue) -> Result<HostUniverse, JsError> {
        let config = if config.is_undefined() || config.is_null() {
            UniverseConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<UniverseConfig>(config)
                .map_err(|e| SimError::Config(e.to_string()))?
        };
        Ok(Self::from_config(config)?)
    }

    /// `Universe.withSize(width, height, numColors, atomsPerColor, seed?)`.
    /// Everything else starts at its default; use the setters to tune.
    #[wasm_bindgen(js_name = withSize)]
    pub fn with_size(
        width: f32,
        height: f32,
        num_colors: u32,
        atoms_per_color: u32,
        seed: Option<f64>,
    ) -> Result<HostUniverse, JsError> {
        let config = UniverseConfig {
            width,
            height,
            num_colors,
            atoms_per_color,
            seed: seed.and_then(seed_from_js),
            ..UniverseConfig::default()
        };
        Ok(Self::from_config(config)?)
    }

    /// Build from a TOML document (same keys as `assets/universe.toml`).
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(src: &str) -> Result<HostUniverse, JsError> {
        Ok(Self::from_config(UniverseConfig::from_toml_str(src)?)?)
    }

    pub fn tick(&mut self) {
        self.inner.tick();
    }

    pub fn explore(&mut self) {
        self.inner.explore();
    }

    pub fn num_atoms(&self) -> usize {
        self.inner.num_atoms()
    }

    /// Pointer to the flat atom buffer in wasm memory.
    ///
    /// Valid until the universe is dropped; read it as
    /// `new Float32Array(memory.buffer, ptr, atoms_len())`.
    pub fn atoms(&self) -> *const f32 {
        self.inner.atoms().as_ptr()
    }

    pub fn atoms_len(&self) -> usize {
        self.inner.atoms().len()
    }

    pub fn set_rules(&mut self, rules: Vec<f32>) -> Result<(), JsError> {
        Ok(self.inner.set_rules(rules)?)
    }

    pub fn set_radii(&mut self, radii: Vec<f32>) -> Result<(), JsError> {
        Ok(self.inner.set_radii(radii)?)
    }

    pub fn set_viscosity(&mut self, viscosity: f32) -> Result<(), JsError> {
        Ok(self.inner.set_viscosity(viscosity)?)
    }

    pub fn set_time_scale(&mut self, time_scale: f32) -> Result<(), JsError> {
        Ok(self.inner.set_time_scale(time_scale)?)
    }

    pub fn set_wall_repel(&mut self, wall_repel: f32) -> Result<(), JsError> {
        Ok(self.inner.set_wall_repel(wall_repel)?)
    }

    pub fn set_gravity(&mut self, gravity: f32) -> Result<(), JsError> {
        Ok(self.inner.set_gravity(gravity)?)
    }

    pub fn set_toroid(&mut self, toroid: bool) {
        self.inner.set_toroid(toroid);
    }

    pub fn set_real_forces(&mut self, real_forces: bool) {
        self.inner.set_real_forces(real_forces);
    }

    /// Current strengths, row-major.
    pub fn rules(&self) -> Vec<f32> {
        self.inner.rules().strengths().to_vec()
    }

    pub fn radii(&self) -> Vec<f32> {
        self.inner.rules().radii().to_vec()
    }
}

impl HostUniverse {
    fn from_config(config: UniverseConfig) -> SimResult<HostUniverse> {
        Ok(Self {
            inner: Universe::new(config)?,
        })
    }
}

/// JS seeds are doubles; drop anything that is not a non-negative integer.
fn seed_from_js(seed: f64) -> Option<u64> {
    (seed.is_finite() && seed >= 0.0 && seed.fract() == 0.0).then_some(seed as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The keys `startLife` passes to `Universe.new`, in the page's order.
    const PAGE_CONFIG: &str = "
        width = 1152.0
        height = 648.0
        num_colors = 2
        atoms_per_color = 10
        toroid = false
        rules = [0.5, -0.25, 0.1, -1.0]
        radii = [80.0, 120.0]
        wall_repel = 40.0
        viscosity = 1.3
        time_scale = 0.2
        real_forces = true
        debug = true
    ";

    #[test]
    fn page_config_keys_build_a_universe() {
        let config = UniverseConfig::from_toml_str(PAGE_CONFIG).unwrap();
        let host = HostUniverse::from_config(config).unwrap();
        assert_eq!(host.num_atoms(), 20);
        assert_eq!(host.rules(), vec![0.5, -0.25, 0.1, -1.0]);
        assert_eq!(host.radii(), vec![80.0, 120.0]);
        assert!(!host.inner.config().toroid);
        assert_eq!(host.inner.config().viscosity, 1.3);
        assert!(host.inner.config().debug);
    }

    #[test]
    fn from_config_reports_invalid_settings() {
        let config = UniverseConfig {
            num_colors: 0,
            ..UniverseConfig::default()
        };
        assert!(HostUniverse::from_config(config).is_err());
    }

    #[test]
    fn seed_from_js_accepts_integral_values() {
        assert_eq!(seed_from_js(3_762_108_977_281.0), Some(3_762_108_977_281));
        assert_eq!(seed_from_js(0.0), Some(0));
        assert_eq!(seed_from_js(-1.0), None);
        assert_eq!(seed_from_js(1.5), None);
        assert_eq!(seed_from_js(f64::NAN), None);
    }
}
