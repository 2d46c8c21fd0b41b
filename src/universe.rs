//! The particle-life universe: atoms, rules and the per-tick force step.
//!
//! Every tick each atom sums one force per neighbor inside its color's
//! interaction radius, scaled by the color-pair strength. Walls (or the
//! toroidal wrap), gravity and viscosity are applied afterwards, and the
//! flattened host buffer is refreshed so the page can draw straight from
//! wasm memory.

use crate::atom::{self, Atom};
use crate::config::UniverseConfig;
use crate::constants::{
    CORE_RADIUS, CORE_REPULSION, DEFAULT_RADIUS, MAX_VISCOSITY, WALL_REPEL_STRENGTH,
};
use crate::error::{validate_range, SimError, SimResult};
use crate::rng::Mulberry32;
use crate::rules::Rules;
use crate::spatial_partition::SpatialGrid;

#[derive(Debug, Clone)]
pub struct Universe {
    config: UniverseConfig,
    rules: Rules,
    atoms: Vec<Atom>,
    /// `FIELDS_PER_ATOM` floats per atom, shared with the host.
    buffer: Vec<f32>,
    /// Scratch: summed force per atom for the current tick.
    forces: Vec<(f32, f32)>,
    grid: SpatialGrid,
    rng: Mulberry32,
    ticks: u64,
}

impl Universe {
    /// Build a universe seeded from `config.seed` (entropy when absent).
    pub fn new(config: UniverseConfig) -> SimResult<Self> {
        let rng = Mulberry32::seeded_or_entropy(config.seed);
        Self::with_rng(config, rng)
    }

    /// Build a universe drawing atom positions and random rules from `rng`.
    pub fn with_rng(config: UniverseConfig, mut rng: Mulberry32) -> SimResult<Self> {
        config.validate()?;
        let n = config.num_colors as usize;

        let atoms = atom::generate(
            &mut rng,
            config.num_colors,
            config.atoms_per_color,
            config.width,
            config.height,
        );

        let mut rules = Rules::random(&mut rng, n);
        if !config.rules.is_empty() {
            rules.set_strengths(config.rules.clone())?;
        } else if config.symmetric_rules {
            rules.symmetrize();
        }
        if !config.radii.is_empty() {
            rules.set_radii(config.radii.clone())?;
        }

        log::info!(
            "universe {}x{}: {} colors, {} atoms, toroid={}",
            config.width,
            config.height,
            n,
            atoms.len(),
            config.toroid
        );

        let buffer = atom::flatten(&atoms);
        Ok(Self {
            forces: vec![(0.0, 0.0); atoms.len()],
            grid: SpatialGrid::new(DEFAULT_RADIUS),
            config,
            rules,
            atoms,
            buffer,
            rng,
            ticks: 0,
        })
    }

    /// Advance the simulation by one step.
    pub fn tick(&mut self) {
        self.rebuild_grid();
        self.accumulate_forces();
        self.integrate();
        atom::write_fields(&self.atoms, &mut self.buffer);
        self.ticks += 1;

        if self.config.debug {
            let mean_speed = if self.atoms.is_empty() {
                0.0
            } else {
                self.atoms
                    .iter()
                    .map(|a| (a.vx * a.vx + a.vy * a.vy).sqrt())
                    .sum::<f32>()
                    / self.atoms.len() as f32
            };
            log::debug!("tick {}: mean speed {:.4}", self.ticks, mean_speed);
        }
    }

    /// Apply one random rules mutation.
    pub fn explore(&mut self) {
        self.rules.explore(&mut self.rng);
    }

    fn rebuild_grid(&mut self) {
        let toroid = self
            .config
            .toroid
            .then_some((self.config.width, self.config.height));
        self.grid.reset(self.rules.max_radius(), toroid);
        for (i, a) in self.atoms.iter().enumerate() {
            self.grid.insert(i, a.x, a.y);
        }
    }

    fn accumulate_forces(&mut self) {
        let cfg = &self.config;
        let (w, h) = (cfg.width, cfg.height);
        self.forces.resize(self.atoms.len(), (0.0, 0.0));

        for (i, a) in self.atoms.iter().enumerate() {
            let radius = self.rules.radius(a.color);
            let (mut fx, mut fy) = (0.0f32, 0.0f32);

            self.grid.for_each_candidate(a.x, a.y, radius, |j| {
                if j == i {
                    return;
                }
                let b = &self.atoms[j];
                let mut dx = a.x - b.x;
                let mut dy = a.y - b.y;
                if cfg.toroid {
                    dx = min_image(dx, w);
                    dy = min_image(dy, h);
                }
                let d2 = dx * dx + dy * dy;
                if d2 <= 0.0 {
                    // Stacked atoms have no direction; split them along x by index.
                    if cfg.real_forces {
                        fx += if i < j { -CORE_REPULSION } else { CORE_REPULSION };
                    }
                    return;
                }
                if d2 >= radius * radius {
                    return;
                }
                let d = d2.sqrt();
                let magnitude = if cfg.real_forces && d < CORE_RADIUS {
                    -(CORE_RADIUS - d) / CORE_RADIUS * CORE_REPULSION
                } else {
                    self.rules.strength(a.color, b.color)
                };
                // (-dx, -dy) / d points from a toward b.
                fx -= magnitude * dx / d;
                fy -= magnitude * dy / d;
            });

            if !cfg.toroid && cfg.wall_repel > 0.0 {
                fx += wall_force(a.x, w, cfg.wall_repel);
                fy += wall_force(a.y, h, cfg.wall_repel);
            }
            fy += cfg.gravity;

            self.forces[i] = (fx, fy);
        }
    }

    fn integrate(&mut self) {
        let cfg = &self.config;
        let keep = 1.0 - cfg.viscosity;
        for (a, &(fx, fy)) in self.atoms.iter_mut().zip(&self.forces) {
            a.vx = a.vx * keep + fx * cfg.time_scale;
            a.vy = a.vy * keep + fy * cfg.time_scale;
            a.x += a.vx;
            a.y += a.vy;

            if cfg.toroid {
                a.x = wrap(a.x, cfg.width);
                a.y = wrap(a.y, cfg.height);
            } else {
                (a.x, a.vx) = bounce(a.x, a.vx, cfg.width);
                (a.y, a.vy) = bounce(a.y, a.vy, cfg.height);
            }
        }
    }

    // ── Setters ───────────────────────────────────────────────────────────────

    pub fn set_rules(&mut self, strengths: Vec<f32>) -> SimResult<()> {
        self.rules.set_strengths(strengths)
    }

    pub fn set_radii(&mut self, radii: Vec<f32>) -> SimResult<()> {
        self.rules.set_radii(radii)
    }

    pub fn set_viscosity(&mut self, viscosity: f32) -> SimResult<()> {
        self.config.viscosity =
            validate_range("viscosity", viscosity, 0.0, MAX_VISCOSITY, "a value in [0, 2]")?;
        Ok(())
    }

    pub fn set_time_scale(&mut self, time_scale: f32) -> SimResult<()> {
        self.config.time_scale =
            validate_range("time_scale", time_scale, 0.0, f32::MAX, "a finite value >= 0")?;
        Ok(())
    }

    pub fn set_wall_repel(&mut self, wall_repel: f32) -> SimResult<()> {
        self.config.wall_repel =
            validate_range("wall_repel", wall_repel, 0.0, f32::MAX, "a finite value >= 0")?;
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: f32) -> SimResult<()> {
        self.config.gravity = validate_range("gravity", gravity, f32::MIN, f32::MAX, "a finite value")?;
        Ok(())
    }

    pub fn set_toroid(&mut self, toroid: bool) {
        self.config.toroid = toroid;
    }

    pub fn set_real_forces(&mut self, real_forces: bool) {
        self.config.real_forces = real_forces;
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Flat host buffer, `FIELDS_PER_ATOM` floats per atom.
    #[inline]
    pub fn atoms(&self) -> &[f32] {
        &self.buffer
    }

    pub fn atom_list(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Atom count per color group.
    pub fn color_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.rules.num_colors()];
        for a in &self.atoms {
            counts[a.color as usize] += 1;
        }
        counts
    }

    /// Replace the atoms, e.g. to set up a hand-placed scenario.
    ///
    /// Colors must be below the configured color count.
    pub fn set_atoms(&mut self, atoms: Vec<Atom>) -> SimResult<()> {
        let n = self.rules.num_colors();
        if let Some(bad) = atoms.iter().find(|a| a.color as usize >= n) {
            return Err(SimError::InvalidArgument {
                name: "color",
                value: bad.color as f64,
                expected: "a color below num_colors",
            });
        }
        self.atoms = atoms;
        atom::write_fields(&self.atoms, &mut self.buffer);
        Ok(())
    }
}

/// Shortest signed offset on a ring of circumference `extent`.
#[inline]
fn min_image(d: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        d
    } else if d > 0.5 * extent {
        d - extent
    } else if d < -0.5 * extent {
        d + extent
    } else {
        d
    }
}

/// Wrap into `[0, extent)`.
#[inline]
fn wrap(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let w = v.rem_euclid(extent);
    // rem_euclid of a tiny negative value rounds up to `extent`.
    if w >= extent {
        0.0
    } else {
        w
    }
}

/// Clamp into `[0, extent]`, reflecting velocity on contact.
#[inline]
fn bounce(v: f32, vel: f32, extent: f32) -> (f32, f32) {
    if v < 0.0 {
        (0.0, -vel)
    } else if v > extent {
        (extent, -vel)
    } else {
        (v, vel)
    }
}

/// Inward push for a coordinate within `band` of either wall.
#[inline]
fn wall_force(v: f32, extent: f32, band: f32) -> f32 {
    let mut f = 0.0;
    if v < band {
        f += (band - v) * WALL_REPEL_STRENGTH;
    }
    if v > extent - band {
        f -= (v - (extent - band)) * WALL_REPEL_STRENGTH;
    }
    f
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(num_colors: u32, atoms_per_color: u32) -> UniverseConfig {
        UniverseConfig {
            width: 400.0,
            height: 300.0,
            num_colors,
            atoms_per_color,
            seed: Some(42),
            ..UniverseConfig::default()
        }
    }

    /// Two atoms 40 apart along x with a single self-rule.
    fn pair(strength: f32, toroid: bool) -> Universe {
        let cfg = UniverseConfig {
            toroid,
            wall_repel: 0.0,
            rules: vec![strength],
            radii: vec![80.0],
            ..config(1, 2)
        };
        let mut u = Universe::new(cfg).unwrap();
        u.set_atoms(vec![
            Atom::at_rest(180.0, 150.0, 0),
            Atom::at_rest(220.0, 150.0, 0),
        ])
        .unwrap();
        u
    }

    fn gap(u: &Universe) -> f32 {
        let a = u.atom_list();
        (a[1].x - a[0].x).abs()
    }

    #[test]
    fn buffer_mirrors_atoms() {
        let u = Universe::new(config(3, 4)).unwrap();
        assert_eq!(u.num_atoms(), 12);
        assert_eq!(u.atoms().len(), 12 * crate::constants::FIELDS_PER_ATOM);
        assert_eq!(u.atoms(), atom::flatten(u.atom_list()).as_slice());
        assert_eq!(u.color_counts(), vec![4, 4, 4]);
    }

    #[test]
    fn positive_strength_pulls_atoms_together() {
        let mut u = pair(0.5, true);
        let before = gap(&u);
        u.tick();
        assert!(gap(&u) < before, "gap {} !< {}", gap(&u), before);
    }

    #[test]
    fn negative_strength_pushes_atoms_apart() {
        let mut u = pair(-0.5, true);
        let before = gap(&u);
        u.tick();
        assert!(gap(&u) > before);
    }

    #[test]
    fn atoms_beyond_radius_do_not_interact() {
        let mut u = pair(1.0, true);
        u.set_radii(vec![30.0]).unwrap();
        u.tick();
        assert_eq!(gap(&u), 40.0);
    }

    #[test]
    fn real_forces_repel_close_atoms_regardless_of_rule() {
        let mut u = pair(1.0, true);
        u.set_atoms(vec![
            Atom::at_rest(195.0, 150.0, 0),
            Atom::at_rest(205.0, 150.0, 0),
        ])
        .unwrap();
        u.tick();
        assert!(gap(&u) > 10.0);

        u.set_real_forces(false);
        u.set_atoms(vec![
            Atom::at_rest(195.0, 150.0, 0),
            Atom::at_rest(205.0, 150.0, 0),
        ])
        .unwrap();
        u.tick();
        assert!(gap(&u) < 10.0);
    }

    #[test]
    fn toroid_attracts_across_the_seam() {
        let mut u = pair(1.0, true);
        u.set_atoms(vec![
            Atom::at_rest(5.0, 150.0, 0),
            Atom::at_rest(365.0, 150.0, 0),
        ])
        .unwrap();
        u.tick();
        let a = u.atom_list();
        // Each moves toward the seam at x = 0 / 400.
        assert!(a[0].x < 5.0 || a[0].x > 365.0);
        assert!(a[1].x > 365.0);
    }

    #[test]
    fn toroid_keeps_positions_in_bounds() {
        let mut cfg = config(4, 40);
        cfg.time_scale = 5.0;
        cfg.viscosity = 0.0;
        let mut u = Universe::new(cfg).unwrap();
        for _ in 0..30 {
            u.tick();
        }
        for a in u.atom_list() {
            assert!((0.0..400.0).contains(&a.x), "x = {}", a.x);
            assert!((0.0..300.0).contains(&a.y), "y = {}", a.y);
        }
    }

    #[test]
    fn bounded_world_clamps_and_reflects() {
        let mut cfg = config(4, 40);
        cfg.toroid = false;
        cfg.time_scale = 5.0;
        cfg.viscosity = 0.0;
        let mut u = Universe::new(cfg).unwrap();
        for _ in 0..30 {
            u.tick();
        }
        for a in u.atom_list() {
            assert!((0.0..=400.0).contains(&a.x));
            assert!((0.0..=300.0).contains(&a.y));
        }
    }

    #[test]
    fn gravity_pulls_down() {
        let cfg = UniverseConfig {
            gravity: 1.0,
            rules: vec![0.0],
            ..config(1, 1)
        };
        let mut u = Universe::new(cfg).unwrap();
        u.set_atoms(vec![Atom::at_rest(200.0, 100.0, 0)]).unwrap();
        u.tick();
        assert!(u.atom_list()[0].y > 100.0);
        assert_eq!(u.atom_list()[0].x, 200.0);
    }

    #[test]
    fn wall_band_pushes_inward() {
        let cfg = UniverseConfig {
            toroid: false,
            wall_repel: 40.0,
            rules: vec![0.0],
            ..config(1, 1)
        };
        let mut u = Universe::new(cfg).unwrap();
        u.set_atoms(vec![Atom::at_rest(10.0, 150.0, 0)]).unwrap();
        u.tick();
        assert!(u.atom_list()[0].x > 10.0);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = Universe::new(config(3, 20)).unwrap();
        let mut b = Universe::new(config(3, 20)).unwrap();
        assert_eq!(a.rules(), b.rules());
        for _ in 0..5 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.atoms(), b.atoms());
        assert_eq!(a.ticks(), 5);
    }

    #[test]
    fn symmetric_rules_option_symmetrizes() {
        let cfg = UniverseConfig {
            symmetric_rules: true,
            ..config(4, 1)
        };
        assert!(Universe::new(cfg).unwrap().rules().is_symmetric());
    }

    #[test]
    fn setters_validate_ranges() {
        let mut u = Universe::new(config(2, 2)).unwrap();
        assert!(u.set_viscosity(2.5).is_err());
        assert!(u.set_viscosity(0.3).is_ok());
        assert_eq!(u.config().viscosity, 0.3);
        assert!(u.set_time_scale(-1.0).is_err());
        assert!(u.set_wall_repel(f32::NAN).is_err());
        assert!(u.set_rules(vec![0.0; 3]).is_err());
        assert!(u.set_radii(vec![10.0, 20.0]).is_ok());
        assert!(u.set_atoms(vec![Atom::at_rest(0.0, 0.0, 5)]).is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = UniverseConfig {
            num_colors: 0,
            ..UniverseConfig::default()
        };
        assert!(Universe::new(cfg).is_err());
    }

    #[test]
    fn stacked_atoms_separate_with_real_forces() {
        let mut u = pair(0.5, true);
        u.set_atoms(vec![
            Atom::at_rest(100.0, 100.0, 0),
            Atom::at_rest(100.0, 100.0, 0),
        ])
        .unwrap();
        for _ in 0..100 {
            u.tick();
        }
        assert!(gap(&u) > 0.0, "atoms still stacked at {:?}", u.atom_list());
    }

    #[test]
    fn stacked_atoms_stay_put_without_real_forces() {
        let mut u = pair(0.5, true);
        u.set_real_forces(false);
        u.set_atoms(vec![
            Atom::at_rest(100.0, 100.0, 0),
            Atom::at_rest(100.0, 100.0, 0),
        ])
        .unwrap();
        u.tick();
        assert_eq!(gap(&u), 0.0);
    }

    #[test]
    fn viscosity_above_one_keeps_ticks_finite() {
        let mut u = Universe::new(config(3, 20)).unwrap();
        u.set_viscosity(1.5).unwrap();
        assert_eq!(u.config().viscosity, 1.5);
        for _ in 0..50 {
            u.tick();
        }
        assert!(u.atoms().iter().all(|f| f.is_finite()));

        let cfg = UniverseConfig {
            viscosity: 1.9,
            ..config(2, 5)
        };
        assert!(Universe::new(cfg).is_ok());
    }

    #[test]
    fn wrap_handles_edges() {
        assert_eq!(wrap(-1.0, 10.0), 9.0);
        assert_eq!(wrap(10.0, 10.0), 0.0);
        assert!(wrap(-1e-9, 10.0) < 10.0);
        assert_eq!(wrap(3.0, 0.0), 0.0);
    }
}
