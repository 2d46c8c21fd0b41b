//! Color-to-color interaction rules.
//!
//! `strength(a, b)` is the force an atom of color `a` feels from an atom of
//! color `b`: positive attracts, negative repels. Each color also has one
//! interaction radius; atoms of color `a` ignore anything farther than
//! `radius(a)`.

use crate::constants::{DEFAULT_RADIUS, EXPLORE_STRENGTH_PROBABILITY, MAX_RADIUS};
use crate::error::{SimError, SimResult};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    num_colors: usize,
    /// Row-major `num_colors × num_colors`.
    strengths: Vec<f32>,
    radii: Vec<f32>,
}

impl Rules {
    /// Uniform strengths in `[-1, 1)`, every radius at [`DEFAULT_RADIUS`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R, num_colors: usize) -> Self {
        let strengths = (0..num_colors * num_colors)
            .map(|_| rng.gen::<f32>() * 2.0 - 1.0)
            .collect();
        Self {
            num_colors,
            strengths,
            radii: vec![DEFAULT_RADIUS; num_colors],
        }
    }

    /// Build from flat host arrays, checking shape and ranges.
    pub fn from_parts(num_colors: usize, strengths: Vec<f32>, radii: Vec<f32>) -> SimResult<Self> {
        check_strengths(num_colors, &strengths)?;
        check_radii(num_colors, &radii)?;
        Ok(Self {
            num_colors,
            strengths,
            radii,
        })
    }

    #[inline]
    pub fn num_colors(&self) -> usize {
        self.num_colors
    }

    #[inline]
    pub fn strength(&self, a: u32, b: u32) -> f32 {
        self.strengths[a as usize * self.num_colors + b as usize]
    }

    #[inline]
    pub fn radius(&self, color: u32) -> f32 {
        self.radii[color as usize]
    }

    pub fn strengths(&self) -> &[f32] {
        &self.strengths
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    /// Largest interaction radius; sizes the spatial grid.
    pub fn max_radius(&self) -> f32 {
        self.radii.iter().copied().fold(0.0, f32::max)
    }

    pub fn set_strengths(&mut self, strengths: Vec<f32>) -> SimResult<()> {
        check_strengths(self.num_colors, &strengths)?;
        self.strengths = strengths;
        Ok(())
    }

    pub fn set_radii(&mut self, radii: Vec<f32>) -> SimResult<()> {
        check_radii(self.num_colors, &radii)?;
        self.radii = radii;
        Ok(())
    }

    /// Replace `(i, j)` and `(j, i)` with their mean for every pair.
    pub fn symmetrize(&mut self) {
        let n = self.num_colors;
        for i in 0..n {
            for j in 0..i {
                let v = 0.5 * (self.strengths[i * n + j] + self.strengths[j * n + i]);
                self.strengths[i * n + j] = v;
                self.strengths[j * n + i] = v;
            }
        }
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.num_colors;
        (0..n).all(|i| (0..i).all(|j| self.strengths[i * n + j] == self.strengths[j * n + i]))
    }

    /// Apply one random mutation.
    ///
    /// Most of the time a single strength is replaced by a value of the
    /// opposite sign to what it was, which shakes up stable clusters faster
    /// than a uniform redraw. Otherwise one color's radius is redrawn.
    pub fn explore<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.num_colors == 0 {
            return;
        }
        let n = self.num_colors;
        let c1 = rng.gen_range(0..n);
        if rng.gen::<f32>() < EXPLORE_STRENGTH_PROBABILITY {
            let c2 = rng.gen_range(0..n);
            let mut strength = rng.gen::<f32>();
            if self.strengths[c1 * n + c2] > 0.0 {
                strength = -strength;
            }
            log::debug!("explore: strength[{}][{}] = {}", c1, c2, strength);
            self.strengths[c1 * n + c2] = strength;
        } else {
            let radius = 1.0 + (rng.gen::<f32>() * MAX_RADIUS).floor();
            log::debug!("explore: radius[{}] = {}", c1, radius);
            self.radii[c1] = radius;
        }
    }
}

fn check_strengths(num_colors: usize, strengths: &[f32]) -> SimResult<()> {
    let expected = num_colors * num_colors;
    if strengths.len() != expected {
        return Err(SimError::RuleShape {
            what: "rules",
            expected,
            got: strengths.len(),
        });
    }
    if let Some(&bad) = strengths
        .iter()
        .find(|s| !s.is_finite() || s.abs() > 1.0)
    {
        return Err(SimError::InvalidArgument {
            name: "rules",
            value: bad as f64,
            expected: "strengths in [-1, 1]",
        });
    }
    Ok(())
}

fn check_radii(num_colors: usize, radii: &[f32]) -> SimResult<()> {
    if radii.len() != num_colors {
        return Err(SimError::RuleShape {
            what: "radii",
            expected: num_colors,
            got: radii.len(),
        });
    }
    if let Some(&bad) = radii.iter().find(|r| !r.is_finite() || **r <= 0.0) {
        return Err(SimError::InvalidArgument {
            name: "radii",
            value: bad as f64,
            expected: "finite radii > 0",
        });
    }
    Ok(())
}
