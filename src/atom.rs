//! Atoms and the color-grouped atom generator.
//!
//! Atoms are generated fresh on every call: no retained state, no identity
//! beyond position in the returned `Vec`. Color group `i` occupies the block
//! `[i * atoms_per_color, (i + 1) * atoms_per_color)`.

use crate::constants::FIELDS_PER_ATOM;
use crate::error::{validate_count, validate_extent, SimResult};
use rand::Rng;

/// A particle with 2D position, 2D velocity and a color group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: u32,
}

impl Atom {
    /// A resting atom at `(x, y)`.
    pub fn at_rest(x: f32, y: f32, color: u32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            color,
        }
    }

    /// Host layout: `[x, y, vx, vy, color]`.
    #[inline]
    pub fn to_fields(&self) -> [f32; FIELDS_PER_ATOM] {
        [self.x, self.y, self.vx, self.vy, self.color as f32]
    }
}

/// Flatten atoms into the shared host buffer layout.
pub fn flatten(atoms: &[Atom]) -> Vec<f32> {
    let mut out = Vec::with_capacity(atoms.len() * FIELDS_PER_ATOM);
    write_fields(atoms, &mut out);
    out
}

/// Overwrite `buffer` with the flattened atoms, reusing its allocation.
pub fn write_fields(atoms: &[Atom], buffer: &mut Vec<f32>) {
    buffer.clear();
    buffer.extend(atoms.iter().flat_map(Atom::to_fields));
}

/// Uniform draw in `[0, extent)`; zero (or less) extent gives 0.
#[inline]
fn random_in<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent.is_nan() || extent <= 0.0 {
        return 0.0;
    }
    let v = rng.gen::<f32>() * extent;
    // Rounding can land exactly on `extent` for large extents.
    if v < extent {
        v
    } else {
        f32::from_bits(extent.to_bits() - 1)
    }
}

/// Random x coordinate in `[0, width)`.
pub fn random_x<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    random_in(rng, width)
}

/// Random y coordinate in `[0, height)`.
pub fn random_y<R: Rng + ?Sized>(rng: &mut R, height: f32) -> f32 {
    random_in(rng, height)
}

/// Generate `colors * atoms_per_color` resting atoms at random positions,
/// grouped by color in increasing color order.
///
/// No validation: see [`try_generate`] for the checked entry point.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    colors: u32,
    atoms_per_color: u32,
    width: f32,
    height: f32,
) -> Vec<Atom> {
    log::info!(
        "create {} colors x {} atoms in {} x {}",
        colors,
        atoms_per_color,
        width,
        height
    );
    let total = colors as usize * atoms_per_color as usize;
    let mut atoms = Vec::with_capacity(total);
    for color in 0..colors {
        log::debug!("col {}", color);
        for _ in 0..atoms_per_color {
            let x = random_x(rng, width);
            let y = random_y(rng, height);
            atoms.push(Atom::at_rest(x, y, color));
        }
    }
    atoms
}

/// Validating wrapper around [`generate`] for untrusted (host) input.
///
/// Rejects negative counts and negative or non-finite extents.
pub fn try_generate<R: Rng + ?Sized>(
    rng: &mut R,
    colors: i64,
    atoms_per_color: i64,
    width: f32,
    height: f32,
) -> SimResult<Vec<Atom>> {
    let colors = validate_count("colors", colors)?;
    let atoms_per_color = validate_count("atoms_per_color", atoms_per_color)?;
    let width = validate_extent("width", width)?;
    let height = validate_extent("height", height)?;
    Ok(generate(rng, colors, atoms_per_color, width, height))
}
