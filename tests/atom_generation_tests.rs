//! Property tests for the color-grouped atom generator.
//!
//! Covered properties:
//! 1. `generate(c, p, w, h)` returns exactly `c * p` atoms.
//! 2. Atom `k` belongs to color `k / p` (contiguous color blocks).
//! 3. Positions fall in `[0, w) × [0, h)`; a zero extent pins the coordinate to 0.
//! 4. Every atom starts at rest.

use particle_life::atom::{flatten, generate, try_generate};
use particle_life::constants::FIELDS_PER_ATOM;
use particle_life::rng::Mulberry32;
use proptest::prelude::*;

// ── Fixed cases ───────────────────────────────────────────────────────────────

#[test]
fn two_colors_of_three() {
    let atoms = generate(&mut Mulberry32::new(1), 2, 3, 50.0, 80.0);
    assert_eq!(atoms.len(), 6);
    for (k, a) in atoms.iter().enumerate() {
        let expected = if k < 3 { 0 } else { 1 };
        assert_eq!(a.color, expected, "atom {k}");
    }
}

#[test]
fn empty_when_either_count_is_zero() {
    assert!(generate(&mut Mulberry32::new(1), 0, 5, 100.0, 100.0).is_empty());
    assert!(generate(&mut Mulberry32::new(1), 3, 0, 100.0, 100.0).is_empty());
}

#[test]
fn entropy_source_works_too() {
    let atoms = generate(&mut rand::thread_rng(), 3, 7, 10.0, 20.0);
    assert_eq!(atoms.len(), 21);
    assert!(atoms.iter().all(|a| a.x < 10.0 && a.y < 20.0));
}

// ── Properties ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn count_grouping_bounds_and_rest(
        seed in any::<u32>(),
        colors in 0u32..8,
        per_color in 0u32..40,
        width in 0.0f32..2000.0,
        height in 0.0f32..2000.0,
    ) {
        let atoms = generate(&mut Mulberry32::new(seed), colors, per_color, width, height);
        prop_assert_eq!(atoms.len(), (colors * per_color) as usize);

        for (k, a) in atoms.iter().enumerate() {
            prop_assert_eq!(a.color as usize, k / per_color as usize);
            prop_assert_eq!(a.vx, 0.0);
            prop_assert_eq!(a.vy, 0.0);
            if width > 0.0 {
                prop_assert!(a.x >= 0.0 && a.x < width);
            } else {
                prop_assert_eq!(a.x, 0.0);
            }
            if height > 0.0 {
                prop_assert!(a.y >= 0.0 && a.y < height);
            } else {
                prop_assert_eq!(a.y, 0.0);
            }
        }

        let flat = flatten(&atoms);
        prop_assert_eq!(flat.len(), atoms.len() * FIELDS_PER_ATOM);
    }

    #[test]
    fn negative_counts_are_rejected(colors in i64::MIN..0, per_color in 0i64..10) {
        let mut rng = Mulberry32::new(0);
        prop_assert!(try_generate(&mut rng, colors, per_color, 10.0, 10.0).is_err());
        prop_assert!(try_generate(&mut rng, per_color, colors, 10.0, 10.0).is_err());
    }
}
