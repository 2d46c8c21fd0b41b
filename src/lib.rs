//! Particle Life, compiled to WebAssembly.
//!
//! Atoms of a few colors attract or repel each other according to a small
//! color-to-color rule matrix; simple rules give rise to cells, worms and
//! orbiting clusters. The page owns the canvas and the GUI, this crate owns
//! the atoms and the physics.
//!
//! Host exports live in this file ([`on_load`], [`add`], [`create_atoms`]) and
//! in [`bindings`] (the `Universe` class). Everything else is plain Rust and
//! runs natively under `cargo test` and the headless runner.

pub mod atom;
pub mod bindings;
pub mod config;
pub mod constants;
pub mod error;
pub mod rng;
pub mod rules;
pub mod spatial_partition;
pub mod universe;

pub use atom::Atom;
pub use config::UniverseConfig;
pub use error::{SimError, SimResult};
pub use universe::Universe;

use wasm_bindgen::prelude::*;

/// Module start: hook up the console logger and say hello.
#[wasm_bindgen(start)]
pub fn on_load() {
    init_host_logging();
    log::info!("{}", constants::GREETING);
}

#[cfg(target_arch = "wasm32")]
fn init_host_logging() {
    console_error_panic_hook::set_once();
    // Err only means a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_host_logging() {}

#[wasm_bindgen]
pub fn add(x: i32, y: i32) -> i32 {
    log::info!("add {} {}", x, y);
    x.wrapping_add(y)
}

/// `createAtoms(colors, atomsPerColor, width, height)`: a fresh array of
/// `[x, y, vx, vy, colorIndex]` arrays, grouped by color.
///
/// Throws on negative counts or negative extents.
#[wasm_bindgen(js_name = createAtoms)]
pub fn create_atoms(
    colors: i32,
    atoms_per_color: i32,
    width: f64,
    height: f64,
) -> Result<js_sys::Array, JsError> {
    let atoms = atom::try_generate(
        &mut rand::thread_rng(),
        colors.into(),
        atoms_per_color.into(),
        width as f32,
        height as f32,
    )?;

    let out = js_sys::Array::new_with_length(atoms.len() as u32);
    for (i, a) in atoms.iter().enumerate() {
        let fields: js_sys::Array = a
            .to_fields()
            .iter()
            .map(|&f| JsValue::from_f64(f as f64))
            .collect();
        out.set(i as u32, fields.into());
    }
    Ok(out)
}

/// Floats per atom in the `Universe.atoms()` buffer.
#[wasm_bindgen(js_name = fieldsPerAtom)]
pub fn fields_per_atom() -> usize {
    constants::FIELDS_PER_ATOM
}
