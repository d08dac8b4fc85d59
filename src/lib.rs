//! Bulk optical properties of multi-component aerosol mixtures.
//!
//! Given per-component lognormal size distributions and precomputed
//! per-wavelength Mie coefficient tables, `aeolus` combines up to six
//! atmospheric layers of aerosol mixtures into layer-level extinction,
//! scattering and absorption coefficients, single-scattering albedo and
//! asymmetry parameter, and integrates each layer's vertical profile into
//! per-wavelength aerosol optical depth and a column total.
//!
//! ```no_run
//! use aeolus::model;
//! use aeolus::optdata::ComponentStore;
//! use aeolus::presets::AerosolType;
//!
//! let scene = AerosolType::Urban.scene(&[0.4, 0.5, 0.55], 80)?;
//! let store = ComponentStore::from_source(scene.source())?;
//! let output = model::run(&scene, &store)?;
//! println!("column AOD at 550 nm: {:.4}", output.column_aod[&550]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod components;
pub mod config;
pub mod data;
pub mod grid;
pub mod mixture;
pub mod model;
pub mod optdata;
pub mod presets;
pub mod profile;
pub mod wavelength;

pub use components::ComponentId;
pub use config::{ComponentSource, InputUnit, Layer, Scene};
pub use model::{LayerOutput, ModelError, RunOutput, run};
pub use optdata::ComponentStore;
pub use presets::AerosolType;
pub use profile::Profile;
