//! Scene evaluation
//!
//! Drives the full pipeline for every layer of a validated scene: size
//! integration, concentration normalization, bulk optical aggregation and
//! the vertical AOD integral, then sums the layers into the column optical
//! depth.

use log::warn;
use serde::Serialize;

use std::collections::BTreeMap;
use std::fmt;

use crate::components::ComponentId;
use crate::config::{ConfigError, Layer, Scene};
use crate::mixture::optics::OpticsTable;
use crate::mixture::{concentration, optics, size};
use crate::optdata::{Coefficient, ComponentRecord, ComponentStore, OptDataError, OpticalRecord};
use crate::wavelength::SUPPORTED_WAVELENGTHS;

#[derive(Debug)]
pub enum ModelError {
    Config(ConfigError),
    Data(OptDataError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Config(e) => write!(f, "{}", e),
            ModelError::Data(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> ModelError {
        ModelError::Config(err)
    }
}

impl From<OptDataError> for ModelError {
    fn from(err: OptDataError) -> ModelError {
        ModelError::Data(err)
    }
}

/// Everything computed for one layer. Spectral maps are keyed by wavelength
/// in nm; coefficients are in 1/km.
#[derive(Debug, Clone, Serialize)]
pub struct LayerOutput {
    /// 1-based layer index.
    pub layer: usize,
    pub relative_humidity: u8,
    /// Number concentration per component (1/cm³).
    pub number_concentration: BTreeMap<ComponentId, f64>,
    /// Mass concentration per component (µg/m³).
    pub mass_concentration: BTreeMap<ComponentId, f64>,
    /// Volume concentration per component (µm³/m³).
    pub volume_concentration: BTreeMap<ComponentId, f64>,
    pub number_mixing_ratio: BTreeMap<ComponentId, f64>,
    pub mass_mixing_ratio: BTreeMap<ComponentId, f64>,
    pub volume_mixing_ratio: BTreeMap<ComponentId, f64>,
    pub extinction: BTreeMap<u32, f64>,
    pub scattering: BTreeMap<u32, f64>,
    pub absorption: BTreeMap<u32, f64>,
    pub ssa: BTreeMap<u32, f64>,
    pub asymmetry: BTreeMap<u32, f64>,
    pub aod: BTreeMap<u32, f64>,
}

/// Result of evaluating a scene: the per-layer breakdown plus the column
/// total optical depth.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub layers: Vec<LayerOutput>,
    /// Column AOD per wavelength: the sum over layers, where a layer whose
    /// AOD is NaN (no aerosol present) contributes zero.
    pub column_aod: BTreeMap<u32, f64>,
}

impl RunOutput {
    /// The lowest layer, conventionally the mixed layer at the surface.
    pub fn surface(&self) -> &LayerOutput {
        &self.layers[0]
    }
}

/// Evaluates a scene against a component database. Validation failures and
/// missing data for populated components abort the whole run; no partial
/// output is ever returned.
pub fn run(scene: &Scene, store: &ComponentStore) -> Result<RunOutput, ModelError> {
    scene.validate()?;

    let mut layers = Vec::with_capacity(scene.layers().len());
    for (i, layer) in scene.layers().iter().enumerate() {
        layers.push(evaluate_layer(scene, store, i + 1, layer)?);
    }

    let mut column_aod = BTreeMap::new();
    for &wl in scene.wavelengths() {
        let total: f64 = layers
            .iter()
            .map(|l| l.aod[&wl])
            .filter(|aod| !aod.is_nan())
            .sum();
        column_aod.insert(wl, total);
    }

    Ok(RunOutput { layers, column_aod })
}

fn evaluate_layer(
    scene: &Scene,
    store: &ComponentStore,
    index: usize,
    layer: &Layer,
) -> Result<LayerOutput, ModelError> {
    let rh = layer.relative_humidity();

    // Load what the database has. A missing record is fatal only for a
    // populated component; an empty one is simply absent from this RH bin.
    let mut records: BTreeMap<ComponentId, Option<ComponentRecord>> = BTreeMap::new();
    for (&comp, &conc) in layer.concentration() {
        let record = match store.load(comp, rh) {
            Ok(record) => Some(record),
            Err(OptDataError::ComponentDataNotFound { .. }) if conc == 0.0 => {
                warn!(
                    "layer {}: component {} has no data at {}% RH; treating as absent",
                    index, comp, rh
                );
                None
            }
            Err(e) => return Err(e.into()),
        };
        records.insert(comp, record);
    }

    let mut mean_volume = BTreeMap::new();
    let mut mean_mass = BTreeMap::new();
    for (&comp, record) in &records {
        let (volume, mass) = match record {
            Some(record) => size::volume_and_mass(&record.size, comp, scene.max_radius()),
            None => (0.0, 0.0),
        };
        mean_volume.insert(comp, volume);
        mean_mass.insert(comp, mass);
    }

    let number_concentration =
        concentration::number_density(scene.input_unit(), layer.concentration(), &mean_mass);
    let mass_concentration: BTreeMap<ComponentId, f64> = number_concentration
        .iter()
        .map(|(&comp, &n)| (comp, n * mean_mass[&comp]))
        .collect();
    let volume_concentration: BTreeMap<ComponentId, f64> = number_concentration
        .iter()
        .map(|(&comp, &n)| (comp, n * mean_volume[&comp]))
        .collect();

    let number_mixing_ratio = concentration::mixing_ratios(&number_concentration);
    let mass_mixing_ratio = concentration::mixing_ratios(&mass_concentration);
    let volume_mixing_ratio = concentration::mixing_ratios(&volume_concentration);

    // Populated components contribute their table; empty ones an all-zero
    // record at every tabulated wavelength.
    let mut optics_table = OpticsTable::new();
    for (&comp, record) in &records {
        let table = match record {
            Some(record) if number_concentration[&comp] != 0.0 => record.optics.clone(),
            _ => zero_table(),
        };
        optics_table.insert(comp, table);
    }

    let mut extinction = BTreeMap::new();
    let mut scattering = BTreeMap::new();
    let mut absorption = BTreeMap::new();
    let mut ssa = BTreeMap::new();
    let mut asymmetry = BTreeMap::new();
    let mut aod = BTreeMap::new();
    for &wl in scene.wavelengths() {
        let ext = optics::bulk_coefficient(
            &optics_table,
            &number_concentration,
            wl,
            Coefficient::Extinction,
        );
        extinction.insert(wl, ext);
        scattering.insert(
            wl,
            optics::bulk_coefficient(&optics_table, &number_concentration, wl, Coefficient::Scattering),
        );
        absorption.insert(
            wl,
            optics::bulk_coefficient(&optics_table, &number_concentration, wl, Coefficient::Absorption),
        );
        let (s, g) = optics::bulk_ssa_g(&optics_table, &number_concentration, wl);
        ssa.insert(wl, s);
        asymmetry.insert(wl, g);
        aod.insert(wl, layer.profile().aod(ext));
    }

    Ok(LayerOutput {
        layer: index,
        relative_humidity: rh,
        number_concentration,
        mass_concentration,
        volume_concentration,
        number_mixing_ratio,
        mass_mixing_ratio,
        volume_mixing_ratio,
        extinction,
        scattering,
        absorption,
        ssa,
        asymmetry,
        aod,
    })
}

fn zero_table() -> BTreeMap<u32, OpticalRecord> {
    SUPPORTED_WAVELENGTHS
        .iter()
        .map(|&nm| (nm, OpticalRecord::ZERO))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentSource, InputUnit};
    use crate::optdata::tests::{component_file_contents, write_component};
    use crate::profile::Profile;
    use approx::assert_relative_eq;
    use tempfile::{TempDir, tempdir};

    // Insoluble: ext 2e-5, sca 1e-5, ssa 0.5, g 0.6.
    // Water-soluble: ext 4e-5, sca 4e-5, ssa 1.0, g 0.8.
    fn test_database() -> TempDir {
        let dir = tempdir().unwrap();
        let insoluble = component_file_contents(0.005, 20.0, 2.51, 2.0, 0.471, |_| {
            [2.0e-5, 1.0e-5, 1.0e-5, 0.5, 0.6, 1.0, 1.5, 0.01]
        });
        write_component(dir.path(), "IS00", &insoluble);
        let water_soluble = component_file_contents(0.005, 20.0, 2.24, 1.38, 0.0262, |_| {
            [4.0e-5, 4.0e-5, 0.0, 1.0, 0.8, 1.0, 1.4, 0.0]
        });
        write_component(dir.path(), "WS00", &water_soluble);
        dir
    }

    fn concentration(insoluble: f64, water_soluble: f64) -> BTreeMap<ComponentId, f64> {
        BTreeMap::from([
            (ComponentId::Insoluble, insoluble),
            (ComponentId::WaterSoluble, water_soluble),
        ])
    }

    fn two_layer_scene(dir: &TempDir) -> Scene {
        let slab = Profile::from_code(1, &[0.0, 2.0, 1.0]).unwrap();
        Scene::new(
            &[0.5, 0.55],
            5.0,
            ComponentSource::Directory(dir.path().to_path_buf()),
            InputUnit::NumberDensity,
            2,
            vec![
                Layer::new(0, slab, concentration(100.0, 300.0)),
                Layer::new(0, slab, concentration(0.0, 0.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_bulk_coefficients_and_column_aod() {
        let dir = test_database();
        let scene = two_layer_scene(&dir);
        let store = ComponentStore::new(dir.path()).unwrap();

        let output = run(&scene, &store).unwrap();

        let expected_ext = 100.0 * 2.0e-5 + 300.0 * 4.0e-5;
        let surface = output.surface();
        assert_eq!(surface.layer, 1);
        assert_relative_eq!(surface.extinction[&550], expected_ext, max_relative = 1e-12);
        assert_relative_eq!(surface.aod[&550], expected_ext * 2.0, max_relative = 1e-12);

        // The empty layer is NaN everywhere but adds nothing to the column.
        let empty = &output.layers[1];
        assert!(empty.extinction[&550].is_nan());
        assert!(empty.ssa[&550].is_nan());
        assert!(empty.asymmetry[&550].is_nan());
        assert!(empty.aod[&550].is_nan());
        assert_relative_eq!(
            output.column_aod[&550],
            expected_ext * 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_mixing_ratios() {
        let dir = test_database();
        let scene = two_layer_scene(&dir);
        let store = ComponentStore::new(dir.path()).unwrap();

        let output = run(&scene, &store).unwrap();

        let surface = output.surface();
        assert_relative_eq!(
            surface.number_mixing_ratio.values().sum::<f64>(),
            1.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            surface.number_mixing_ratio[&ComponentId::Insoluble],
            0.25,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            surface.mass_mixing_ratio.values().sum::<f64>(),
            1.0,
            max_relative = 1e-12
        );

        // All ratios of the empty layer are zero, never NaN.
        let empty = &output.layers[1];
        assert!(empty.number_mixing_ratio.values().all(|&r| r == 0.0));
        assert!(empty.mass_mixing_ratio.values().all(|&r| r == 0.0));
        assert!(empty.volume_mixing_ratio.values().all(|&r| r == 0.0));
    }

    #[test]
    fn test_mass_input_round_trips() {
        let dir = test_database();
        let slab = Profile::from_code(1, &[0.0, 2.0, 1.0]).unwrap();
        let scene = Scene::new(
            &[0.5],
            5.0,
            ComponentSource::Directory(dir.path().to_path_buf()),
            InputUnit::MassDensity,
            2,
            vec![Layer::new(0, slab, concentration(5.0, 12.0))],
        )
        .unwrap();
        let store = ComponentStore::new(dir.path()).unwrap();

        let output = run(&scene, &store).unwrap();

        let surface = output.surface();
        assert!(surface.number_concentration[&ComponentId::Insoluble] > 0.0);
        assert_relative_eq!(
            surface.mass_concentration[&ComponentId::Insoluble],
            5.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            surface.mass_concentration[&ComponentId::WaterSoluble],
            12.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_missing_data_for_populated_component_fails() {
        let dir = tempdir().unwrap();
        let water_soluble = component_file_contents(0.005, 20.0, 2.24, 1.38, 0.0262, |_| {
            [4.0e-5, 4.0e-5, 0.0, 1.0, 0.8, 1.0, 1.4, 0.0]
        });
        write_component(dir.path(), "WS00", &water_soluble);

        let slab = Profile::from_code(1, &[0.0, 2.0, 1.0]).unwrap();
        let scene = Scene::new(
            &[0.5],
            5.0,
            ComponentSource::Directory(dir.path().to_path_buf()),
            InputUnit::NumberDensity,
            2,
            vec![Layer::new(0, slab, concentration(100.0, 300.0))],
        )
        .unwrap();
        let store = ComponentStore::new(dir.path()).unwrap();

        let err = run(&scene, &store).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Data(OptDataError::ComponentDataNotFound {
                component: ComponentId::Insoluble,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_data_for_empty_component_is_tolerated() {
        let dir = tempdir().unwrap();
        let water_soluble = component_file_contents(0.005, 20.0, 2.24, 1.38, 0.0262, |_| {
            [4.0e-5, 4.0e-5, 0.0, 1.0, 0.8, 1.0, 1.4, 0.0]
        });
        write_component(dir.path(), "WS00", &water_soluble);

        let slab = Profile::from_code(1, &[0.0, 2.0, 1.0]).unwrap();
        let scene = Scene::new(
            &[0.5],
            5.0,
            ComponentSource::Directory(dir.path().to_path_buf()),
            InputUnit::NumberDensity,
            2,
            vec![Layer::new(0, slab, concentration(0.0, 300.0))],
        )
        .unwrap();
        let store = ComponentStore::new(dir.path()).unwrap();

        let output = run(&scene, &store).unwrap();

        let surface = output.surface();
        assert_eq!(surface.number_concentration[&ComponentId::Insoluble], 0.0);
        assert_eq!(surface.number_mixing_ratio[&ComponentId::Insoluble], 0.0);
        assert_relative_eq!(
            surface.extinction[&500],
            300.0 * 4.0e-5,
            max_relative = 1e-12
        );
    }
}
