//! Scene configuration
//!
//! A [`Scene`] describes one multi-layer aerosol mixture to evaluate: the
//! requested wavelengths, the integration cutoff radius, where component data
//! files live, the unit of the supplied concentrations and up to six layers.
//! Scenes deserialize from JSON and are validated on every construction path,
//! so a `Scene` in hand is always internally consistent.

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::components::{self, ComponentId};
use crate::profile::Profile;
use crate::wavelength;

pub mod error;
pub use error::ConfigError;

/// Upper bound on layers per scene.
pub const MAX_LAYERS: usize = 6;

/// Unit of the concentration values supplied per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputUnit {
    /// Particle number density, 1/cm³ (legacy code 0).
    NumberDensity,
    /// Mass density, µg/m³ (legacy code 1).
    MassDensity,
}

impl InputUnit {
    pub fn from_code(code: u8) -> Result<InputUnit, ConfigError> {
        match code {
            0 => Ok(InputUnit::NumberDensity),
            1 => Ok(InputUnit::MassDensity),
            other => Err(ConfigError::InvalidInputUnit(other)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            InputUnit::NumberDensity => 0,
            InputUnit::MassDensity => 1,
        }
    }
}

/// Where component data files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSource {
    /// The conventional database location, `./data/aerosol_components`.
    Bundled,
    Directory(PathBuf),
}

impl ComponentSource {
    /// Parses the config spelling: `"def"` selects the bundled database,
    /// anything else is taken as a directory path.
    pub fn from_config(value: &str) -> ComponentSource {
        if value == "def" {
            ComponentSource::Bundled
        } else {
            ComponentSource::Directory(PathBuf::from(value))
        }
    }

    pub fn directory(&self) -> PathBuf {
        match self {
            ComponentSource::Bundled => PathBuf::from("./data/aerosol_components"),
            ComponentSource::Directory(dir) => dir.clone(),
        }
    }
}

/// One aerosol layer: a humidity bin, a vertical profile and the
/// concentration of every declared component.
#[derive(Debug, Clone)]
pub struct Layer {
    relative_humidity: u8,
    profile: Profile,
    concentration: BTreeMap<ComponentId, f64>,
}

impl Layer {
    pub fn new(
        relative_humidity: u8,
        profile: Profile,
        concentration: BTreeMap<ComponentId, f64>,
    ) -> Self {
        Self {
            relative_humidity,
            profile,
            concentration,
        }
    }

    pub fn relative_humidity(&self) -> u8 {
        self.relative_humidity
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn concentration(&self) -> &BTreeMap<ComponentId, f64> {
        &self.concentration
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    wavelengths: Vec<u32>,
    max_radius: f64,
    source: ComponentSource,
    input_unit: InputUnit,
    n_components: usize,
    layers: Vec<Layer>,
}

impl Scene {
    /// Builds a validated scene. `wavelengths_um` is the requested subset of
    /// the tabulated wavelength set, in µm; `max_radius` (µm) truncates every
    /// size-distribution integration.
    pub fn new(
        wavelengths_um: &[f64],
        max_radius: f64,
        source: ComponentSource,
        input_unit: InputUnit,
        n_components: usize,
        layers: Vec<Layer>,
    ) -> Result<Scene, ConfigError> {
        let mut wavelengths = Vec::with_capacity(wavelengths_um.len());
        for &um in wavelengths_um {
            wavelengths.push(wavelength_key(um)?);
        }
        let scene = Scene {
            wavelengths,
            max_radius,
            source,
            input_unit,
            n_components,
            layers,
        };
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Scene, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let scene: Scene = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(scene)
    }

    /// Re-checks every scene invariant. Construction already runs this; the
    /// orchestrator runs it once more before computing so that no partial
    /// result can ever be produced from a bad scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.is_empty() || self.layers.len() > MAX_LAYERS {
            return Err(ConfigError::LayerCount(self.layers.len()));
        }
        for &nm in &self.wavelengths {
            if !wavelength::is_supported(nm) {
                return Err(ConfigError::InvalidWavelength(wavelength::um_from_nm(nm)));
            }
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if !components::is_supported_rh(layer.relative_humidity) {
                return Err(ConfigError::InvalidRelativeHumidity(layer.relative_humidity));
            }
            if layer.concentration.len() != self.n_components {
                return Err(ConfigError::ComponentCountMismatch {
                    layer: i + 1,
                    expected: self.n_components,
                    found: layer.concentration.len(),
                });
            }
            for comp in layer.concentration.keys() {
                if comp.index() as usize > self.n_components {
                    return Err(ConfigError::InvalidComponentIndex {
                        layer: i + 1,
                        index: comp.index(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Requested wavelengths as nanometre keys.
    pub fn wavelengths(&self) -> &[u32] {
        &self.wavelengths
    }

    /// Integration cutoff radius (µm).
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn source(&self) -> &ComponentSource {
        &self.source
    }

    pub fn input_unit(&self) -> InputUnit {
        self.input_unit
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

fn wavelength_key(um: f64) -> Result<u32, ConfigError> {
    let nm = wavelength::nm_from_um(um);
    if wavelength::is_supported(nm) && (um * 1000.0 - nm as f64).abs() < 1e-6 {
        Ok(nm)
    } else {
        Err(ConfigError::InvalidWavelength(um))
    }
}

// Deserializes a Scene from its JSON shape, converting legacy numeric codes
// (input unit, profile type, component indices) into their typed forms and
// running full validation before the value is handed out.
impl<'de> Deserialize<'de> for Scene {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SceneHelper {
            wavelengths: Vec<f64>,
            max_radius: f64,
            component_dir: String,
            input_unit: u8,
            n_components: usize,
            layers: Vec<LayerHelper>,
        }

        #[derive(Deserialize)]
        struct LayerHelper {
            relative_humidity: u8,
            profile_type: u8,
            profile_params: Vec<f64>,
            concentration: BTreeMap<u32, f64>,
        }

        let helper = SceneHelper::deserialize(deserializer)?;

        let input_unit = InputUnit::from_code(helper.input_unit).map_err(D::Error::custom)?;
        let source = ComponentSource::from_config(&helper.component_dir);

        let mut layers = Vec::with_capacity(helper.layers.len());
        for (i, layer) in helper.layers.iter().enumerate() {
            let profile = Profile::from_code(layer.profile_type, &layer.profile_params)
                .map_err(|e| D::Error::custom(ConfigError::from(e)))?;

            let mut concentration = BTreeMap::new();
            for (&index, &value) in &layer.concentration {
                let comp = ComponentId::from_index(index).ok_or_else(|| {
                    D::Error::custom(ConfigError::InvalidComponentIndex {
                        layer: i + 1,
                        index,
                    })
                })?;
                concentration.insert(comp, value);
            }

            layers.push(Layer::new(layer.relative_humidity, profile, concentration));
        }

        Scene::new(
            &helper.wavelengths,
            helper.max_radius,
            source,
            input_unit,
            helper.n_components,
            layers,
        )
        .map_err(D::Error::custom)
    }
}
