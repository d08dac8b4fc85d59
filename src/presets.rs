//! Regional aerosol-type presets
//!
//! Ready-made six-layer scenes for common aerosol climatologies. Each preset
//! fixes the component concentrations of the mixed layer and the vertical
//! structure (mixed layer, an optional residual slab, free troposphere with
//! a background water-soluble/soot mix, a stratospheric sulfate slab, and
//! two spare upper layers); the caller picks the wavelengths and the mixed
//! layer humidity.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::components::ComponentId;
use crate::config::{ComponentSource, ConfigError, InputUnit, Layer, Scene};
use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AerosolType {
    Default,
    Antarctic,
    Arctic,
    ContinentalAverage,
    ContinentalClean,
    ContinentalPolluted,
    Desert,
    MaritimeClean,
    MaritimePolluted,
    MaritimeTropical,
    Urban,
}

impl AerosolType {
    /// Builds the preset scene for this type. Concentrations are number
    /// densities (1/cm³); `mixed_layer_rh` applies to the lowest layer only.
    pub fn scene(&self, wavelengths_um: &[f64], mixed_layer_rh: u8) -> Result<Scene, ConfigError> {
        let n_components = 9;

        // Shared vertical structure. Layer 1 is overridden per type below.
        let mut mixed_profile = exponential(0.0, 2.0, 8.0);
        let mut residual_profile = homogeneous(2.0, 2.0, 11.0);
        let mut troposphere_profile = exponential(2.0, 12.0, 8.0);
        let stratosphere_profile = homogeneous(12.0, 35.0, 1.0);

        let mut mixed = zeros(n_components);
        let mut residual = zeros(n_components);
        residual.insert(ComponentId::MineralAccumulation, 1.8633);
        let mut troposphere = zeros(n_components);
        troposphere.insert(ComponentId::Insoluble, 0.0013);
        troposphere.insert(ComponentId::WaterSoluble, 438.0);
        troposphere.insert(ComponentId::Soot, 294.0);
        troposphere.insert(ComponentId::MineralNucleation, 2.0);
        let mut stratosphere = zeros(n_components);
        stratosphere.insert(ComponentId::Sulfate, 3.0);

        match self {
            AerosolType::Default => {}
            AerosolType::Antarctic => {
                mixed.insert(ComponentId::SeaSaltAccumulation, 0.047);
                mixed.insert(ComponentId::MineralAccumulation, 3.993e-2);
                mixed.insert(ComponentId::Sulfate, 42.9);
                mixed_profile = exponential(0.0, 10.0, 8.0);
                residual_profile = homogeneous(10.0, 10.0, 11.0);
                troposphere_profile = exponential(10.0, 12.0, 8.0);
            }
            AerosolType::Arctic => {
                mixed.insert(ComponentId::Insoluble, 0.01);
                mixed.insert(ComponentId::WaterSoluble, 1300.0);
                mixed.insert(ComponentId::Soot, 5300.0);
                mixed.insert(ComponentId::SeaSaltAccumulation, 1.9);
                mixed_profile = homogeneous(0.0, 2.0, 1.0);
            }
            AerosolType::ContinentalAverage => {
                mixed.insert(ComponentId::Insoluble, 0.4);
                mixed.insert(ComponentId::WaterSoluble, 7000.0);
                mixed.insert(ComponentId::Soot, 8300.0);
            }
            AerosolType::ContinentalClean => {
                mixed.insert(ComponentId::Insoluble, 0.15);
                mixed.insert(ComponentId::WaterSoluble, 2600.0);
            }
            AerosolType::ContinentalPolluted => {
                mixed.insert(ComponentId::Insoluble, 0.6);
                mixed.insert(ComponentId::WaterSoluble, 15700.0);
                mixed.insert(ComponentId::Soot, 34300.0);
            }
            AerosolType::Desert => {
                mixed.insert(ComponentId::WaterSoluble, 2000.0);
                mixed.insert(ComponentId::MineralNucleation, 269.5);
                mixed.insert(ComponentId::MineralAccumulation, 30.5);
                mixed.insert(ComponentId::MineralCoarse, 0.142);
                mixed_profile = exponential(0.0, 6.0, 8.0);
                residual_profile = homogeneous(6.0, 6.0, 11.0);
                troposphere_profile = exponential(6.0, 12.0, 8.0);
            }
            AerosolType::MaritimeClean => {
                mixed.insert(ComponentId::WaterSoluble, 1500.0);
                mixed.insert(ComponentId::SeaSaltAccumulation, 20.0);
                mixed.insert(ComponentId::SeaSaltCoarse, 3.2e-3);
                mixed_profile = exponential(0.0, 2.0, 1.0);
            }
            AerosolType::MaritimePolluted => {
                mixed.insert(ComponentId::WaterSoluble, 3800.0);
                mixed.insert(ComponentId::Soot, 5180.0);
                mixed.insert(ComponentId::SeaSaltAccumulation, 20.0);
                mixed.insert(ComponentId::SeaSaltCoarse, 3.2e-3);
                mixed_profile = exponential(0.0, 2.0, 1.0);
            }
            AerosolType::MaritimeTropical => {
                mixed.insert(ComponentId::WaterSoluble, 590.0);
                mixed.insert(ComponentId::SeaSaltAccumulation, 10.0);
                mixed.insert(ComponentId::SeaSaltCoarse, 1.3e-3);
                mixed_profile = exponential(0.0, 2.0, 1.0);
            }
            AerosolType::Urban => {
                mixed.insert(ComponentId::Insoluble, 1.5);
                mixed.insert(ComponentId::WaterSoluble, 28000.0);
                mixed.insert(ComponentId::Soot, 130000.0);
            }
        }

        let spare_profile = exponential(35.0, 35.0, 8.0);
        let layers = vec![
            Layer::new(mixed_layer_rh, mixed_profile, mixed),
            Layer::new(50, residual_profile, residual),
            Layer::new(50, troposphere_profile, troposphere),
            Layer::new(0, stratosphere_profile, stratosphere),
            Layer::new(0, spare_profile, zeros(n_components)),
            Layer::new(0, spare_profile, zeros(n_components)),
        ];

        Scene::new(
            wavelengths_um,
            5.0,
            ComponentSource::Bundled,
            InputUnit::NumberDensity,
            n_components,
            layers,
        )
    }
}

impl FromStr for AerosolType {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "default" => Ok(AerosolType::Default),
            "antarctic" => Ok(AerosolType::Antarctic),
            "arctic" => Ok(AerosolType::Arctic),
            "continental average" => Ok(AerosolType::ContinentalAverage),
            "continental clean" => Ok(AerosolType::ContinentalClean),
            "continental polluted" => Ok(AerosolType::ContinentalPolluted),
            "desert" => Ok(AerosolType::Desert),
            "maritime clean" => Ok(AerosolType::MaritimeClean),
            "maritime polluted" => Ok(AerosolType::MaritimePolluted),
            "maritime tropical" => Ok(AerosolType::MaritimeTropical),
            "urban" => Ok(AerosolType::Urban),
            other => Err(format!("unknown aerosol type '{}'", other)),
        }
    }
}

impl Display for AerosolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AerosolType::Default => "default",
            AerosolType::Antarctic => "antarctic",
            AerosolType::Arctic => "arctic",
            AerosolType::ContinentalAverage => "continental average",
            AerosolType::ContinentalClean => "continental clean",
            AerosolType::ContinentalPolluted => "continental polluted",
            AerosolType::Desert => "desert",
            AerosolType::MaritimeClean => "maritime clean",
            AerosolType::MaritimePolluted => "maritime polluted",
            AerosolType::MaritimeTropical => "maritime tropical",
            AerosolType::Urban => "urban",
        };
        write!(f, "{}", name)
    }
}

fn zeros(n_components: usize) -> BTreeMap<ComponentId, f64> {
    (1..=n_components as u32)
        .map(|i| (ComponentId::from_index(i).unwrap(), 0.0))
        .collect()
}

fn exponential(z_min: f64, z_max: f64, scale_height: f64) -> Profile {
    Profile::Exponential {
        z_min,
        z_max,
        scale_height,
    }
}

fn homogeneous(z_min: f64, z_max: f64, density: f64) -> Profile {
    Profile::Homogeneous {
        z_min,
        z_max,
        density,
    }
}
