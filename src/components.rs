//! Aerosol component identities
//!
//! Nine standard components plus an open-ended range of user-defined custom
//! components. Each component maps to a data file in the component database,
//! keyed by name and relative-humidity bin. The hygroscopic components grow
//! with humidity and have one file per RH bin; the dry components always
//! resolve to their 0% file.

use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Relative humidities (%) for which component data files exist.
pub const SUPPORTED_RH: &[u8] = &[0, 50, 70, 80, 90, 95, 98, 99];

pub fn is_supported_rh(rh: u8) -> bool {
    SUPPORTED_RH.contains(&rh)
}

/// Two-digit file suffix for a relative-humidity bin.
pub fn rh_suffix(rh: u8) -> String {
    if rh == 0 {
        "00".to_string()
    } else {
        rh.to_string()
    }
}

/// A component of an aerosol mixture.
///
/// The nine standard components carry legacy integer indices 1-9; custom
/// components occupy the open range from 10 upward, with `Custom(n)`
/// corresponding to index `9 + n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentId {
    Insoluble,
    WaterSoluble,
    Soot,
    SeaSaltAccumulation,
    SeaSaltCoarse,
    MineralNucleation,
    MineralAccumulation,
    MineralCoarse,
    Sulfate,
    Custom(u32),
}

impl ComponentId {
    /// Legacy integer index (1-9 standard, >= 10 custom).
    pub fn index(&self) -> u32 {
        match self {
            ComponentId::Insoluble => 1,
            ComponentId::WaterSoluble => 2,
            ComponentId::Soot => 3,
            ComponentId::SeaSaltAccumulation => 4,
            ComponentId::SeaSaltCoarse => 5,
            ComponentId::MineralNucleation => 6,
            ComponentId::MineralAccumulation => 7,
            ComponentId::MineralCoarse => 8,
            ComponentId::Sulfate => 9,
            ComponentId::Custom(n) => 9 + n,
        }
    }

    pub fn from_index(index: u32) -> Option<ComponentId> {
        match index {
            1 => Some(ComponentId::Insoluble),
            2 => Some(ComponentId::WaterSoluble),
            3 => Some(ComponentId::Soot),
            4 => Some(ComponentId::SeaSaltAccumulation),
            5 => Some(ComponentId::SeaSaltCoarse),
            6 => Some(ComponentId::MineralNucleation),
            7 => Some(ComponentId::MineralAccumulation),
            8 => Some(ComponentId::MineralCoarse),
            9 => Some(ComponentId::Sulfate),
            n if n >= 10 => Some(ComponentId::Custom(n - 9)),
            _ => None,
        }
    }

    /// Short name used as the data-file stem.
    pub fn name(&self) -> String {
        match self {
            ComponentId::Insoluble => "IS".to_string(),
            ComponentId::WaterSoluble => "WS".to_string(),
            ComponentId::Soot => "BC".to_string(),
            ComponentId::SeaSaltAccumulation => "SSam".to_string(),
            ComponentId::SeaSaltCoarse => "SScm".to_string(),
            ComponentId::MineralNucleation => "MDnm".to_string(),
            ComponentId::MineralAccumulation => "MDam".to_string(),
            ComponentId::MineralCoarse => "MDcm".to_string(),
            ComponentId::Sulfate => "SUSO".to_string(),
            ComponentId::Custom(n) => format!("custom{}", n),
        }
    }

    /// Whether this component's size and optics are insensitive to humidity.
    /// Dry components always load their 0%-RH data file.
    pub fn is_dry(&self) -> bool {
        matches!(
            self,
            ComponentId::Insoluble
                | ComponentId::Soot
                | ComponentId::MineralNucleation
                | ComponentId::MineralAccumulation
                | ComponentId::MineralCoarse
        )
    }

    /// Data-file name for this component at the given relative humidity.
    pub fn data_file_name(&self, rh: u8) -> String {
        let suffix = if self.is_dry() {
            "00".to_string()
        } else {
            rh_suffix(rh)
        };
        match self {
            ComponentId::Custom(_) => format!("{}_{}", self.name(), suffix),
            _ => format!("{}{}", self.name(), suffix),
        }
    }

    /// Empirical correction applied to the integrated volume of the mineral
    /// modes, compensating the fixed-grid truncation of their broad
    /// distributions. All other components are uncorrected.
    pub fn truncation_correction(&self) -> f64 {
        match self {
            ComponentId::MineralNucleation => 0.9754,
            ComponentId::MineralAccumulation | ComponentId::MineralCoarse => 0.9273,
            _ => 1.0,
        }
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Serialized as the legacy integer index so concentration and output maps
// keyed by component keep their familiar JSON shape.
impl Serialize for ComponentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.index())
    }
}
