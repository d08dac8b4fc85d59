use crate::profile::ProfileError;

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Wavelength (µm) outside the 61-value tabulated set.
    InvalidWavelength(f64),
    /// Relative humidity (%) outside the 8 tabulated bins.
    InvalidRelativeHumidity(u8),
    /// Input-unit code other than 0 (number density) or 1 (mass density).
    InvalidInputUnit(u8),
    /// A layer's concentration map does not cover exactly the declared
    /// number of components.
    ComponentCountMismatch {
        layer: usize,
        expected: usize,
        found: usize,
    },
    /// Component index outside `1..=n_components` in a layer map.
    InvalidComponentIndex { layer: usize, index: u32 },
    /// A scene must hold between 1 and 6 layers.
    LayerCount(usize),
    Profile(ProfileError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidWavelength(um) => {
                write!(f, "Invalid wavelength selection: {} um is not tabulated", um)
            }
            ConfigError::InvalidRelativeHumidity(rh) => {
                write!(f, "Invalid relative humidity value: {}%", rh)
            }
            ConfigError::InvalidInputUnit(code) => {
                write!(f, "Invalid input unit {} (expected 0 or 1)", code)
            }
            ConfigError::ComponentCountMismatch {
                layer,
                expected,
                found,
            } => write!(
                f,
                "Layer {}: {} components specified but the scene declares {}",
                layer, found, expected
            ),
            ConfigError::InvalidComponentIndex { layer, index } => {
                write!(f, "Layer {}: component index {} is out of range", layer, index)
            }
            ConfigError::LayerCount(n) => {
                write!(f, "A scene holds 1 to 6 layers, got {}", n)
            }
            ConfigError::Profile(e) => write!(f, "{}", e),
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ProfileError> for ConfigError {
    fn from(err: ProfileError) -> ConfigError {
        ConfigError::Profile(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
