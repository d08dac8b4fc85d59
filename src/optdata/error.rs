use crate::components::ComponentId;

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum OptDataError {
    /// The component database directory does not exist.
    DirectoryNotFound(PathBuf),
    /// No data file for a component at the requested humidity bin.
    ComponentDataNotFound {
        component: ComponentId,
        relative_humidity: u8,
        path: PathBuf,
    },
    /// A required header field is absent from a component file.
    MissingHeaderField {
        field: &'static str,
        path: PathBuf,
    },
    /// The optical table lacks a row for a tabulated wavelength.
    MissingWavelength { wavelength: u32, path: PathBuf },
    /// A line of a component file could not be parsed.
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
    Io(std::io::Error),
}

impl fmt::Display for OptDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptDataError::DirectoryNotFound(dir) => {
                write!(f, "Component file directory {} not found", dir.display())
            }
            OptDataError::ComponentDataNotFound {
                component,
                relative_humidity,
                path,
            } => write!(
                f,
                "No data for component {} at {}% RH (expected {})",
                component,
                relative_humidity,
                path.display()
            ),
            OptDataError::MissingHeaderField { field, path } => {
                write!(f, "Header field '{}' missing from {}", field, path.display())
            }
            OptDataError::MissingWavelength { wavelength, path } => write!(
                f,
                "Optical table in {} has no row at {} nm",
                path.display(),
                wavelength
            ),
            OptDataError::Malformed { path, line, message } => {
                write!(f, "{}:{}: {}", path.display(), line, message)
            }
            OptDataError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for OptDataError {}

impl From<std::io::Error> for OptDataError {
    fn from(err: std::io::Error) -> OptDataError {
        OptDataError::Io(err)
    }
}
