//! Component database access
//!
//! Each aerosol component, per relative-humidity bin, has one text file
//! holding a lognormal size-distribution header and a table of Mie-derived
//! optical coefficients at the 61 tabulated wavelengths. Files are written
//! once by the (external) table-generation tooling and read here into
//! immutable records.
//!
//! File layout: `#`-prefixed header lines carrying `key: value` pairs
//! (minimum radius, maximum radius, sigma, rho, Rmod), then one
//! comma-separated row per wavelength:
//!
//! ```text
//! #WS50
//! # size distribution: lognormal
//! #    minimum radius[um]:  0.005
//! #    maximum radius[um]:  20
//! #    sigma:               2.24
//! #    rho[g/cm**3]:        1.38
//! #    Rmod [um]:           0.0262
//! #optical parameters
//! Wavelength[um]  Ext.Coeff[1/km] ...
//! 2.500000e-01,  1.234e-05,  1.100e-05,  ...
//! ```
//!
//! The header parser is strict: a missing required field is a loud error,
//! never a silently defaulted value.

use log::debug;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::components::ComponentId;
use crate::config::ComponentSource;
use crate::wavelength::{self, SUPPORTED_WAVELENGTHS};

pub mod error;
pub use error::OptDataError;

/// Lognormal size-distribution parameters of one component at one RH bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeDistribution {
    /// Smallest particle radius (µm).
    pub r_min: f64,
    /// Largest particle radius (µm).
    pub r_max: f64,
    /// Geometric standard deviation, > 1.
    pub sigma: f64,
    /// Particle density (g/cm³).
    pub rho: f64,
    /// Mode radius (µm).
    pub r_mod: f64,
}

/// Per-wavelength optical coefficients for unit number density (1/cm³).
/// Coefficients are in 1/km; `ssa`, `g` and the refractive-index parts are
/// dimensionless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalRecord {
    pub ext: f64,
    pub sca: f64,
    pub abs: f64,
    pub ssa: f64,
    pub g: f64,
    pub ext_norm: f64,
    pub n_real: f64,
    pub n_imag: f64,
}

impl OpticalRecord {
    pub const ZERO: OpticalRecord = OpticalRecord {
        ext: 0.0,
        sca: 0.0,
        abs: 0.0,
        ssa: 0.0,
        g: 0.0,
        ext_norm: 0.0,
        n_real: 0.0,
        n_imag: 0.0,
    };

    pub fn coefficient(&self, kind: Coefficient) -> f64 {
        match kind {
            Coefficient::Extinction => self.ext,
            Coefficient::Scattering => self.sca,
            Coefficient::Absorption => self.abs,
        }
    }
}

/// The three concentration-additive bulk coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    Extinction,
    Scattering,
    Absorption,
}

/// Everything known about one component at one RH bin.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub size: SizeDistribution,
    /// Optical coefficients keyed by wavelength (nm); complete over the
    /// tabulated wavelength set.
    pub optics: BTreeMap<u32, OpticalRecord>,
}

/// Resolves `(component, relative humidity)` to data files in one database
/// directory and parses them.
#[derive(Debug, Clone)]
pub struct ComponentStore {
    dir: PathBuf,
}

impl ComponentStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self, OptDataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(OptDataError::DirectoryNotFound(dir));
        }
        Ok(Self { dir })
    }

    pub fn from_source(source: &ComponentSource) -> Result<Self, OptDataError> {
        Self::new(source.directory())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a component's data is expected in at the given humidity. Dry
    /// components resolve to their 0% file.
    pub fn path_for(&self, component: ComponentId, rh: u8) -> PathBuf {
        self.dir.join(component.data_file_name(rh))
    }

    pub fn exists(&self, component: ComponentId, rh: u8) -> bool {
        self.path_for(component, rh).is_file()
    }

    pub fn load(
        &self,
        component: ComponentId,
        rh: u8,
    ) -> Result<ComponentRecord, OptDataError> {
        let path = self.path_for(component, rh);
        if !path.is_file() {
            return Err(OptDataError::ComponentDataNotFound {
                component,
                relative_humidity: rh,
                path,
            });
        }
        let record = parse_component_file(&path)?;
        debug!(
            "loaded component {} at {}% RH from {}",
            component,
            rh,
            path.display()
        );
        Ok(record)
    }
}

const HEADER_FIELDS: [&str; 5] = ["minimum radius", "maximum radius", "sigma", "rho", "Rmod"];

fn parse_component_file(path: &Path) -> Result<ComponentRecord, OptDataError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut header: [Option<f64>; 5] = [None; 5];
    let mut optics = BTreeMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;

        if let Some(rest) = line.strip_prefix('#') {
            if let Some((key, value)) = rest.split_once(':') {
                for (slot, field) in header.iter_mut().zip(HEADER_FIELDS) {
                    if key.contains(field) {
                        *slot = Some(parse_number(value, path, line_no)?);
                    }
                }
            }
        } else if line.contains(',') {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 9 {
                return Err(OptDataError::Malformed {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("expected 9 comma-separated values, got {}", fields.len()),
                });
            }
            let mut values = [0.0f64; 9];
            for (slot, field) in values.iter_mut().zip(fields.iter().copied()) {
                *slot = parse_number(field, path, line_no)?;
            }
            let nm = wavelength::nm_from_um(values[0]);
            optics.insert(
                nm,
                OpticalRecord {
                    ext: values[1],
                    sca: values[2],
                    abs: values[3],
                    ssa: values[4],
                    g: values[5],
                    ext_norm: values[6],
                    n_real: values[7],
                    n_imag: values[8],
                },
            );
        }
        // Anything else (column captions, blank lines) carries no data.
    }

    for (slot, field) in header.iter().zip(HEADER_FIELDS) {
        if slot.is_none() {
            return Err(OptDataError::MissingHeaderField {
                field,
                path: path.to_path_buf(),
            });
        }
    }
    for &nm in SUPPORTED_WAVELENGTHS {
        if !optics.contains_key(&nm) {
            return Err(OptDataError::MissingWavelength {
                wavelength: nm,
                path: path.to_path_buf(),
            });
        }
    }

    Ok(ComponentRecord {
        size: SizeDistribution {
            r_min: header[0].unwrap(),
            r_max: header[1].unwrap(),
            sigma: header[2].unwrap(),
            rho: header[3].unwrap(),
            r_mod: header[4].unwrap(),
        },
        optics,
    })
}

fn parse_number(text: &str, path: &Path, line_no: usize) -> Result<f64, OptDataError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| OptDataError::Malformed {
            path: path.to_path_buf(),
            line: line_no,
            message: format!("'{}' is not a number", text.trim()),
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wavelength::um_from_nm;
    use std::fmt::Write as _;
    use std::io::Write as _;
    use tempfile::tempdir;

    pub(crate) fn component_file_contents(
        r_min: f64,
        r_max: f64,
        sigma: f64,
        rho: f64,
        r_mod: f64,
        row: impl Fn(u32) -> [f64; 8],
    ) -> String {
        let mut s = String::new();
        s.push_str("#test component\n");
        s.push_str("# size distribution: lognormal\n");
        writeln!(s, "#\tminimum radius[um]:\t{}", r_min).unwrap();
        writeln!(s, "#\tmaximum radius[um]:\t{}", r_max).unwrap();
        writeln!(s, "#\tsigma:\t{}", sigma).unwrap();
        writeln!(s, "#\trho[g/cm**3]:\t{}", rho).unwrap();
        writeln!(s, "#\tRmod [um]:\t{}", r_mod).unwrap();
        s.push_str("#optical parameters\n");
        s.push_str("Wavelength[um]\tExt.Coeff[1/km]\tSca.Coeff[1/km]\tAbs.Coeff[1/km]\tSSA\tg\tNorm.Ext.Coeff\tRe(ref.index)\tIm(ref.index)\n");
        for &nm in SUPPORTED_WAVELENGTHS {
            let v = row(nm);
            writeln!(
                s,
                "{:e},\t{:e},\t{:e},\t{:e},\t{:e},\t{:e},\t{:e},\t{:e},\t{:e}",
                um_from_nm(nm),
                v[0],
                v[1],
                v[2],
                v[3],
                v[4],
                v[5],
                v[6],
                v[7]
            )
            .unwrap();
        }
        s
    }

    pub(crate) fn write_component(dir: &Path, name: &str, contents: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn uniform_row(_nm: u32) -> [f64; 8] {
        [2.0e-5, 1.8e-5, 0.2e-5, 0.9, 0.7, 1.0, 1.53, 0.008]
    }

    #[test]
    fn test_load_component_record() {
        let dir = tempdir().unwrap();
        let contents = component_file_contents(0.005, 20.0, 2.24, 1.38, 0.0262, uniform_row);
        write_component(dir.path(), "WS50", &contents);

        let store = ComponentStore::new(dir.path()).unwrap();
        let record = store.load(ComponentId::WaterSoluble, 50).unwrap();

        assert_eq!(record.size.r_min, 0.005);
        assert_eq!(record.size.r_max, 20.0);
        assert_eq!(record.size.sigma, 2.24);
        assert_eq!(record.size.rho, 1.38);
        assert_eq!(record.size.r_mod, 0.0262);
        assert_eq!(record.optics.len(), SUPPORTED_WAVELENGTHS.len());
        assert_eq!(record.optics[&550].ext, 2.0e-5);
        assert_eq!(record.optics[&550].coefficient(Coefficient::Scattering), 1.8e-5);
    }

    #[test]
    fn test_dry_component_resolves_to_dry_file() {
        let dir = tempdir().unwrap();
        let contents = component_file_contents(0.005, 20.0, 2.51, 2.0, 0.471, uniform_row);
        write_component(dir.path(), "IS00", &contents);

        let store = ComponentStore::new(dir.path()).unwrap();
        assert!(store.exists(ComponentId::Insoluble, 80));
        assert!(store.load(ComponentId::Insoluble, 80).is_ok());
    }

    #[test]
    fn test_missing_component_file() {
        let dir = tempdir().unwrap();
        let store = ComponentStore::new(dir.path()).unwrap();

        let err = store.load(ComponentId::Soot, 0).unwrap_err();
        assert!(matches!(
            err,
            OptDataError::ComponentDataNotFound {
                component: ComponentId::Soot,
                relative_humidity: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_header_field_is_loud() {
        let dir = tempdir().unwrap();
        let contents = component_file_contents(0.005, 20.0, 2.24, 1.38, 0.0262, uniform_row);
        let without_sigma: String = contents
            .lines()
            .filter(|l| !l.contains("sigma:"))
            .map(|l| format!("{}\n", l))
            .collect();
        write_component(dir.path(), "WS50", &without_sigma);

        let store = ComponentStore::new(dir.path()).unwrap();
        let err = store.load(ComponentId::WaterSoluble, 50).unwrap_err();
        assert!(matches!(
            err,
            OptDataError::MissingHeaderField { field: "sigma", .. }
        ));
    }

    #[test]
    fn test_incomplete_wavelength_table() {
        let dir = tempdir().unwrap();
        let contents = component_file_contents(0.005, 20.0, 2.24, 1.38, 0.0262, uniform_row);
        let truncated: String = contents
            .lines()
            .filter(|l| !l.starts_with("4e0,"))
            .map(|l| format!("{}\n", l))
            .collect();
        write_component(dir.path(), "WS50", &truncated);

        let store = ComponentStore::new(dir.path()).unwrap();
        let err = store.load(ComponentId::WaterSoluble, 50).unwrap_err();
        assert!(matches!(
            err,
            OptDataError::MissingWavelength {
                wavelength: 4000,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_row() {
        let dir = tempdir().unwrap();
        let mut contents = component_file_contents(0.005, 20.0, 2.24, 1.38, 0.0262, uniform_row);
        contents.push_str("5e-1, not-a-number, 1, 1, 1, 1, 1, 1, 1\n");
        write_component(dir.path(), "WS50", &contents);

        let store = ComponentStore::new(dir.path()).unwrap();
        let err = store.load(ComponentId::WaterSoluble, 50).unwrap_err();
        assert!(matches!(err, OptDataError::Malformed { .. }));
    }

    #[test]
    fn test_directory_not_found() {
        let err = ComponentStore::new("/definitely/not/here").unwrap_err();
        assert!(matches!(err, OptDataError::DirectoryNotFound(_)));
    }
}
