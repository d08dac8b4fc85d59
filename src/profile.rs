//! Vertical number-density profiles
//!
//! Each layer carries a profile shape describing how its aerosol number
//! density varies with altitude. Aerosol optical depth is the closed-form
//! integral of extinction times that shape over the layer's altitude range,
//! so no numerical quadrature is involved.

use std::fmt;

/// Altitude profile of a layer, altitudes in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Profile {
    /// Density decays as `exp(-z / scale_height)`.
    Exponential {
        z_min: f64,
        z_max: f64,
        scale_height: f64,
    },
    /// Constant density slab.
    Homogeneous { z_min: f64, z_max: f64, density: f64 },
    /// Density follows `c3 z^3 + c2 z^2 + c1 z + c0`.
    Cubic {
        z_min: f64,
        z_max: f64,
        c3: f64,
        c2: f64,
        c1: f64,
        c0: f64,
    },
}

#[derive(Debug, PartialEq)]
pub enum ProfileError {
    /// Profile type code other than 0 (exponential), 1 (homogeneous) or
    /// 2 (cubic).
    InvalidProfileType(u8),
    ParamCount {
        profile_type: u8,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::InvalidProfileType(code) => {
                write!(f, "Invalid profile type {} (expected 0, 1 or 2)", code)
            }
            ProfileError::ParamCount {
                profile_type,
                expected,
                found,
            } => write!(
                f,
                "Profile type {} takes {} parameters, got {}",
                profile_type, expected, found
            ),
        }
    }
}

impl std::error::Error for ProfileError {}

impl Profile {
    /// Builds a profile from its legacy numeric type code and parameter list:
    /// type 0 is exponential `[z_min, z_max, scale_height]`, type 1 is
    /// homogeneous `[z_min, z_max, density]`, type 2 is cubic
    /// `[z_min, z_max, c3, c2, c1, c0]`.
    pub fn from_code(profile_type: u8, params: &[f64]) -> Result<Profile, ProfileError> {
        let expect = |n: usize| {
            if params.len() == n {
                Ok(())
            } else {
                Err(ProfileError::ParamCount {
                    profile_type,
                    expected: n,
                    found: params.len(),
                })
            }
        };
        match profile_type {
            0 => {
                expect(3)?;
                Ok(Profile::Exponential {
                    z_min: params[0],
                    z_max: params[1],
                    scale_height: params[2],
                })
            }
            1 => {
                expect(3)?;
                Ok(Profile::Homogeneous {
                    z_min: params[0],
                    z_max: params[1],
                    density: params[2],
                })
            }
            2 => {
                expect(6)?;
                Ok(Profile::Cubic {
                    z_min: params[0],
                    z_max: params[1],
                    c3: params[2],
                    c2: params[3],
                    c1: params[4],
                    c0: params[5],
                })
            }
            code => Err(ProfileError::InvalidProfileType(code)),
        }
    }

    /// Aerosol optical depth of this profile for an extinction coefficient
    /// `ext` (1/km) at the layer base density.
    ///
    /// `z_max >= z_min` is assumed, not enforced; an inverted range yields a
    /// signed (negative) contribution, which callers building layer
    /// cancellation schemes may rely on.
    pub fn aod(&self, ext: f64) -> f64 {
        match *self {
            Profile::Exponential {
                z_min,
                z_max,
                scale_height,
            } => ext * scale_height * ((-z_min / scale_height).exp() - (-z_max / scale_height).exp()),
            Profile::Homogeneous {
                z_min,
                z_max,
                density,
            } => ext * (z_max - z_min) * density,
            Profile::Cubic {
                z_min,
                z_max,
                c3,
                c2,
                c1,
                c0,
            } => {
                ext * ((c3 / 4.0) * (z_max.powi(4) - z_min.powi(4))
                    + (c2 / 3.0) * (z_max.powi(3) - z_min.powi(3))
                    + (c1 / 2.0) * (z_max.powi(2) - z_min.powi(2))
                    + c0 * (z_max - z_min))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_homogeneous_slab() {
        let profile = Profile::from_code(1, &[0.0, 2.0, 1.0]).unwrap();
        assert_eq!(profile.aod(10.0), 20.0);
    }

    #[test]
    fn test_exponential_closed_form() {
        let profile = Profile::from_code(0, &[0.0, 2.0, 8.0]).unwrap();
        let expected = 5.0 * 8.0 * (1.0 - (-2.0f64 / 8.0).exp());
        assert_relative_eq!(profile.aod(5.0), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_cubic_polynomial() {
        // density(z) = z^3 - 2 z^2 + 3 z + 4 over [1, 3]
        let profile = Profile::from_code(2, &[1.0, 3.0, 1.0, -2.0, 3.0, 4.0]).unwrap();
        let expected = (3.0f64.powi(4) - 1.0) / 4.0 - 2.0 * (3.0f64.powi(3) - 1.0) / 3.0
            + 3.0 * (3.0f64.powi(2) - 1.0) / 2.0
            + 4.0 * 2.0;
        assert_relative_eq!(profile.aod(1.0), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_inverted_range_is_signed() {
        let profile = Profile::from_code(1, &[2.0, 0.0, 1.0]).unwrap();
        assert_eq!(profile.aod(10.0), -20.0);
    }

    #[test]
    fn test_nan_extinction_propagates() {
        let profile = Profile::from_code(1, &[0.0, 2.0, 1.0]).unwrap();
        assert!(profile.aod(f64::NAN).is_nan());
    }

    #[test]
    fn test_invalid_profile_type() {
        assert_eq!(
            Profile::from_code(3, &[0.0, 2.0, 8.0]),
            Err(ProfileError::InvalidProfileType(3))
        );
    }

    #[test]
    fn test_param_count_mismatch() {
        assert_eq!(
            Profile::from_code(2, &[0.0, 2.0, 8.0]),
            Err(ProfileError::ParamCount {
                profile_type: 2,
                expected: 6,
                found: 3
            })
        );
        assert!(Profile::from_code(1, &[2.0, 2.0]).is_err());
    }
}
