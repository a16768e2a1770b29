use crate::errors::{CropPetError, CropPetResult, ensure_positive};
use log::trace;
use serde::Deserialize;

// Zero plane displacement height [m] from crop height [m]
pub fn displacement_height(h: f64) -> f64 {
    2.0 / 3.0 * h
}

// Roughness length governing momentum transfer [m]
pub fn roughness_momentum(h: f64) -> f64 {
    0.123 * h
}

// Roughness length governing transfer of heat and vapour [m]
pub fn roughness_heat(zom: f64) -> f64 {
    0.1 * zom
}

/// Aerodynamic resistance [s m-1] (Allen et al. 1998, eq. 4).
///
/// `d`, `zom` and `zoh` in metres, `ws` is the wind speed [m s-1] measured at
/// `zm`, humidity is measured at `zh`, `k` is von Karman's constant.
pub fn aerodynamic_resistance(
    d: f64,
    zom: f64,
    zoh: f64,
    ws: f64,
    zh: f64,
    zm: f64,
    k: f64,
) -> f64 {
    (((zm - d) / zom).ln() * ((zh - d) / zoh).ln()) / (k.powi(2) * ws)
}

// Measurement heights and constants of the aerodynamic resistance
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AerodynamicParams {
    pub zh: f64, // Height of humidity measurements [m]
    pub zm: f64, // Height of wind measurements [m]
    pub k: f64,  // von Karman's constant [-]
}

impl AerodynamicParams {
    pub fn new() -> Self {
        AerodynamicParams {
            zh: 2.0,
            zm: 10.0,
            k: 0.41,
        }
    }

    // Aerodynamic resistance over a crop of height h [m] for wind speed ws [m s-1] at zm
    pub fn resistance(&self, h: f64, ws: f64) -> CropPetResult<f64> {
        let h = ensure_positive("crop height", h)?;
        let ws = ensure_positive("wind speed", ws)?;
        let d = displacement_height(h);
        let zom = roughness_momentum(h);
        let zoh = roughness_heat(zom);

        // Both measurement heights must sit above the displacement plane
        if self.zm - d <= zom {
            return Err(CropPetError::InvalidParameter {
                name: "wind measurement height",
                value: self.zm,
            });
        }
        if self.zh - d <= zoh {
            return Err(CropPetError::InvalidParameter {
                name: "humidity measurement height",
                value: self.zh,
            });
        }

        let ra = aerodynamic_resistance(d, zom, zoh, ws, self.zh, self.zm, self.k);
        trace!("ra({h:.3} m, {ws:.2} m/s) = {ra:.2} s/m");
        Ok(ra)
    }
}

impl Default for AerodynamicParams {
    fn default() -> Self {
        Self::new()
    }
}
