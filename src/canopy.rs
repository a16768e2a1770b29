use crate::errors::{CropPetResult, ensure_positive};

// Leaf area index of clipped grass [m2 leaf m-2 soil] from crop height [m]
pub fn lai_clipped_grass(h: f64) -> f64 {
    24.0 * h
}

// Active (sunlit) leaf area index, roughly the upper half of the canopy
pub fn lai_active(lai: f64) -> f64 {
    0.5 * lai
}

// Bulk surface resistance [s m-1] (eq. 5)
pub fn surface_resistance(lai_active: f64, rl: f64) -> f64 {
    rl / lai_active
}

// Stomatal parameters of the canopy
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanopyParams {
    pub rl: f64, // Bulk stomatal resistance of the well-illuminated leaf [s m-1]
}

impl CanopyParams {
    pub fn new() -> Self {
        CanopyParams {
            rl: 100.0, // Well-watered conditions
        }
    }

    // Surface resistance for a canopy with total leaf area index lai
    pub fn resistance(&self, lai: f64) -> CropPetResult<f64> {
        let lai = ensure_positive("leaf area index", lai)?;
        let rl = ensure_positive("leaf resistance", self.rl)?;
        Ok(surface_resistance(lai_active(lai), rl))
    }
}

impl Default for CanopyParams {
    fn default() -> Self {
        Self::new()
    }
}
