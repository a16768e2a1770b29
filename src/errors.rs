use thiserror::Error;

/// Error type for invalid crop, weather or configuration input.
#[derive(Error, Debug)]
pub enum CropPetError {
    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Unknown crop '{0}' and no grass reference to fall back on")]
    UnknownCrop(String),
    #[error("Crop '{0}' appears more than once in the crop table")]
    DuplicateCrop(String),
    #[error("Invalid weather series: {0}")]
    InvalidWeather(String),
    #[error("Reference ET method needs {0}, which is missing from the weather series")]
    MissingInput(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Convenience type for `Result<T, CropPetError>`.
pub type CropPetResult<T> = Result<T, CropPetError>;

// Reject non-finite and non-positive values for strictly positive quantities
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> CropPetResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CropPetError::InvalidParameter { name, value })
    }
}
