use std::fs;
use std::path::{Path, PathBuf};

use crate::aerodynamic::AerodynamicParams;
use crate::crop::{CropCalendar, CropStage, CropTable, REFERENCE_CROP};
use crate::errors::CropPetResult;
use crate::penman_monteith::CropEt;
use crate::reference::{Fao56PenmanMonteith, Hargreaves, ReferenceEt};
use crate::weather::DailyWeather;
use log::info;
use serde::Deserialize;

fn default_crop() -> String {
    REFERENCE_CROP.to_string()
}

// Baseline used for the crop coefficient
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceMethod {
    #[default]
    Fao56PenmanMonteith,
    Hargreaves,
}

impl ReferenceMethod {
    pub fn build(self) -> Box<dyn ReferenceEt> {
        match self {
            ReferenceMethod::Fao56PenmanMonteith => Box::new(Fao56PenmanMonteith),
            ReferenceMethod::Hargreaves => Box::new(Hargreaves),
        }
    }
}

/**
Run configuration of the `crop-pet` binary.

```toml
crop = "maize"
altitude = 100.0
reference = "fao56-penman-monteith"   # or "hargreaves"
crop_table = "crop_parameters.toml"   # optional, relative to this file

[aerodynamic]                         # optional
zm = 10.0

[[stages]]                            # optional, constant table height when absent
day = 0.0
height = 0.2

[weather]
t_min = [12.0, 13.0]
t_max = [28.0, 27.0]
rh_mean = [60.0, 65.0]
wind_speed = [3.0, 2.5]
net_rad = [15.0, 14.0]
```
*/
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_crop")]
    pub crop: String,
    #[serde(default)]
    pub altitude: f64, // Site altitude [m]
    #[serde(default)]
    pub reference: ReferenceMethod,
    #[serde(default)]
    pub crop_table: Option<PathBuf>,
    #[serde(default)]
    pub aerodynamic: AerodynamicParams,
    #[serde(default)]
    pub stages: Vec<CropStage>,
    pub weather: DailyWeather,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_toml_str(toml_str: &str) -> CropPetResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> CropPetResult<Self> {
        let path = path.as_ref();
        let mut config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    fn load_crop_table(&self) -> CropPetResult<CropTable> {
        match &self.crop_table {
            Some(table_path) => {
                let table_path = match &self.base_dir {
                    Some(dir) if table_path.is_relative() => dir.join(table_path),
                    _ => table_path.clone(),
                };
                info!("Crop table: {}", table_path.display());
                CropTable::from_file(table_path)
            }
            None => Ok(CropTable::default()),
        }
    }

    // Assemble the model described by this configuration
    pub fn build(&self) -> CropPetResult<CropEt> {
        let table = self.load_crop_table()?;
        let crop = table.get(&self.crop)?.clone();
        let calendar = if self.stages.is_empty() {
            CropCalendar::constant(crop)?
        } else {
            CropCalendar::new(crop, self.stages.clone())?
        };

        let model = CropEt::new(calendar, self.weather.clone(), self.altitude)?
            .with_aerodynamic(self.aerodynamic)
            .with_reference(self.reference.build());
        Ok(model)
    }
}
