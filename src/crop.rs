use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::canopy::{CanopyParams, lai_clipped_grass};
use crate::errors::{CropPetError, CropPetResult, ensure_positive};
use log::warn;
use serde::Deserialize;

pub const REFERENCE_CROP: &str = "grass";

fn default_rl() -> f64 {
    CanopyParams::new().rl
}

// Crop surface parameters
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CropParams {
    #[serde(skip)]
    pub name: String, // Crop name, the table key
    pub height: f64, // Crop height [m]
    #[serde(default = "default_rl")]
    pub rl: f64, // Bulk stomatal resistance of the well-illuminated leaf [s m-1]
    #[serde(default)]
    pub lai: Option<f64>, // Leaf area index [-], clipped-grass relation when absent
}

impl CropParams {
    pub fn new(name: &str, height: f64) -> Self {
        CropParams {
            name: name.to_string(),
            height,
            rl: default_rl(),
            lai: None,
        }
    }

    // FAO-56 grass reference: 0.12 m clipped grass, well watered
    pub fn grass() -> Self {
        CropParams::new(REFERENCE_CROP, 0.12)
    }

    pub fn with_lai(mut self, lai: f64) -> Self {
        self.lai = Some(lai);
        self
    }

    pub fn with_height(&self, height: f64) -> Self {
        CropParams {
            height,
            ..self.clone()
        }
    }

    pub fn leaf_area_index(&self) -> f64 {
        self.lai.unwrap_or_else(|| lai_clipped_grass(self.height))
    }

    // Bulk surface resistance [s m-1]
    pub fn surface_resistance(&self) -> CropPetResult<f64> {
        CanopyParams { rl: self.rl }.resistance(self.leaf_area_index())
    }

    pub fn validate(&self) -> CropPetResult<()> {
        ensure_positive("crop height", self.height)?;
        ensure_positive("leaf resistance", self.rl)?;
        if let Some(lai) = self.lai {
            ensure_positive("leaf area index", lai)?;
        }
        Ok(())
    }
}

/**
Table of crop parameters keyed by lower-case crop name.

The TOML layout has one table per crop:

```toml
[maize]
height = 2.0
rl = 100.0   # optional
lai = 4.0    # optional
```

Default heights are the maximum crop heights of FAO-56 Table 12.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct CropTable {
    crops: BTreeMap<String, CropParams>,
}

impl CropTable {
    pub fn from_toml_str(toml_str: &str) -> CropPetResult<Self> {
        let raw: BTreeMap<String, CropParams> = toml::from_str(toml_str)?;
        let mut crops = BTreeMap::new();
        for (key, mut params) in raw {
            let name = key.to_lowercase();
            if crops.contains_key(&name) {
                return Err(CropPetError::DuplicateCrop(key));
            }
            params.name = name.clone();
            params.validate()?;
            crops.insert(name, params);
        }
        Ok(CropTable { crops })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> CropPetResult<Self> {
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    // Add or replace a crop, keyed by its lower-cased name
    pub fn insert(&mut self, mut params: CropParams) -> CropPetResult<()> {
        params.validate()?;
        params.name = params.name.to_lowercase();
        self.crops.insert(params.name.clone(), params);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.crops.keys().map(String::as_str)
    }

    // Look up a crop, falling back to the grass reference for empty or unknown names
    pub fn get(&self, crop_name: &str) -> CropPetResult<&CropParams> {
        let mut crop_name = crop_name.to_lowercase();
        if crop_name.is_empty() {
            crop_name = REFERENCE_CROP.to_string();
        }

        if let Some(params) = self.crops.get(&crop_name) {
            return Ok(params);
        }

        warn!("Unknown crop '{crop_name}', using {REFERENCE_CROP} reference");
        self.crops
            .get(REFERENCE_CROP)
            .ok_or(CropPetError::UnknownCrop(crop_name))
    }
}

impl Default for CropTable {
    fn default() -> Self {
        let crops = [
            CropParams::grass(),
            CropParams::new("alfalfa", 0.7),
            CropParams::new("barley", 1.0),
            CropParams::new("maize", 2.0),
            CropParams::new("potato", 0.6),
            CropParams::new("rice", 1.0),
            CropParams::new("soybean", 0.75),
            CropParams::new("sugar beet", 0.5),
            CropParams::new("sunflower", 2.0),
            CropParams::new("tomato", 0.6),
            CropParams::new("winter wheat", 1.0),
        ];
        CropTable {
            crops: crops.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }
}

// Crop height at a given day of the season
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct CropStage {
    pub day: f64,    // Day of the season [day]
    pub height: f64, // Crop height [m]
}

// Seasonal development of a crop
#[derive(Clone, Debug, PartialEq)]
pub struct CropCalendar {
    pub crop: CropParams,
    stages: Vec<CropStage>,
}

impl CropCalendar {
    pub fn new(crop: CropParams, stages: Vec<CropStage>) -> CropPetResult<Self> {
        crop.validate()?;
        if stages.is_empty() {
            return Err(CropPetError::InvalidParameter {
                name: "number of crop stages",
                value: 0.0,
            });
        }
        for stage in &stages {
            ensure_positive("stage crop height", stage.height)?;
        }
        for pair in stages.windows(2) {
            if pair[1].day <= pair[0].day {
                return Err(CropPetError::InvalidParameter {
                    name: "stage day (days must increase)",
                    value: pair[1].day,
                });
            }
        }
        Ok(CropCalendar { crop, stages })
    }

    // A calendar that keeps the crop at its table height all season
    pub fn constant(crop: CropParams) -> CropPetResult<Self> {
        let stage = CropStage {
            day: 0.0,
            height: crop.height,
        };
        Self::new(crop, vec![stage])
    }

    pub fn stages(&self) -> &[CropStage] {
        &self.stages
    }

    // Crop height [m] at day, linearly interpolated between stages
    pub fn height_at(&self, day: f64) -> f64 {
        let Some(&first) = self.stages.first() else {
            return self.crop.height;
        };
        if day <= first.day {
            return first.height;
        }
        for pair in self.stages.windows(2) {
            let (s1, s2) = (pair[0], pair[1]);
            if day >= s1.day && day <= s2.day {
                return s1.height + (s2.height - s1.height) * (day - s1.day) / (s2.day - s1.day);
            }
        }
        self.stages.last().map(|s| s.height).unwrap_or(first.height)
    }

    pub fn params_at(&self, day: f64) -> CropParams {
        self.crop.with_height(self.height_at(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SHIPPED_TABLE: &str = include_str!("../crop_parameters.toml");

    #[test]
    fn shipped_table_matches_default() {
        let table = CropTable::from_toml_str(SHIPPED_TABLE).unwrap();
        assert_eq!(table, CropTable::default());
    }

    #[test]
    fn lookup_is_case_insensitive_and_falls_back_to_grass() {
        let table = CropTable::default();
        assert_abs_diff_eq!(table.get("Maize").unwrap().height, 2.0);
        assert_eq!(table.get("").unwrap().name, REFERENCE_CROP);
        assert_eq!(table.get("dragonfruit").unwrap().name, REFERENCE_CROP);
    }

    #[test]
    fn lookup_without_grass_fails() {
        let table = CropTable::from_toml_str("[maize]\nheight = 2.0\n").unwrap();
        assert!(matches!(table.get("cassava"), Err(CropPetError::UnknownCrop(_))));
    }

    #[test]
    fn parses_optional_fields() {
        let table = CropTable::from_toml_str(
            "[Alfalfa]\nheight = 0.5\nrl = 90.0\nlai = 3.5\n\n[grass]\nheight = 0.12\n",
        )
        .unwrap();
        let alfalfa = table.get("alfalfa").unwrap();
        assert_eq!(alfalfa.name, "alfalfa");
        assert_abs_diff_eq!(alfalfa.rl, 90.0);
        assert_abs_diff_eq!(alfalfa.leaf_area_index(), 3.5);
        assert_abs_diff_eq!(table.get("grass").unwrap().rl, 100.0);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["alfalfa", "grass"]);
    }

    #[test]
    fn rejects_keys_differing_only_in_case() {
        let result = CropTable::from_toml_str("[Maize]\nheight = 2.0\n\n[maize]\nheight = 1.5\n");
        assert!(matches!(result, Err(CropPetError::DuplicateCrop(_))));
    }

    #[test]
    fn insert_adds_or_replaces_crops() {
        let mut table = CropTable::default();
        table.insert(CropParams::new("Cassava", 1.5)).unwrap();
        assert_eq!(table.get("cassava").unwrap().name, "cassava");
        assert_abs_diff_eq!(table.get("CASSAVA").unwrap().height, 1.5);

        table.insert(CropParams::new("maize", 2.5)).unwrap();
        assert_abs_diff_eq!(table.get("maize").unwrap().height, 2.5);

        assert!(table.insert(CropParams::new("ghost", 0.0)).is_err());
        assert!(!table.names().any(|n| n == "ghost"));
    }

    #[test]
    fn rejects_invalid_table_entries() {
        assert!(CropTable::from_toml_str("[maize]\nheight = -1.0\n").is_err());
        assert!(CropTable::from_toml_str("[maize]\nrl = 100.0\n").is_err());
    }

    #[test]
    fn grass_surface_resistance() {
        assert_abs_diff_eq!(CropParams::grass().surface_resistance().unwrap(), 69.444444, epsilon = 1e-6);
        let explicit = CropParams::new("maize", 2.0).with_lai(4.0);
        assert_abs_diff_eq!(explicit.surface_resistance().unwrap(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn calendar_interpolates_between_stages() {
        let stages = vec![
            CropStage { day: 10.0, height: 0.1 },
            CropStage { day: 30.0, height: 1.1 },
            CropStage { day: 60.0, height: 2.0 },
        ];
        let calendar = CropCalendar::new(CropParams::new("maize", 2.0), stages).unwrap();
        assert_abs_diff_eq!(calendar.height_at(0.0), 0.1);
        assert_abs_diff_eq!(calendar.height_at(10.0), 0.1);
        assert_abs_diff_eq!(calendar.height_at(20.0), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(calendar.height_at(45.0), 1.55, epsilon = 1e-12);
        assert_abs_diff_eq!(calendar.height_at(90.0), 2.0);
        assert_abs_diff_eq!(calendar.params_at(20.0).height, 0.6, epsilon = 1e-12);
        assert_eq!(calendar.params_at(20.0).name, "maize");
    }

    #[test]
    fn calendar_rejects_unordered_or_empty_stages() {
        let crop = CropParams::grass();
        assert!(CropCalendar::new(crop.clone(), vec![]).is_err());
        let unordered = vec![
            CropStage { day: 5.0, height: 0.1 },
            CropStage { day: 5.0, height: 0.2 },
        ];
        assert!(CropCalendar::new(crop.clone(), unordered).is_err());
        let constant = CropCalendar::constant(crop).unwrap();
        assert_abs_diff_eq!(constant.height_at(100.0), 0.12);
        assert_eq!(constant.stages().len(), 1);
    }

    #[test]
    fn calendar_without_stages_uses_crop_height() {
        let mut calendar = CropCalendar::constant(CropParams::new("potato", 0.6)).unwrap();
        calendar.stages.clear();
        assert_abs_diff_eq!(calendar.height_at(12.0), 0.6);
    }
}
