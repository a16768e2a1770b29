use crate::errors::{CropPetError, CropPetResult};
use log::warn;
use serde::Deserialize;

// Daily weather series driving the evapotranspiration model
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DailyWeather {
    pub t_min: Vec<f64>,      // Daily minimum air temperature at 2 m [deg C]
    pub t_max: Vec<f64>,      // Daily maximum air temperature at 2 m [deg C]
    pub rh_mean: Vec<f64>,    // Daily mean relative humidity [%]
    pub wind_speed: Vec<f64>, // Wind speed at the wind measurement height [m s-1]
    pub net_rad: Vec<f64>,    // Net radiation at the crop surface [MJ m-2 day-1]
    #[serde(default)]
    pub soil_heat_flux: Vec<f64>, // Soil heat flux [MJ m-2 day-1], zero when empty
    #[serde(default)]
    pub et_rad: Vec<f64>, // Extraterrestrial radiation [MJ m-2 day-1], only for Hargreaves
}

impl DailyWeather {
    pub fn new(
        t_min: Vec<f64>,
        t_max: Vec<f64>,
        rh_mean: Vec<f64>,
        wind_speed: Vec<f64>,
        net_rad: Vec<f64>,
    ) -> Self {
        DailyWeather {
            t_min,
            t_max,
            rh_mean,
            wind_speed,
            net_rad,
            soil_heat_flux: Vec::new(),
            et_rad: Vec::new(),
        }
    }

    // Number of days in the series
    pub fn len(&self) -> usize {
        self.t_min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t_min.is_empty()
    }

    pub fn validate(&self) -> CropPetResult<()> {
        let n = self.len();
        if n == 0 {
            return Err(CropPetError::InvalidWeather("no days in series".to_string()));
        }

        let required = [
            ("t_max", &self.t_max),
            ("rh_mean", &self.rh_mean),
            ("wind_speed", &self.wind_speed),
            ("net_rad", &self.net_rad),
        ];
        for (name, series) in required {
            if series.len() != n {
                return Err(CropPetError::InvalidWeather(format!(
                    "{name} has {} days, t_min has {n}",
                    series.len()
                )));
            }
        }
        // Optional series are either absent or complete
        let optional = [("soil_heat_flux", &self.soil_heat_flux), ("et_rad", &self.et_rad)];
        for (name, series) in optional {
            if !series.is_empty() && series.len() != n {
                return Err(CropPetError::InvalidWeather(format!(
                    "{name} has {} days, t_min has {n}",
                    series.len()
                )));
            }
        }

        let all = [("t_min", &self.t_min)].into_iter().chain(required).chain(optional);
        for (name, series) in all {
            if let Some(day) = series.iter().position(|v| !v.is_finite()) {
                return Err(CropPetError::InvalidWeather(format!(
                    "day {day}: {name} is {}",
                    series[day]
                )));
            }
        }

        for day in 0..n {
            if self.t_max[day] < self.t_min[day] {
                return Err(CropPetError::InvalidWeather(format!(
                    "day {day}: t_max {} below t_min {}",
                    self.t_max[day], self.t_min[day]
                )));
            }
            if self.wind_speed[day] <= 0.0 {
                return Err(CropPetError::InvalidWeather(format!(
                    "day {day}: wind speed {} must be positive",
                    self.wind_speed[day]
                )));
            }
            if !(0.0..=100.0).contains(&self.rh_mean[day]) {
                return Err(CropPetError::InvalidWeather(format!(
                    "day {day}: relative humidity {} outside 0-100 %",
                    self.rh_mean[day]
                )));
            }
        }
        Ok(())
    }

    // Get value for the given day, the last value when the day exceeds the series
    pub fn daily_value(&self, day: usize, values: &[f64]) -> f64 {
        if day < values.len() {
            values[day]
        } else {
            values.last().copied().unwrap_or(0.0)
        }
    }

    // Weather of a single day
    pub fn day(&self, day: usize) -> DayWeather {
        if day >= self.len() && !self.is_empty() {
            warn!("Day {day} beyond a {}-day series, using last values", self.len());
        }
        DayWeather {
            t_min: self.daily_value(day, &self.t_min),
            t_max: self.daily_value(day, &self.t_max),
            rh_mean: self.daily_value(day, &self.rh_mean),
            wind_speed: self.daily_value(day, &self.wind_speed),
            net_rad: self.daily_value(day, &self.net_rad),
            soil_heat_flux: self.daily_value(day, &self.soil_heat_flux),
            et_rad: (!self.et_rad.is_empty()).then(|| self.daily_value(day, &self.et_rad)),
        }
    }
}

// Weather values of one day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayWeather {
    pub t_min: f64,
    pub t_max: f64,
    pub rh_mean: f64,
    pub wind_speed: f64,
    pub net_rad: f64,
    pub soil_heat_flux: f64,
    pub et_rad: Option<f64>,
}

impl DayWeather {
    pub fn t_mean(&self) -> f64 {
        (self.t_min + self.t_max) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn three_days() -> DailyWeather {
        DailyWeather::new(
            vec![10.0, 12.0, 14.0],
            vec![20.0, 24.0, 28.0],
            vec![70.0, 65.0, 60.0],
            vec![2.0, 3.0, 4.0],
            vec![12.0, 14.0, 16.0],
        )
    }

    #[test]
    fn daily_value_holds_last_value() {
        let weather = three_days();
        assert_abs_diff_eq!(weather.daily_value(1, &weather.t_max), 24.0);
        assert_abs_diff_eq!(weather.daily_value(10, &weather.t_max), 28.0);
        assert_abs_diff_eq!(weather.daily_value(0, &weather.soil_heat_flux), 0.0);
    }

    #[test]
    fn day_collects_all_series() {
        let mut weather = three_days();
        let day = weather.day(2);
        assert_abs_diff_eq!(day.t_mean(), 21.0);
        assert_abs_diff_eq!(day.wind_speed, 4.0);
        assert_eq!(day.et_rad, None);

        weather.et_rad = vec![30.0, 31.0, 32.0];
        assert_eq!(weather.day(1).et_rad, Some(31.0));
    }

    #[test]
    fn day_past_the_end_holds_last_values() {
        let weather = three_days();
        assert_eq!(weather.day(7), weather.day(2));
        assert_abs_diff_eq!(weather.day(7).soil_heat_flux, 0.0);
    }

    #[test]
    fn validate_accepts_consistent_series() {
        assert!(three_days().validate().is_ok());
        assert_eq!(three_days().len(), 3);
    }

    #[test]
    fn validate_rejects_bad_series() {
        assert!(DailyWeather::default().validate().is_err());

        let mut short = three_days();
        short.net_rad.pop();
        assert!(matches!(short.validate(), Err(CropPetError::InvalidWeather(_))));

        let mut partial = three_days();
        partial.soil_heat_flux = vec![0.1];
        assert!(partial.validate().is_err());

        let mut inverted = three_days();
        inverted.t_max[0] = 5.0;
        assert!(inverted.validate().is_err());

        let mut humid = three_days();
        humid.rh_mean[1] = 120.0;
        assert!(humid.validate().is_err());

        let mut calm = three_days();
        calm.wind_speed[1] = 0.0;
        assert!(matches!(calm.validate(), Err(CropPetError::InvalidWeather(_))));

        let mut missing_temp = three_days();
        missing_temp.t_min[1] = f64::NAN;
        assert!(missing_temp.validate().is_err());

        let mut missing_rad = three_days();
        missing_rad.net_rad[1] = f64::NAN;
        assert!(missing_rad.validate().is_err());

        let mut infinite_flux = three_days();
        infinite_flux.soil_heat_flux = vec![0.0, f64::INFINITY, 0.0];
        assert!(infinite_flux.validate().is_err());
    }
}
