// Reference evapotranspiration (ETo) baselines; the crop coefficient Kc is the
// ratio of crop to reference evapotranspiration

use crate::air::{
    atm_pressure, avp_from_rhmean, celsius_to_kelvin, delta_svp, mean_svp, psy_const,
    svp_from_t, wind_speed_2m,
};
use crate::errors::{CropPetError, CropPetResult};
use crate::weather::DayWeather;

/// Meteorological terms of one day, derived from the daily weather.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayConditions {
    pub t_min: f64,          // [deg C]
    pub t_max: f64,          // [deg C]
    pub t_mean: f64,         // [deg C]
    pub pressure: f64,       // Atmospheric pressure [kPa]
    pub psy: f64,            // Psychrometric constant [kPa deg C-1]
    pub svp: f64,            // Mean saturation vapour pressure [kPa]
    pub avp: f64,            // Actual vapour pressure [kPa]
    pub delta_svp: f64,      // Slope of the saturation vapour pressure curve [kPa deg C-1]
    pub net_rad: f64,        // [MJ m-2 day-1]
    pub soil_heat_flux: f64, // [MJ m-2 day-1]
    pub wind_speed: f64,     // Wind speed at the measurement height [m s-1]
    pub wind_speed_2m: f64,  // [m s-1]
    pub et_rad: Option<f64>, // [MJ m-2 day-1]
}

impl DayConditions {
    // altitude [m] above sea level, wind_height [m] of the anemometer
    pub fn from_weather(day: &DayWeather, altitude: f64, wind_height: f64) -> Self {
        let t_mean = day.t_mean();
        let pressure = atm_pressure(altitude);
        let svp_tmin = svp_from_t(day.t_min);
        let svp_tmax = svp_from_t(day.t_max);
        DayConditions {
            t_min: day.t_min,
            t_max: day.t_max,
            t_mean,
            pressure,
            psy: psy_const(pressure),
            svp: mean_svp(day.t_min, day.t_max),
            avp: avp_from_rhmean(svp_tmin, svp_tmax, day.rh_mean),
            delta_svp: delta_svp(t_mean),
            net_rad: day.net_rad,
            soil_heat_flux: day.soil_heat_flux,
            wind_speed: day.wind_speed,
            wind_speed_2m: wind_speed_2m(day.wind_speed, wind_height),
            et_rad: day.et_rad,
        }
    }
}

/// Baseline evapotranspiration of the reference surface [mm day-1].
pub trait ReferenceEt {
    fn name(&self) -> &'static str;
    fn eto(&self, day: &DayConditions) -> CropPetResult<f64>;
}

/// FAO-56 Penman-Monteith reference ETo (Allen et al. 1998, eq. 6).
///
/// `t` is the mean air temperature in Kelvin, `ws` the wind speed at 2 m.
#[allow(clippy::too_many_arguments)]
pub fn fao56_penman_monteith(
    net_rad: f64,
    t: f64,
    ws: f64,
    svp: f64,
    avp: f64,
    delta_svp: f64,
    psy: f64,
    shf: f64,
) -> f64 {
    let a1 = 0.408 * (net_rad - shf) * delta_svp / (delta_svp + psy * (1.0 + 0.34 * ws));
    let a2 = 900.0 * ws / t * (svp - avp) * psy / (delta_svp + psy * (1.0 + 0.34 * ws));
    a1 + a2
}

// Hargreaves ETo (eq. 52); et_rad is extraterrestrial radiation [MJ m-2 day-1]
pub fn hargreaves(t_min: f64, t_max: f64, t_mean: f64, et_rad: f64) -> f64 {
    // 0.408 converts MJ m-2 day-1 to mm day-1 of evaporated water
    0.0023 * (t_mean + 17.8) * (t_max - t_min).sqrt() * 0.408 * et_rad
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Fao56PenmanMonteith;

impl ReferenceEt for Fao56PenmanMonteith {
    fn name(&self) -> &'static str {
        "fao56-penman-monteith"
    }

    fn eto(&self, day: &DayConditions) -> CropPetResult<f64> {
        Ok(fao56_penman_monteith(
            day.net_rad,
            celsius_to_kelvin(day.t_mean),
            day.wind_speed_2m,
            day.svp,
            day.avp,
            day.delta_svp,
            day.psy,
            day.soil_heat_flux,
        ))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Hargreaves;

impl ReferenceEt for Hargreaves {
    fn name(&self) -> &'static str {
        "hargreaves"
    }

    fn eto(&self, day: &DayConditions) -> CropPetResult<f64> {
        let et_rad = day
            .et_rad
            .ok_or(CropPetError::MissingInput("extraterrestrial radiation"))?;
        Ok(hargreaves(day.t_min, day.t_max, day.t_mean, et_rad))
    }
}

// Crop coefficient Kc [-] from crop and reference evapotranspiration
pub fn crop_coefficient(etc: f64, eto: f64) -> CropPetResult<f64> {
    if eto.is_finite() && eto > 0.0 {
        Ok(etc / eto)
    } else {
        Err(CropPetError::InvalidParameter {
            name: "reference evapotranspiration",
            value: eto,
        })
    }
}

// Crop evapotranspiration [mm day-1] from reference ETo and Kc
pub fn adjust_reference(eto: f64, kc: f64) -> f64 {
    eto * kc
}
