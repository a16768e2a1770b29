// Thermodynamic properties of air and water vapour (Allen et al., 1998, FAO-56)

const KELVIN_OFFSET: f64 = 273.15;

// Latent heat of vaporization [MJ kg-1] from air temperature [deg C] (eq. 3-1)
pub fn latent_heat(t: f64) -> f64 {
    2.501 - 2.361e-3 * t
}

// Mean air density at constant pressure [kg m-3] (Box 6)
// pres: atmospheric pressure [kPa], t: air temperature at 2 m [deg C]
pub fn air_density(pres: f64, t: f64) -> f64 {
    pres / (1.01 * (t + 273.0) * 0.287)
}

// Atmospheric pressure [kPa] from altitude above sea level [m] (eq. 7)
pub fn atm_pressure(altitude: f64) -> f64 {
    let tmp = (293.0 - 0.0065 * altitude) / 293.0;
    101.3 * tmp.powf(5.26)
}

// Psychrometric constant [kPa deg C-1] from atmospheric pressure [kPa] (eq. 8)
pub fn psy_const(atmos_pres: f64) -> f64 {
    0.000665 * atmos_pres
}

// Saturation vapour pressure [kPa] at temperature t [deg C] (eq. 11)
pub fn svp_from_t(t: f64) -> f64 {
    0.6108 * (17.27 * t / (t + 237.3)).exp()
}

// Mean saturation vapour pressure [kPa] over the day (eq. 12)
pub fn mean_svp(t_min: f64, t_max: f64) -> f64 {
    (svp_from_t(t_min) + svp_from_t(t_max)) / 2.0
}

// Slope of the saturation vapour pressure curve [kPa deg C-1] (eq. 13)
pub fn delta_svp(t: f64) -> f64 {
    4098.0 * svp_from_t(t) / (t + 237.3).powi(2)
}

// Actual vapour pressure [kPa] from mean relative humidity [%] (eq. 19)
pub fn avp_from_rhmean(svp_tmin: f64, svp_tmax: f64, rh_mean: f64) -> f64 {
    (rh_mean / 100.0) * (svp_tmin + svp_tmax) / 2.0
}

// Actual vapour pressure [kPa] from dewpoint temperature [deg C] (eq. 14)
pub fn avp_from_tdew(t_dew: f64) -> f64 {
    svp_from_t(t_dew)
}

// Wind speed at 2 m [m s-1] from a measurement at height z [m] (eq. 47)
pub fn wind_speed_2m(ws: f64, z: f64) -> f64 {
    ws * (4.87 / (67.8 * z - 5.42).ln())
}

pub fn celsius_to_kelvin(t: f64) -> f64 {
    t + KELVIN_OFFSET
}
