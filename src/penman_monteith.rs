use std::io::Write;

use crate::aerodynamic::AerodynamicParams;
use crate::air::{air_density, latent_heat};
use crate::crop::CropCalendar;
use crate::errors::CropPetResult;
use crate::reference::{DayConditions, Fao56PenmanMonteith, ReferenceEt, crop_coefficient};
use crate::weather::DailyWeather;
use log::{debug, info, warn};

// Specific heat of moist air at average atmospheric conditions [MJ kg-1 deg C-1]
pub const SPECIFIC_HEAT_AIR: f64 = 0.001013;
// Surface resistance used when none is given [s m-1]
pub const DEFAULT_SURFACE_RESISTANCE: f64 = 78.0;

const SECONDS_PER_DAY: f64 = 86400.0;

// Terms of the crop Penman-Monteith equation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenmanMonteithInputs {
    pub lat: f64,       // Latent heat of vaporization [MJ kg-1]
    pub net_rad: f64,   // Net radiation at the crop surface [MJ m-2 day-1]
    pub shf: f64,       // Soil heat flux [MJ m-2 day-1]
    pub svp: f64,       // Saturation vapour pressure [kPa]
    pub avp: f64,       // Actual vapour pressure [kPa]
    pub delta_svp: f64, // Slope of the saturation vapour pressure curve [kPa deg C-1]
    pub psy: f64,       // Psychrometric constant [kPa deg C-1]
    pub ra: f64,        // Aerodynamic resistance [s m-1]
    pub rs: f64,        // Surface resistance [s m-1]
    pub pa: f64,        // Mean air density [kg m-3]
    pub cp: f64,        // Specific heat of moist air [MJ kg-1 deg C-1]
}

impl PenmanMonteithInputs {
    // Inputs with the default surface resistance, specific heat and zero soil heat flux
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lat: f64,
        net_rad: f64,
        svp: f64,
        avp: f64,
        delta_svp: f64,
        psy: f64,
        ra: f64,
        pa: f64,
    ) -> Self {
        PenmanMonteithInputs {
            lat,
            net_rad,
            shf: 0.0,
            svp,
            avp,
            delta_svp,
            psy,
            ra,
            rs: DEFAULT_SURFACE_RESISTANCE,
            pa,
            cp: SPECIFIC_HEAT_AIR,
        }
    }
}

/// Crop evapotranspiration ETc [mm day-1] from the Penman-Monteith equation
/// (Allen et al. 1998, eq. 3).
///
/// Radiation terms are converted to per-second fluxes so that they combine
/// with the resistances in s m-1; the result is scaled back to a day.
pub fn penman_monteith(inputs: &PenmanMonteithInputs) -> f64 {
    let p = inputs;
    let a1 = p.delta_svp * (p.net_rad - p.shf) / SECONDS_PER_DAY
        + p.pa * p.cp * ((p.svp - p.avp) / p.ra);
    let a2 = p.delta_svp + p.psy * (1.0 + (p.rs / p.ra));
    let a3 = 1.0 / p.lat;

    (a1 / a2) * a3 * SECONDS_PER_DAY
}

// Output of one simulated day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyEt {
    pub day: usize,
    pub height: f64, // Crop height [m]
    pub ra: f64,     // Aerodynamic resistance [s m-1]
    pub rs: f64,     // Surface resistance [s m-1]
    pub etc: f64,    // Crop evapotranspiration [mm day-1]
    pub eto: f64,    // Reference evapotranspiration [mm day-1]
    pub kc: Option<f64>, // Crop coefficient [-], undefined when ETo is not positive
}

// Daily crop evapotranspiration model over a weather series
pub struct CropEt {
    calendar: CropCalendar,
    weather: DailyWeather,
    aero: AerodynamicParams,
    reference: Box<dyn ReferenceEt>,
    altitude: f64, // Site altitude above sea level [m]
}

impl CropEt {
    pub fn new(calendar: CropCalendar, weather: DailyWeather, altitude: f64) -> CropPetResult<Self> {
        weather.validate()?;
        Ok(CropEt {
            calendar,
            weather,
            aero: AerodynamicParams::new(),
            reference: Box::new(Fao56PenmanMonteith),
            altitude,
        })
    }

    pub fn with_aerodynamic(mut self, aero: AerodynamicParams) -> Self {
        self.aero = aero;
        self
    }

    pub fn with_reference(mut self, reference: Box<dyn ReferenceEt>) -> Self {
        self.reference = reference;
        self
    }

    pub fn days(&self) -> usize {
        self.weather.len()
    }

    // Evaluate crop and reference evapotranspiration for one day
    pub fn step(&self, day: usize) -> CropPetResult<DailyEt> {
        let weather = self.weather.day(day);
        let cond = DayConditions::from_weather(&weather, self.altitude, self.aero.zm);
        let crop = self.calendar.params_at(day as f64);

        let ra = self.aero.resistance(crop.height, cond.wind_speed)?;
        let rs = crop.surface_resistance()?;

        let inputs = PenmanMonteithInputs {
            lat: latent_heat(cond.t_mean),
            net_rad: cond.net_rad,
            shf: cond.soil_heat_flux,
            svp: cond.svp,
            avp: cond.avp,
            delta_svp: cond.delta_svp,
            psy: cond.psy,
            ra,
            rs,
            pa: air_density(cond.pressure, cond.t_mean),
            cp: SPECIFIC_HEAT_AIR,
        };
        let etc = penman_monteith(&inputs);
        let eto = self.reference.eto(&cond)?;
        let kc = match crop_coefficient(etc, eto) {
            Ok(kc) => Some(kc),
            Err(err) => {
                warn!("day {day}: no crop coefficient, {err}");
                None
            }
        };

        debug!(
            "day {day}: h={:.3} m ra={ra:.1} rs={rs:.1} ETc={etc:.3} ETo={eto:.3} Kc={kc:?}",
            crop.height
        );
        Ok(DailyEt {
            day,
            height: crop.height,
            ra,
            rs,
            etc,
            eto,
            kc,
        })
    }

    // Run the model over every day of the weather series
    pub fn run(&self) -> CropPetResult<Vec<DailyEt>> {
        info!(
            "Running {} for {} days against {}",
            self.calendar.crop.name,
            self.days(),
            self.reference.name()
        );
        let results = (0..self.days())
            .map(|day| self.step(day))
            .collect::<CropPetResult<Vec<_>>>()?;
        let total: f64 = results.iter().map(|r| r.etc).sum();
        info!("Seasonal ETc: {total:.1} mm");
        Ok(results)
    }
}

// Write the daily results as comma separated values with a header row
pub fn write_csv<W: Write>(records: &[DailyEt], mut writer: W) -> CropPetResult<()> {
    writeln!(
        writer,
        "Day, Crop Height [m], Aerodynamic Resistance [s/m], Surface Resistance [s/m], ETc [mm/day], ETo [mm/day], Kc [-]"
    )?;
    for r in records {
        // Empty cell when Kc is undefined
        let kc = r.kc.map(|kc| format!("{kc:.3}")).unwrap_or_default();
        writeln!(
            writer,
            "{}, {:.3}, {:.2}, {:.2}, {:.3}, {:.3}, {}",
            r.day, r.height, r.ra, r.rs, r.etc, r.eto, kc
        )?;
    }
    Ok(())
}
