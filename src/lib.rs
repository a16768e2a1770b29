pub mod aerodynamic;
pub mod air;
pub mod canopy;
pub mod config;
pub mod crop;
pub mod errors;
pub mod penman_monteith;
pub mod reference;
pub mod weather;

pub use config::RunConfig;
pub use crop::{CropCalendar, CropParams, CropStage, CropTable};
pub use errors::{CropPetError, CropPetResult};
pub use penman_monteith::{CropEt, DailyEt, PenmanMonteithInputs, penman_monteith, write_csv};
pub use reference::{Fao56PenmanMonteith, Hargreaves, ReferenceEt};
pub use weather::DailyWeather;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let weather = DailyWeather::new(
            vec![10.0; 30],
            vec![25.0; 30],
            vec![65.0; 30],
            vec![2.0; 30],
            vec![14.0; 30],
        );
        let stages = vec![
            CropStage { day: 0.0, height: 0.05 },
            CropStage { day: 29.0, height: 0.7 },
        ];
        let table = CropTable::default();
        let calendar = CropCalendar::new(table.get("alfalfa").unwrap().clone(), stages).unwrap();
        let model = CropEt::new(calendar, weather, 50.0).unwrap();
        let results = model.run().unwrap();
        assert_eq!(results.len(), 30);
        assert!(results.iter().all(|r| r.etc > 0.0 && r.eto > 0.0));
        assert!(results[29].kc.unwrap() > results[0].kc.unwrap());

        let mut out = Vec::new();
        write_csv(&results, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 31);
    }
}
