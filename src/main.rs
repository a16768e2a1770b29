use std::env::var;
use std::error::Error;
use std::io;
use std::path::Path;

use clap::Parser;
use crop_pet::{RunConfig, write_csv};
use log::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Crop-specific Penman-Monteith evapotranspiration",
    long_about = "Computes daily crop evapotranspiration (ETc) with the Penman-Monteith equation for a crop surface \
described by its height and stomatal resistance, together with the reference ETo and the resulting crop coefficient Kc. \
Results are written to stdout as CSV."
)]
struct Args {
    #[arg(required = true, help = "Path to the run configuration (TOML)", index = 1)]
    config_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filters = var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();

    if !Path::new(&args.config_path).is_file() {
        return Err(format!("Config file {} is not a file", args.config_path).into());
    }

    let config = RunConfig::from_file(&args.config_path)
        .map_err(|err| format!("Failed to load config: {}", err))?;
    info!("Crop: {}, altitude {} m", config.crop, config.altitude);

    let model = config.build()?;
    let results = model.run()?;
    write_csv(&results, io::stdout().lock())?;

    Ok(())
}
