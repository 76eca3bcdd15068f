use std::{error::Error, fs::read_to_string, path::Path};

use clap::Parser;
use gaussian::{
    Config, GaussianForcesDriver, VibrationalStructureDriver,
    VibrationalStructureResult,
};
use watson::VibrationalEnergy;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A TOML config file, a Gaussian log file, or a Gaussian job control file
    #[arg(value_parser)]
    infile: String,

    /// Read `infile` as the log of a finished Gaussian run. This is the
    /// default for files ending in .log or .txt
    #[arg(short, long, value_parser, default_value_t = false)]
    log: bool,

    /// Run Gaussian on `infile` as a job control file
    #[arg(
        short = 'c',
        long,
        value_parser,
        default_value_t = false,
        conflicts_with = "log"
    )]
    jcf: bool,

    /// Writes the vibrational energy in JSON format for use by other programs
    #[arg(short, long, value_parser, default_value_t = false)]
    json: bool,

    /// Leave the force constants as Gaussian printed them instead of dividing
    /// out the multinomial factor of their repeated modes
    #[arg(short, long, value_parser, default_value_t = false)]
    no_normalize: bool,
}

impl Args {
    fn is_log(&self) -> bool {
        if self.log {
            return true;
        }
        if self.jcf {
            return false;
        }
        matches!(
            Path::new(&self.infile).extension().and_then(|e| e.to_str()),
            Some("log" | "txt")
        )
    }
}

fn run(args: &Args) -> Result<VibrationalStructureResult, Box<dyn Error>> {
    let normalize = !args.no_normalize;
    if args.is_log() {
        let mut driver = GaussianForcesDriver::from_log_file(&args.infile);
        driver.normalize = normalize;
        return Ok(driver.run()?);
    }
    if args.jcf {
        let contents = read_to_string(&args.infile)
            .map_err(|e| format!("failed to read {}: {e}", args.infile))?;
        let mut driver =
            GaussianForcesDriver::from_job_control(contents.lines());
        driver.normalize = normalize;
        return Ok(driver.run()?);
    }
    let mut config = Config::load(&args.infile)?;
    if args.no_normalize {
        config.normalize = false;
    }
    log::info!("{config}");
    Ok(config.driver().run()?)
}

fn write_output(
    energy: &VibrationalEnergy,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        let data = serde_json::to_string_pretty(energy)?;
        println!("{data}");
    } else {
        print!("{energy}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let result = run(&args)?;
    log::debug!("{}", result.watson_hamiltonian());
    write_output(result.vibrational_energy(), args.json)
}
