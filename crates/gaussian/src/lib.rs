//! Reading anharmonic force constants out of Gaussian 16 frequency runs and
//! turning them into a [watson::WatsonHamiltonian]. Gaussian can either be run
//! on a job control file built from a [geom::Molecule], or an existing log file
//! can be read directly.

/// from [StackOverflow](https://stackoverflow.com/a/45145246)
#[cfg(test)]
macro_rules! string {
    ($($str:expr),* $(,)?) => ({
        vec![$(String::from($str),)*] as Vec<String>
    });
}

#[cfg(test)]
pub(crate) use string;

pub mod config;
pub mod driver;
pub mod geom;
pub mod logfile;
pub mod program;


pub use config::Config;
pub use driver::{
    GaussianForcesDriver, VibrationalStructureDriver,
    VibrationalStructureDriverType, VibrationalStructureMoleculeDriver,
    VibrationalStructureResult,
};
pub use logfile::GaussianLog;
pub use program::ProgramError;
