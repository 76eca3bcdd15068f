use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use watson::{VibrationalEnergy, WatsonHamiltonian};

use crate::{
    geom::Molecule,
    logfile::GaussianLog,
    program::{G16_CMD, JobControl, ProgramError, Template, run_gaussian},
};


/// What every vibrational structure driver produces: the Watson Hamiltonian
/// and the vibrational energy property derived from it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VibrationalStructureResult {
    watson: WatsonHamiltonian,
    vibrational_energy: VibrationalEnergy,
}

impl VibrationalStructureResult {
    pub fn num_modes(&self) -> usize {
        self.watson.num_modes()
    }

    pub fn watson_hamiltonian(&self) -> &WatsonHamiltonian {
        &self.watson
    }

    pub fn vibrational_energy(&self) -> &VibrationalEnergy {
        &self.vibrational_energy
    }
}

impl From<WatsonHamiltonian> for VibrationalStructureResult {
    fn from(watson: WatsonHamiltonian) -> Self {
        Self {
            vibrational_energy: watson.vibrational_energy(),
            watson,
        }
    }
}

/// A source of vibrational structure data
pub trait VibrationalStructureDriver {
    fn run(&self) -> Result<VibrationalStructureResult, ProgramError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    JobControl(JobControl),
    LogFile(PathBuf),
}

/// Obtains anharmonic force constants from Gaussian, either by running it on a
/// job control file or by reading the log of an earlier run
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianForcesDriver {
    source: Source,

    /// divide each force constant by the multinomial factor of its repeated
    /// modes. defaults to true
    pub normalize: bool,

    /// the command to run Gaussian with. defaults to [G16_CMD]
    pub command: String,
}

impl GaussianForcesDriver {
    fn new(source: Source) -> Self {
        Self {
            source,
            normalize: true,
            command: G16_CMD.clone(),
        }
    }

    pub fn from_job_control<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Source::JobControl(JobControl::new(lines)))
    }

    /// Gaussian does not need to be installed to run a driver built this way
    pub fn from_log_file(path: impl AsRef<Path>) -> Self {
        Self::new(Source::LogFile(path.as_ref().to_path_buf()))
    }

    /// a B3LYP anharmonic frequency calculation on `molecule` in `basis`
    pub fn from_molecule(molecule: &Molecule, basis: &str) -> Self {
        Self::from_template(&Template::default(), molecule, basis)
    }

    pub fn from_template(
        template: &Template,
        molecule: &Molecule,
        basis: &str,
    ) -> Self {
        Self::new(Source::JobControl(template.render(molecule, basis)))
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// load the log file or run Gaussian to produce one
    pub fn log(&self) -> Result<GaussianLog, ProgramError> {
        match &self.source {
            Source::LogFile(path) => GaussianLog::load(path),
            Source::JobControl(jcf) => {
                let out = run_gaussian(&self.command, jcf)?;
                let Ok(log) = out.parse::<GaussianLog>();
                Ok(log)
            }
        }
    }
}

impl VibrationalStructureDriver for GaussianForcesDriver {
    fn run(&self) -> Result<VibrationalStructureResult, ProgramError> {
        let log = self.log()?;
        if log.error_termination() {
            let name = match &self.source {
                Source::LogFile(path) => path.to_string_lossy().to_string(),
                Source::JobControl(_) => self.command.clone(),
            };
            return Err(ProgramError::ErrorInOutput(name));
        }
        let watson = log.watson_hamiltonian(self.normalize)?;
        log::debug!(
            "read {} force constants for {} modes",
            watson.len(),
            watson.num_modes()
        );
        Ok(watson.into())
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum VibrationalStructureDriverType {
    #[default]
    #[serde(alias = "auto")]
    Auto,
    #[serde(alias = "gaussian_forces", alias = "gaussian")]
    GaussianForces,
}

impl VibrationalStructureDriverType {
    /// the concrete driver type `self` stands for. [Self::Auto] picks the
    /// first available one, and Gaussian forces is currently the only one
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto => Self::GaussianForces,
            t => t,
        }
    }
}

/// Builds the job for a [Molecule] with the driver named by `driver_type`
#[derive(Clone, Debug, PartialEq)]
pub struct VibrationalStructureMoleculeDriver {
    pub molecule: Molecule,
    pub basis: String,
    pub driver_type: VibrationalStructureDriverType,
    pub template: Template,
    pub normalize: bool,
    pub command: String,
}

impl VibrationalStructureMoleculeDriver {
    pub fn new(
        molecule: Molecule,
        basis: &str,
        driver_type: VibrationalStructureDriverType,
    ) -> Self {
        Self {
            molecule,
            basis: basis.to_owned(),
            driver_type,
            template: Template::default(),
            normalize: true,
            command: G16_CMD.clone(),
        }
    }

    /// the driver that [VibrationalStructureDriver::run] will delegate to
    pub fn driver(&self) -> Box<dyn VibrationalStructureDriver> {
        match self.driver_type.resolve() {
            VibrationalStructureDriverType::GaussianForces
            | VibrationalStructureDriverType::Auto => {
                let mut d = GaussianForcesDriver::from_template(
                    &self.template,
                    &self.molecule,
                    &self.basis,
                );
                d.normalize = self.normalize;
                d.command.clone_from(&self.command);
                Box::new(d)
            }
        }
    }
}

impl VibrationalStructureDriver for VibrationalStructureMoleculeDriver {
    fn run(&self) -> Result<VibrationalStructureResult, ProgramError> {
        self.driver().run()
    }
}
