//! Configuration for running a vibrational structure calculation from a TOML
//! file

use std::{
    fmt::Display,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    driver::{
        GaussianForcesDriver, VibrationalStructureDriver,
        VibrationalStructureDriverType, VibrationalStructureMoleculeDriver,
    },
    geom::{Molecule, parse_atoms},
    program::{G16_CMD, ProgramError, Template},
};


#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// The molecular geometry in Cartesian coordinates, one atom per line. A
    /// full XYZ file with its atom count and comment lines is also accepted.
    geometry: String,

    /// The molecular charge
    charge: isize,

    /// The spin multiplicity
    multiplicity: usize,

    /// The basis set name, spliced into the route line
    basis: String,

    /// Which vibrational structure driver to use. Currently-supported values
    /// are "auto" and "gaussian_forces". Defaults to "auto".
    driver_type: Option<VibrationalStructureDriverType>,

    /// An optional job control template. Supported directives are {{.basis}},
    /// {{.title}}, {{.charge}}, {{.mult}}, and {{.geom}}.
    template: Option<String>,

    /// The log file of a finished Gaussian run. If this is given, Gaussian is
    /// not run and the force constants are read from this file instead.
    /// Relative paths are taken from the directory containing the config file.
    logfile: Option<String>,

    /// Whether to divide the force constants by the multinomial factor of
    /// their repeated modes. Defaults to true.
    normalize: Option<bool>,

    /// The command to run Gaussian with. Defaults to $G16_CMD or g16.
    command: Option<String>,
}

/// Construct a full `Config` using [Config::load] on a TOML file
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub molecule: Molecule,

    pub basis: String,

    pub driver_type: VibrationalStructureDriverType,

    /// the job control template, [Template::default] unless one was given
    pub template: Template,

    pub logfile: Option<PathBuf>,

    pub normalize: bool,

    pub command: String,
}

impl TryFrom<RawConfig> for Config {
    type Error = ProgramError;

    fn try_from(rc: RawConfig) -> Result<Self, Self::Error> {
        let atoms = parse_atoms(&rc.geometry)?;
        if atoms.is_empty() {
            return Err(ProgramError::ConfigError(
                "no atoms in geometry".to_owned(),
            ));
        }
        Ok(Self {
            molecule: Molecule::new(atoms, rc.charge, rc.multiplicity),
            basis: rc.basis,
            driver_type: rc.driver_type.unwrap_or_default(),
            template: rc.template.map(Into::into).unwrap_or_default(),
            logfile: rc.logfile.map(PathBuf::from),
            normalize: rc.normalize.unwrap_or(true),
            command: rc.command.unwrap_or_else(|| G16_CMD.clone()),
        })
    }
}

impl Config {
    pub fn load(filename: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let filename = filename.as_ref();
        let name = filename.to_string_lossy().to_string();
        let contents = read_to_string(filename).map_err(|e| {
            ProgramError::ReadFileError(name.clone(), e.kind())
        })?;
        let mut ret = Self::parse(&contents).map_err(|e| match e {
            ProgramError::ConfigError(e) => {
                ProgramError::ConfigError(format!("{name}: {e}"))
            }
            e => e,
        })?;
        // joining an absolute path replaces `dir` entirely
        if let Some(dir) = filename.parent() {
            ret.logfile = ret.logfile.map(|log| dir.join(log));
        }
        Ok(ret)
    }

    /// parse a config from the contents of a TOML file. relative log file paths
    /// are left as they are
    pub fn parse(contents: &str) -> Result<Self, ProgramError> {
        let raw: RawConfig = toml::from_str(contents)
            .map_err(|e| ProgramError::ConfigError(e.to_string()))?;
        raw.try_into()
    }

    /// the driver described by `self`: a log file reader if `logfile` was
    /// given, otherwise a [VibrationalStructureMoleculeDriver]
    pub fn driver(&self) -> Box<dyn VibrationalStructureDriver> {
        if let Some(log) = &self.logfile {
            let mut d = GaussianForcesDriver::from_log_file(log);
            d.normalize = self.normalize;
            return Box::new(d);
        }
        let mut d = VibrationalStructureMoleculeDriver::new(
            self.molecule.clone(),
            &self.basis,
            self.driver_type,
        );
        d.template = self.template.clone();
        d.normalize = self.normalize;
        d.command.clone_from(&self.command);
        Box::new(d)
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Config {
            molecule,
            basis,
            driver_type,
            template: _,
            logfile,
            normalize,
            command,
        } = self;
        writeln!(f, "Configuration Options:")?;
        writeln!(f, "geometry = {{")?;
        for atom in &molecule.atoms {
            writeln!(f, "{atom}")?;
        }
        writeln!(f, "}}")?;
        writeln!(f, "charge = {}", molecule.charge)?;
        writeln!(f, "multiplicity = {}", molecule.multiplicity)?;
        writeln!(f, "basis = {basis}")?;
        writeln!(f, "driver_type = {driver_type:?}")?;
        if let Some(log) = logfile {
            writeln!(f, "logfile = {}", log.display())?;
        }
        writeln!(f, "normalize = {normalize}")?;
        writeln!(f, "command = {command}")
    }
}
