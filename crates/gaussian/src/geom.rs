use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::program::ProgramError;

/// A single atom in Cartesian coordinates. Units are whatever the job control
/// file expects, normally Ångstrom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Atom {
    pub fn new(label: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            label: label.to_owned(),
            x,
            y,
            z,
        }
    }
}

impl FromStr for Atom {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = s.split_whitespace().collect();
        let err = || ProgramError::ParseError(format!("bad atom line `{s}`"));
        let [label, x, y, z] = fields[..] else {
            return Err(err());
        };
        let coord = |c: &str| c.parse::<f64>().map_err(|_| err());
        Ok(Self::new(label, coord(x)?, coord(y)?, coord(z)?))
    }
}

/// matches the way Gaussian job files are usually written by hand, with the
/// shortest representation of each coordinate
impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.label, self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub charge: isize,
    pub multiplicity: usize,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, charge: isize, multiplicity: usize) -> Self {
        Self {
            atoms,
            charge,
            multiplicity,
        }
    }

    /// the atom labels run together, `COO` for carbon dioxide written C, O, O
    pub fn formula(&self) -> String {
        self.atoms.iter().map(|a| a.label.as_str()).collect()
    }
}

/// Parse the atoms of an XYZ geometry. The atom count and comment lines of a
/// full XYZ file are skipped if present, as are blank lines.
pub fn parse_atoms(s: &str) -> Result<Vec<Atom>, ProgramError> {
    let mut atoms = Vec::new();
    let mut skip = 0;
    for line in s.lines() {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        if skip > 0 {
            skip -= 1;
            continue;
        } else if fields.is_empty() {
            continue;
        } else if fields.len() == 1 && fields[0].parse::<usize>().is_ok() {
            // start of XYZ with comment line
            skip = 1;
            continue;
        }
        atoms.push(line.parse()?);
    }
    Ok(atoms)
}
