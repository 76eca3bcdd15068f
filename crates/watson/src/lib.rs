//! Watson Hamiltonians: vibrational potentials stored as weighted products of
//! normal-mode coordinates, and the one-, two-, and three-body integral tables
//! derived from them.

use std::{collections::BTreeSet, fmt::Display};

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

pub use energy::VibrationalEnergy;
pub use error::WatsonError;
pub use integrals::VibrationalIntegrals;

pub mod energy;
mod error;
pub mod integrals;

#[cfg(test)]
mod tests;

/// Build a [WatsonHamiltonian] from literal records written the way they are
/// usually tabulated, a coefficient followed by its mode indices:
///
/// ```
/// let w = watson::watson!(4;
///     [352.3005875, 2, 2],
///     [-352.3005875, -2, -2],
///     [-88.2017421687633, 1, 1, 2],
/// )
/// .unwrap();
/// assert_eq!(w.len(), 3);
/// ```
#[macro_export]
macro_rules! watson {
    ($num_modes:expr; $([$coeff:expr, $($mode:expr),+ $(,)?]),* $(,)?) => {{
        let data: Result<Vec<$crate::ForceConstant>, $crate::WatsonError> =
            vec![$($crate::ForceConstant::new($coeff, vec![$($mode),+])),*]
                .into_iter()
                .collect();
        data.and_then(|data| $crate::WatsonHamiltonian::new(data, $num_modes))
    }};
}

/// The smallest and largest number of mode indices a force constant can have
pub const MIN_MODES: usize = 2;
pub const MAX_MODES: usize = 4;

/// A single term of the potential: a coefficient and the 2 to 4 normal modes
/// it multiplies. Negative indices refer to the mirror of the mode with the
/// same magnitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForceConstant")]
pub struct ForceConstant {
    coeff: f64,
    modes: Vec<i32>,
}

#[derive(Deserialize)]
struct RawForceConstant {
    coeff: f64,
    modes: Vec<i32>,
}

impl TryFrom<RawForceConstant> for ForceConstant {
    type Error = WatsonError;

    fn try_from(raw: RawForceConstant) -> Result<Self, Self::Error> {
        Self::new(raw.coeff, raw.modes)
    }
}

impl ForceConstant {
    pub fn new(coeff: f64, modes: Vec<i32>) -> Result<Self, WatsonError> {
        if !(MIN_MODES..=MAX_MODES).contains(&modes.len()) {
            return Err(WatsonError::IndexCount(modes.len()));
        }
        if modes.contains(&0) {
            return Err(WatsonError::ZeroIndex);
        }
        Ok(Self { coeff, modes })
    }

    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    pub fn modes(&self) -> &[i32] {
        &self.modes
    }

    /// the number of distinct modes referenced by `self`. `[c, 1, 1, 2]` is a
    /// two-body term, for example
    pub fn num_body(&self) -> usize {
        self.modes.iter().collect::<BTreeSet<_>>().len()
    }

    /// the same term with the coefficient and every index negated
    #[must_use]
    pub fn mirror(&self) -> Self {
        Self {
            coeff: -self.coeff,
            modes: self.modes.iter().map(|m| -m).collect(),
        }
    }
}

impl AbsDiffEq for ForceConstant {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        1e-7
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.modes == other.modes
            && self.coeff.abs_diff_eq(&other.coeff, epsilon)
    }
}

impl Display for ForceConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for m in &self.modes {
            write!(f, "{m:5}")?;
        }
        for _ in self.modes.len()..MAX_MODES {
            write!(f, "{:5}", "")?;
        }
        write!(f, "{:20.12}", self.coeff)
    }
}

/// The full list of force constants for a molecule with `num_modes` normal
/// modes. Records keep the order they were given in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWatson")]
pub struct WatsonHamiltonian {
    data: Vec<ForceConstant>,
    num_modes: usize,
}

#[derive(Deserialize)]
struct RawWatson {
    data: Vec<ForceConstant>,
    num_modes: usize,
}

impl TryFrom<RawWatson> for WatsonHamiltonian {
    type Error = WatsonError;

    fn try_from(raw: RawWatson) -> Result<Self, Self::Error> {
        Self::new(raw.data, raw.num_modes)
    }
}

impl WatsonHamiltonian {
    /// Returns [WatsonError::ModeOutOfRange] if any record refers to a mode
    /// beyond `num_modes`
    pub fn new(
        data: Vec<ForceConstant>,
        num_modes: usize,
    ) -> Result<Self, WatsonError> {
        for fc in &data {
            if let Some(&mode) =
                fc.modes.iter().find(|m| m.unsigned_abs() as usize > num_modes)
            {
                return Err(WatsonError::ModeOutOfRange { mode, num_modes });
            }
        }
        Ok(Self { data, num_modes })
    }

    pub fn data(&self) -> &[ForceConstant] {
        &self.data
    }

    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForceConstant> {
        self.data.iter()
    }

    /// group the records into integral tables by body order
    pub fn vibrational_energy(&self) -> VibrationalEnergy {
        VibrationalEnergy::from(self)
    }
}

impl<'a> IntoIterator for &'a WatsonHamiltonian {
    type Item = &'a ForceConstant;

    type IntoIter = std::slice::Iter<'a, ForceConstant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for WatsonHamiltonian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Watson Hamiltonian ({} modes):", self.num_modes)?;
        for fc in &self.data {
            writeln!(f, "{fc}")?;
        }
        Ok(())
    }
}
