use std::{collections::BTreeMap, fmt::Display};

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::{VibrationalIntegrals, WatsonError, WatsonHamiltonian};

/// body orders that always have a table, even when it is empty
const DEFAULT_BODIES: [usize; 3] = [1, 2, 3];

/// The vibrational energy property: a [WatsonHamiltonian]'s force constants
/// sorted into [VibrationalIntegrals] by the number of distinct modes they
/// couple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVibrationalEnergy")]
pub struct VibrationalEnergy {
    num_modes: usize,
    integrals: BTreeMap<usize, VibrationalIntegrals>,
}

#[derive(Deserialize)]
struct RawVibrationalEnergy {
    num_modes: usize,
    integrals: BTreeMap<usize, VibrationalIntegrals>,
}

impl TryFrom<RawVibrationalEnergy> for VibrationalEnergy {
    type Error = WatsonError;

    fn try_from(raw: RawVibrationalEnergy) -> Result<Self, Self::Error> {
        for (&expected, ints) in &raw.integrals {
            let bad = std::iter::once(ints.num_body())
                .chain(ints.iter().map(|fc| fc.num_body()))
                .find(|&got| got != expected);
            if let Some(got) = bad {
                return Err(WatsonError::BodyOrder { expected, got });
            }
        }
        Ok(Self::new(raw.num_modes, raw.integrals.into_values()))
    }
}

impl VibrationalEnergy {
    pub fn new(
        num_modes: usize,
        integrals: impl IntoIterator<Item = VibrationalIntegrals>,
    ) -> Self {
        let mut ret = Self::empty(num_modes);
        for ints in integrals {
            ret.add_vibrational_integral(ints);
        }
        ret
    }

    fn empty(num_modes: usize) -> Self {
        Self {
            num_modes,
            integrals: DEFAULT_BODIES
                .into_iter()
                .map(|n| (n, VibrationalIntegrals::new(n, Vec::new())))
                .collect(),
        }
    }

    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    /// the table of `num_body`-body terms, if there is one
    pub fn get_vibrational_integral(
        &self,
        num_body: usize,
    ) -> Option<&VibrationalIntegrals> {
        self.integrals.get(&num_body)
    }

    /// insert `integrals`, replacing any table of the same body order
    pub fn add_vibrational_integral(
        &mut self,
        integrals: VibrationalIntegrals,
    ) {
        self.integrals.insert(integrals.num_body(), integrals);
    }

    /// the highest body order present
    pub fn max_body(&self) -> usize {
        self.integrals.keys().next_back().copied().unwrap_or_default()
    }

    /// iterate over the tables in increasing body order
    pub fn iter(&self) -> impl Iterator<Item = &VibrationalIntegrals> {
        self.integrals.values()
    }
}

impl From<&WatsonHamiltonian> for VibrationalEnergy {
    fn from(watson: &WatsonHamiltonian) -> Self {
        let mut ret = Self::empty(watson.num_modes());
        for fc in watson {
            let n = fc.num_body();
            ret.integrals
                .entry(n)
                .or_insert_with(|| VibrationalIntegrals::new(n, Vec::new()))
                .push(fc.clone());
        }
        ret
    }
}

impl AbsDiffEq for VibrationalEnergy {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        VibrationalIntegrals::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        if self.num_modes != other.num_modes
            || !self.integrals.keys().eq(other.integrals.keys())
        {
            return false;
        }
        // no short circuit so every mismatched table gets logged
        self.iter()
            .zip(other.iter())
            .fold(true, |acc, (a, b)| a.abs_diff_eq(b, epsilon) && acc)
    }
}

impl Display for VibrationalEnergy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Vibrational Energy ({} modes):", self.num_modes)?;
        for ints in self.iter() {
            write!(f, "{ints}")?;
        }
        Ok(())
    }
}
