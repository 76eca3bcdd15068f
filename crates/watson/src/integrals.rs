use std::fmt::Display;

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::ForceConstant;

/// The force constants of a single body order, in the order they appeared in
/// the source [crate::WatsonHamiltonian]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VibrationalIntegrals {
    num_body: usize,
    integrals: Vec<ForceConstant>,
}

impl VibrationalIntegrals {
    pub fn new(num_body: usize, integrals: Vec<ForceConstant>) -> Self {
        Self {
            num_body,
            integrals,
        }
    }

    pub fn num_body(&self) -> usize {
        self.num_body
    }

    pub fn integrals(&self) -> &[ForceConstant] {
        &self.integrals
    }

    pub fn len(&self) -> usize {
        self.integrals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.integrals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForceConstant> {
        self.integrals.iter()
    }

    pub(crate) fn push(&mut self, fc: ForceConstant) {
        self.integrals.push(fc);
    }
}

/// Two tables are close when they have the same body order, the same length,
/// and each pair of records in order has identical modes and coefficients
/// within `epsilon`. Zipping alone would silently ignore extra records on
/// either side, so a length mismatch is reported and counts as a difference.
impl AbsDiffEq for VibrationalIntegrals {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        ForceConstant::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        if self.num_body != other.num_body {
            return false;
        }
        if self.len() != other.len() {
            log::warn!(
                "{}-body tables differ in length: {} vs {}",
                self.num_body,
                self.len(),
                other.len()
            );
            return false;
        }
        let mut ret = true;
        for (a, b) in self.iter().zip(other.iter()) {
            if !a.abs_diff_eq(b, epsilon) {
                log::warn!("{}-body mismatch: {a} vs {b}", self.num_body);
                ret = false;
            }
        }
        ret
    }
}

impl Display for VibrationalIntegrals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}-Body Terms:", self.num_body)?;
        for fc in &self.integrals {
            writeln!(f, "{fc}")?;
        }
        Ok(())
    }
}
