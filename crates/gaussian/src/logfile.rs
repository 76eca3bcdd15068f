//! Reading force constants out of Gaussian anharmonic frequency logs

use std::{
    fs::read_to_string,
    path::Path,
    str::FromStr,
    sync::{LazyLock, OnceLock},
};

use regex::Regex;
use rustc_hash::FxHashMap;
use watson::{ForceConstant, VibrationalEnergy, WatsonHamiltonian};

use crate::program::ProgramError;


/// A force constant as printed by Gaussian: the mode labels in A numbering
/// followed by the reduced value `FI` and the two unit conversions `k` and `K`
#[derive(Clone, Debug, PartialEq)]
pub struct RawForceConstant {
    pub labels: Vec<String>,
    pub fi: f64,
    pub k: f64,
    pub big_k: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Quadratic = 2,
    Cubic = 3,
    Quartic = 4,
}

impl Order {
    /// the number of mode labels on each row of the section
    pub fn indices(self) -> usize {
        self as usize
    }

    /// the Taylor series denominator applied to `FI`, before the multinomial
    /// factor for repeated modes
    fn factor(self) -> f64 {
        match self {
            Order::Quadratic => 2.0,
            Order::Cubic => 2.0 * std::f64::consts::SQRT_2,
            Order::Quartic => 4.0,
        }
    }

    fn header(self) -> &'static Regex {
        static CELL: OnceLock<[Regex; 3]> = OnceLock::new();
        let headers = CELL.get_or_init(|| {
            ["QUADRATIC", "CUBIC", "QUARTIC"].map(|name| {
                Regex::new(&format!(
                    r":\s+{name}\s+FORCE\s+CONSTANTS\s+IN\s+NORMAL\s+MODES"
                ))
                .unwrap()
            })
        });
        &headers[self.indices() - 2]
    }

    fn row(self) -> &'static Regex {
        static CELL: OnceLock<[Regex; 3]> = OnceLock::new();
        let rows = CELL.get_or_init(|| {
            [2, 3, 4].map(|n| {
                let labels = r"(\w+)\s+".repeat(n);
                let value = r"([+-]?\d+\.\d+)";
                Regex::new(&format!(
                    r"^\s*{labels}{value}\s+{value}\s+{value}\s*$"
                ))
                .unwrap()
            })
        });
        &rows[self.indices() - 2]
    }
}

static IO_INFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Input/Output\s+information").unwrap());
static H_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(H\)\s*\|").unwrap());
static A_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(A\)\s*\|").unwrap());
static NOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"NOTE:").unwrap());
static ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Error termination").unwrap());

/// The contents of a Gaussian log file, split into lines
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianLog {
    lines: Vec<String>,
}

impl FromStr for GaussianLog {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            lines: s.lines().map(str::to_owned).collect(),
        })
    }
}

impl GaussianLog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let path = path.as_ref();
        let name = path.to_string_lossy().to_string();
        if !path.exists() {
            return Err(ProgramError::FileNotFound(name));
        }
        let contents = read_to_string(path)
            .map_err(|e| ProgramError::ReadFileError(name, e.kind()))?;
        let Ok(ret) = contents.parse::<Self>();
        Ok(ret)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// whether Gaussian reported an error termination anywhere in the log
    pub fn error_termination(&self) -> bool {
        self.lines.iter().any(|l| ERROR.is_match(l))
    }

    pub fn quadratic_force_constants(
        &self,
    ) -> Result<Vec<RawForceConstant>, ProgramError> {
        self.force_constants(Order::Quadratic)
    }

    pub fn cubic_force_constants(
        &self,
    ) -> Result<Vec<RawForceConstant>, ProgramError> {
        self.force_constants(Order::Cubic)
    }

    pub fn quartic_force_constants(
        &self,
    ) -> Result<Vec<RawForceConstant>, ProgramError> {
        self.force_constants(Order::Quartic)
    }

    /// Collect the rows of the `order` section. The table starts at the first
    /// row after the section header and ends at the first line after that
    /// which is not a row. A log without the section gives an empty table.
    pub fn force_constants(
        &self,
        order: Order,
    ) -> Result<Vec<RawForceConstant>, ProgramError> {
        let Some(start) =
            self.lines.iter().position(|l| order.header().is_match(l))
        else {
            log::debug!("no {order:?} force constants in log");
            return Ok(Vec::new());
        };
        let n = order.indices();
        let mut ret = Vec::new();
        for line in &self.lines[start + 1..] {
            let Some(caps) = order.row().captures(line) else {
                if ret.is_empty() {
                    continue;
                }
                break;
            };
            let value = |i: usize| {
                caps[n + 1 + i].parse::<f64>().map_err(|_| {
                    ProgramError::ParseError(format!(
                        "bad force constant in `{line}`"
                    ))
                })
            };
            ret.push(RawForceConstant {
                labels: (1..=n).map(|i| caps[i].to_owned()).collect(),
                fi: value(0)?,
                k: value(1)?,
                big_k: value(2)?,
            });
        }
        log::debug!("found {} {order:?} force constants", ret.len());
        Ok(ret)
    }

    /// Map the labels of Gaussian's anharmonic (A) mode numbering, such as
    /// `1` or `3a`, to the integers of its harmonic (H) numbering. The
    /// correspondence table follows the `Input/Output information` banner and
    /// ends at the first `NOTE:` after both rows have been seen.
    pub fn a_to_h_numbering(
        &self,
    ) -> Result<FxHashMap<String, usize>, ProgramError> {
        fn cells<'a>(line: &'a str, tag: &str) -> Vec<&'a str> {
            line.split('|')
                .map(str::trim)
                .filter(|c| !c.is_empty() && !c.contains(tag))
                .collect()
        }

        let Some(start) = self.lines.iter().position(|l| IO_INFO.is_match(l))
        else {
            return Err(ProgramError::NumberingNotFound);
        };
        let mut h_nums = Vec::new();
        let mut a_nums = Vec::new();
        let mut done = false;
        for line in &self.lines[start + 1..] {
            if H_ROW.is_match(line) {
                h_nums.extend(cells(line, "(H)"));
            } else if A_ROW.is_match(line) {
                a_nums.extend(cells(line, "(A)"));
            }
            if !h_nums.is_empty() && !a_nums.is_empty() && NOTE.is_match(line)
            {
                done = true;
                break;
            }
        }
        if !done {
            return Err(ProgramError::NumberingNotFound);
        }
        if h_nums.len() != a_nums.len() {
            return Err(ProgramError::ParseError(format!(
                "{} H modes but {} A modes in numbering table",
                h_nums.len(),
                a_nums.len()
            )));
        }
        let mut ret = FxHashMap::default();
        for (a, h) in a_nums.into_iter().zip(h_nums) {
            let h = h.parse().map_err(|_| {
                ProgramError::ParseError(format!("bad H mode number `{h}`"))
            })?;
            ret.insert(a.to_owned(), h);
        }
        Ok(ret)
    }

    /// Build the [WatsonHamiltonian] from the quadratic, cubic, and quartic
    /// force constants. Mode labels are converted to integers counting down
    /// from the highest H number, so the highest H mode becomes mode 1. If
    /// `normalize` is set, each coefficient is also divided by the product of
    /// the factorials of its repeated indices. Every quadratic term is
    /// followed by its mirror.
    pub fn watson_hamiltonian(
        &self,
        normalize: bool,
    ) -> Result<WatsonHamiltonian, ProgramError> {
        let a2h = self.a_to_h_numbering()?;
        let max_h = a2h.values().copied().max().unwrap_or_default();
        let mut data = Vec::new();
        for order in [Order::Quadratic, Order::Cubic, Order::Quartic] {
            for raw in self.force_constants(order)? {
                let modes = raw
                    .labels
                    .iter()
                    .map(|l| match a2h.get(l) {
                        Some(&h) => Ok((max_h + 1 - h) as i32),
                        None => Err(ProgramError::UnknownMode(l.clone())),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let mut factor = order.factor();
                if normalize {
                    factor *= multinomial(&modes);
                }
                let fc = ForceConstant::new(raw.fi / factor, modes)?;
                if order == Order::Quadratic {
                    let mirror = fc.mirror();
                    data.push(fc);
                    data.push(mirror);
                } else {
                    data.push(fc);
                }
            }
        }
        Ok(WatsonHamiltonian::new(data, a2h.len())?)
    }

    pub fn vibrational_energy(
        &self,
        normalize: bool,
    ) -> Result<VibrationalEnergy, ProgramError> {
        Ok(self.watson_hamiltonian(normalize)?.vibrational_energy())
    }
}

/// the product of the factorials of the number of times each distinct index
/// occurs in `indices`
fn multinomial(indices: &[i32]) -> f64 {
    let mut counts: FxHashMap<i32, u32> = FxHashMap::default();
    for i in indices {
        *counts.entry(*i).or_default() += 1;
    }
    counts
        .values()
        .map(|&c| (1..=c).product::<u32>() as f64)
        .product()
}
