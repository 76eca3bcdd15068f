use std::{
    error::Error,
    fmt::Display,
    io::{ErrorKind, Write},
    process::{Command, Stdio},
    str::FromStr,
    sync::{LazyLock, OnceLock},
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use watson::WatsonError;

use crate::geom::Molecule;

/// The command used to run Gaussian, taken from the environment variable
/// `G16_CMD` if it is set
pub static G16_CMD: LazyLock<String> = LazyLock::new(|| {
    std::env::var("G16_CMD").unwrap_or_else(|_| String::from("g16"))
});

/// number of output lines to keep in [ProgramError::ProgramFailed]
const TAIL_LINES: usize = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum ProgramError {
    FileNotFound(String),
    ReadFileError(String, ErrorKind),
    ProgramNotFound(String),
    SpawnError(String, ErrorKind),
    /// the command that failed and the end of its output
    ProgramFailed(String, String),
    ErrorInOutput(String),
    NumberingNotFound,
    UnknownMode(String),
    ParseError(String),
    Watson(WatsonError),
    ConfigError(String),
}

impl ProgramError {
    /// Returns `true` if the program error is [`ErrorInOutput`].
    ///
    /// [`ErrorInOutput`]: ProgramError::ErrorInOutput
    #[must_use]
    pub fn is_error_in_output(&self) -> bool {
        matches!(self, Self::ErrorInOutput(..))
    }
}

impl Display for ProgramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramError::Watson(e) => write!(f, "{e}"),
            e => write!(f, "{e:?}"),
        }
    }
}

impl Error for ProgramError {}

impl From<WatsonError> for ProgramError {
    fn from(value: WatsonError) -> Self {
        Self::Watson(value)
    }
}

/// The template for job control files built from a [Molecule]. In line with
/// [Go templates](https://pkg.go.dev/text/template), `{{.basis}}`,
/// `{{.title}}`, `{{.charge}}`, `{{.mult}}`, and `{{.geom}}` are replaced by
/// the basis set, the molecular formula, the charge, the spin multiplicity,
/// and one line per atom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub header: String,
}

impl Template {
    pub fn from(s: &str) -> Self {
        Self {
            header: s.to_string(),
        }
    }

    pub fn render(&self, mol: &Molecule, basis: &str) -> JobControl {
        use std::fmt::Write;
        let mut geom = String::new();
        for atom in &mol.atoms {
            writeln!(geom, "{atom}").unwrap();
        }
        let body = self
            .header
            .replace("{{.basis}}", basis)
            .replace("{{.title}}", &mol.formula())
            .replace("{{.charge}}", &mol.charge.to_string())
            .replace("{{.mult}}", &mol.multiplicity.to_string())
            .replace("{{.geom}}\n", &geom)
            .replace("{{.geom}}", geom.trim_end());
        JobControl::new(body.lines())
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::from(
            "#p B3LYP/{{.basis}} Freq=(Anharm) Int=Ultrafine SCF=VeryTight

{{.title}} geometry optimization

{{.charge}} {{.mult}}
{{.geom}}


",
        )
    }
}

impl From<String> for Template {
    fn from(header: String) -> Self {
        Self { header }
    }
}

/// The lines of a Gaussian job control file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobControl {
    lines: Vec<String>,
}

static ANHARM: OnceLock<Regex> = OnceLock::new();

impl JobControl {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// the first line starting with `#`, if any
    pub fn route(&self) -> Option<&str> {
        self.lines
            .iter()
            .map(|l| l.trim())
            .find(|l| l.starts_with('#'))
    }

    /// whether the route section asks for an anharmonic frequency calculation,
    /// without which Gaussian prints no cubic or quartic force constants
    pub fn is_anharmonic(&self) -> bool {
        let re = ANHARM.get_or_init(|| {
            Regex::new(r"(?i)\bfreq\s*=\s*\(?[^)\s]*anharm").unwrap()
        });
        self.route().is_some_and(|r| re.is_match(r))
    }
}

impl FromStr for JobControl {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.lines()))
    }
}

impl Display for JobControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Run `cmd` with `input` on its standard input and return everything it wrote
/// to standard output. `cmd` is split on whitespace into a program and its
/// arguments.
pub fn run_gaussian(
    cmd: &str,
    input: &JobControl,
) -> Result<String, ProgramError> {
    let mut words = cmd.split_whitespace();
    let Some(prog) = words.next() else {
        return Err(ProgramError::ProgramNotFound(cmd.to_owned()));
    };
    if !input.is_anharmonic() {
        log::warn!(
            "route `{}` does not request Freq=(Anharm)",
            input.route().unwrap_or_default()
        );
    }
    log::info!("running `{cmd}`");
    let mut child = Command::new(prog)
        .args(words)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                ProgramError::ProgramNotFound(cmd.to_owned())
            }
            kind => ProgramError::SpawnError(cmd.to_owned(), kind),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        // a program that exits without reading its input is reported below by
        // its exit status
        if let Err(e) = stdin.write_all(input.to_string().as_bytes()) {
            log::warn!("failed to write job control file to `{cmd}`: {e}");
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| ProgramError::SpawnError(cmd.to_owned(), e.kind()))?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let all: Vec<_> = stdout.lines().chain(stderr.lines()).collect();
        let tail = all[all.len().saturating_sub(TAIL_LINES)..].join("\n");
        log::error!("`{cmd}` exited with {}", output.status);
        return Err(ProgramError::ProgramFailed(cmd.to_owned(), tail));
    }
    Ok(stdout)
}
