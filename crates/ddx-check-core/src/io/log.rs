use nalgebra::Vector3;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// Substring identifying the line that carries the solvation energy.
pub const ENERGY_MARKER: &str = "Solvation energy (Hartree):";
/// Substring opening the per-atom forces block.
pub const FORCES_MARKER: &str = "Full forces (kcal/mol/A)";

// 0-based position of the energy value on its marker line.
const ENERGY_TOKEN_INDEX: usize = 3;
const FORCE_ROW_MIN_TOKENS: usize = 4;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: LogParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogParseErrorKind {
    #[error("Invalid float for {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Energy marker present but the value token is missing")]
    MissingEnergyValue,
    #[error("Force row has fewer than 4 tokens: '{content}'")]
    TruncatedForceRow { content: String },
}

/// Position of the line scanner relative to the forces block.
///
/// The scanner starts in [`ParserState::Scanning`] and moves to
/// [`ParserState::InForces`] on the first forces marker. It never moves back;
/// the block runs to the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    #[default]
    Scanning,
    InForces,
}

impl ParserState {
    pub fn transition(self, line: &str) -> Self {
        match self {
            ParserState::Scanning if line.contains(FORCES_MARKER) => ParserState::InForces,
            state => state,
        }
    }
}

/// Energy and forces extracted from one solver log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverLog {
    /// Solvation energy in Hartree. `0.0` when the log has no energy marker.
    pub energy: f64,
    /// 1-based line the energy was taken from, `None` if the marker never appeared.
    pub energy_line: Option<usize>,
    /// Per-atom forces in kcal/mol/Å, in log order.
    pub forces: Vec<Vector3<f64>>,
}

impl SolverLog {
    pub fn has_energy(&self) -> bool {
        self.energy_line.is_some()
    }

    pub fn atom_count(&self) -> usize {
        self.forces.len()
    }

    /// Parses a solver log from a buffered reader in a single forward pass.
    ///
    /// When the energy marker repeats, the last occurrence wins. Inside the
    /// forces block every line other than the forces marker is read as a force
    /// row, the energy line included, so an energy line there aborts the parse.
    /// Blank lines are skipped; any other row with fewer than four tokens is
    /// reported as [`LogParseErrorKind::TruncatedForceRow`].
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] if reading fails and [`LogError::Parse`] for
    /// malformed energy or force lines.
    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, LogError> {
        let mut log = SolverLog::default();
        let mut state = ParserState::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if line.contains(ENERGY_MARKER) {
                log.energy = parse_energy(&line, line_num)?;
                log.energy_line = Some(line_num);
                trace!(line = line_num, energy = log.energy, "Read solvation energy.");
            }

            if line.contains(FORCES_MARKER) {
                let next = state.transition(&line);
                if next != state {
                    debug!(line = line_num, "Entering forces block.");
                }
                state = next;
                continue;
            }

            if state == ParserState::InForces {
                if let Some(row) = parse_force_row(&line, line_num)? {
                    log.forces.push(row);
                }
            }
        }

        debug!(
            atoms = log.forces.len(),
            has_energy = log.has_energy(),
            "Finished parsing solver log."
        );
        Ok(log)
    }

    /// Opens `path` and parses it with [`SolverLog::read_from`].
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

impl FromStr for SolverLog {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::read_from(&mut s.as_bytes())
    }
}

fn parse_float(value: &str, field: &'static str, line: usize) -> Result<f64, LogError> {
    value.parse().map_err(|_| LogError::Parse {
        line,
        kind: LogParseErrorKind::InvalidFloat {
            field,
            value: value.into(),
        },
    })
}

fn parse_energy(line: &str, line_num: usize) -> Result<f64, LogError> {
    let token = line
        .split_whitespace()
        .nth(ENERGY_TOKEN_INDEX)
        .ok_or_else(|| LogError::Parse {
            line: line_num,
            kind: LogParseErrorKind::MissingEnergyValue,
        })?;
    parse_float(token, "energy", line_num)
}

fn parse_force_row(line: &str, line_num: usize) -> Result<Option<Vector3<f64>>, LogError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }
    if tokens.len() < FORCE_ROW_MIN_TOKENS {
        return Err(LogError::Parse {
            line: line_num,
            kind: LogParseErrorKind::TruncatedForceRow {
                content: line.trim().to_string(),
            },
        });
    }

    let fx = parse_float(tokens[1], "fx", line_num)?;
    let fy = parse_float(tokens[2], "fy", line_num)?;
    let fz = parse_float(tokens[3], "fz", line_num)?;
    Ok(Some(Vector3::new(fx, fy, fz)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const REFERENCE_LOG: &str = "\
 ddX driver output
 Solvation energy (Hartree):    -5.1000000000
 Full forces (kcal/mol/A)
      1    0.10    0.20    0.30
      2   -0.10   -0.20   -0.30
";

    fn parse_err_kind(result: Result<SolverLog, LogError>) -> (usize, LogParseErrorKind) {
        match result {
            Err(LogError::Parse { line, kind }) => (line, kind),
            other => panic!("Expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn parses_energy_and_forces_from_reference_log() {
        let log: SolverLog = REFERENCE_LOG.parse().unwrap();

        assert_eq!(log.energy, -5.1);
        assert_eq!(log.energy_line, Some(2));
        assert_eq!(log.atom_count(), 2);
        assert_eq!(log.forces[0], Vector3::new(0.10, 0.20, 0.30));
        assert_eq!(log.forces[1], Vector3::new(-0.10, -0.20, -0.30));
    }

    #[test]
    fn path_and_string_parsing_yield_identical_results() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.ref");
        fs::write(&path, REFERENCE_LOG).unwrap();

        let from_path = SolverLog::read_from_path(&path).unwrap();
        let from_str = SolverLog::from_str(REFERENCE_LOG).unwrap();

        assert_eq!(from_path, from_str);
    }

    #[test]
    fn last_energy_marker_wins() {
        let text = "\
Solvation energy (Hartree): -1.0
Solvation energy (Hartree): -2.5
";
        let log: SolverLog = text.parse().unwrap();
        assert_eq!(log.energy, -2.5);
        assert_eq!(log.energy_line, Some(2));
    }

    #[test]
    fn missing_energy_marker_defaults_to_zero() {
        let text = "Full forces (kcal/mol/A)\n1 1.0 2.0 3.0\n";
        let log: SolverLog = text.parse().unwrap();

        assert_eq!(log.energy, 0.0);
        assert!(!log.has_energy());
        assert_eq!(log.atom_count(), 1);
    }

    #[test]
    fn rows_before_forces_marker_are_ignored() {
        let text = "1 9.0 9.0 9.0\nFull forces (kcal/mol/A)\n1 1.0 2.0 3.0\n";
        let log: SolverLog = text.parse().unwrap();
        assert_eq!(log.forces, vec![Vector3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn blank_lines_in_forces_block_are_skipped() {
        let text = "Full forces (kcal/mol/A)\n\n1 1.0 2.0 3.0\n   \n2 4.0 5.0 6.0\n\n";
        let log: SolverLog = text.parse().unwrap();
        assert_eq!(log.atom_count(), 2);
    }

    #[test]
    fn extra_tokens_on_force_row_are_ignored() {
        let text = "Full forces (kcal/mol/A)\n1 1.0 2.0 3.0 C1 extra\n";
        let log: SolverLog = text.parse().unwrap();
        assert_eq!(log.forces, vec![Vector3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn repeated_forces_marker_is_not_a_row() {
        let text = "Full forces (kcal/mol/A)\n1 1.0 2.0 3.0\nFull forces (kcal/mol/A)\n2 4.0 5.0 6.0\n";
        let log: SolverLog = text.parse().unwrap();
        assert_eq!(log.atom_count(), 2);
    }

    #[test]
    fn energy_line_inside_forces_block_is_read_as_a_force_row() {
        let text = "Full forces (kcal/mol/A)\n1 0.1 0.2 0.3\n Solvation energy (Hartree): -3.0\n";
        let (line, kind) = parse_err_kind(text.parse::<SolverLog>());

        assert_eq!(line, 3);
        assert_eq!(
            kind,
            LogParseErrorKind::InvalidFloat {
                field: "fx",
                value: "energy".to_string()
            }
        );
    }

    #[test]
    fn energy_line_before_forces_block_is_not_a_row() {
        let text = " Solvation energy (Hartree): -3.0\nFull forces (kcal/mol/A)\n1 0.1 0.2 0.3\n";
        let log: SolverLog = text.parse().unwrap();
        assert_eq!(log.energy, -3.0);
        assert_eq!(log.atom_count(), 1);
    }

    #[test]
    fn truncated_force_row_reports_line_and_content() {
        let text = "Full forces (kcal/mol/A)\n1 1.0 2.0 3.0\n2 4.0 5.0\n";
        let (line, kind) = parse_err_kind(text.parse::<SolverLog>());

        assert_eq!(line, 3);
        assert_eq!(
            kind,
            LogParseErrorKind::TruncatedForceRow {
                content: "2 4.0 5.0".to_string()
            }
        );
    }

    #[test]
    fn invalid_force_component_aborts_parse() {
        let text = "Full forces (kcal/mol/A)\n1 1.0 abc 3.0\n";
        let (line, kind) = parse_err_kind(text.parse::<SolverLog>());

        assert_eq!(line, 2);
        assert_eq!(
            kind,
            LogParseErrorKind::InvalidFloat {
                field: "fy",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn invalid_energy_value_aborts_parse() {
        let text = "Solvation energy (Hartree): ***\n";
        let (line, kind) = parse_err_kind(text.parse::<SolverLog>());

        assert_eq!(line, 1);
        assert!(matches!(kind, LogParseErrorKind::InvalidFloat { field: "energy", .. }));
    }

    #[test]
    fn energy_marker_without_value_is_an_error() {
        let text = "Solvation energy (Hartree):\n";
        let (_, kind) = parse_err_kind(text.parse::<SolverLog>());
        assert_eq!(kind, LogParseErrorKind::MissingEnergyValue);
    }

    #[test]
    fn read_from_path_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = SolverLog::read_from_path(dir.path().join("missing.ref"));
        assert!(matches!(result, Err(LogError::Io(_))));
    }

    #[test]
    fn parser_state_enters_forces_once_and_stays() {
        let state = ParserState::default();
        assert_eq!(state, ParserState::Scanning);

        let state = state.transition("nothing here");
        assert_eq!(state, ParserState::Scanning);

        let state = state.transition(" Full forces (kcal/mol/A) ");
        assert_eq!(state, ParserState::InForces);

        let state = state.transition("");
        assert_eq!(state, ParserState::InForces);
    }

    #[test]
    fn empty_input_yields_default_log() {
        let log: SolverLog = "".parse().unwrap();
        assert_eq!(log, SolverLog::default());
    }
}
