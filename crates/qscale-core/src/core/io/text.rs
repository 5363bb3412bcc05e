use crate::core::io::traits::RecordFile;
use crate::core::models::graph::{BondGraph, GraphError};
use crate::core::models::molecule::{ModelError, Molecule};
use nalgebra::Point3;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: TextParseErrorKind },
    #[error("Invalid bond graph: {0}")]
    Graph(#[from] GraphError),
    #[error("Inconsistent data: {0}")]
    Inconsistency(#[from] ModelError),
    #[error("In '{path}': {source}", path = path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<TextError>,
    },
}

impl TextError {
    fn in_file(path: &Path) -> impl FnOnce(TextError) -> TextError + '_ {
        move |source| TextError::InFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextParseErrorKind {
    #[error("Invalid float value '{0}'")]
    InvalidFloat(String),
    #[error("Invalid atom index '{0}'")]
    InvalidIndex(String),
    #[error("Expected {expected} columns, found {found}")]
    ColumnCount { expected: String, found: usize },
    #[error("Invalid adjacency flag '{0}' (expected 0 or 1)")]
    InvalidFlag(String),
}

/// How the bond file encodes connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondFormat {
    /// One bonded `i j` index pair per line, zero-based.
    #[default]
    Pairs,
    /// A dense `N × N` matrix of `0`/`1` flags, one row per line.
    Matrix,
}

impl FromStr for BondFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pairs" | "pair" | "list" => Ok(Self::Pairs),
            "matrix" | "adjacency" => Ok(Self::Matrix),
            other => Err(format!(
                "unknown bond format '{}', expected 'pairs' or 'matrix'",
                other
            )),
        }
    }
}

/// Yields `(line_number, tokens)` for every line that is not blank or a `#` comment.
fn records(
    reader: &mut impl BufRead,
) -> impl Iterator<Item = Result<(usize, Vec<String>), io::Error>> + '_ {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line_res)| match line_res {
            Err(e) => Some(Err(e)),
            Ok(line) => {
                let content = line.split('#').next().unwrap_or("").trim();
                if content.is_empty() {
                    None
                } else {
                    let tokens = content.split_whitespace().map(str::to_string).collect();
                    Some(Ok((idx + 1, tokens)))
                }
            }
        })
}

fn parse_float(token: &str, line: usize) -> Result<f64, TextError> {
    token.parse().map_err(|_| TextError::Parse {
        line,
        kind: TextParseErrorKind::InvalidFloat(token.to_string()),
    })
}

fn parse_index(token: &str, line: usize) -> Result<usize, TextError> {
    token.parse().map_err(|_| TextError::Parse {
        line,
        kind: TextParseErrorKind::InvalidIndex(token.to_string()),
    })
}

/// Atom coordinates: `x y z` per line, with an optional ignored fourth column.
pub struct PositionsFile;

impl RecordFile for PositionsFile {
    type Output = Vec<Point3<f64>>;
    type Error = TextError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut positions = Vec::new();
        for record in records(reader) {
            let (line, tokens) = record?;
            if !(3..=4).contains(&tokens.len()) {
                return Err(TextError::Parse {
                    line,
                    kind: TextParseErrorKind::ColumnCount {
                        expected: "3 or 4".to_string(),
                        found: tokens.len(),
                    },
                });
            }
            positions.push(Point3::new(
                parse_float(&tokens[0], line)?,
                parse_float(&tokens[1], line)?,
                parse_float(&tokens[2], line)?,
            ));
        }
        Ok(positions)
    }
}

/// Partial charges, any number of values per line, read in order.
pub struct ChargesFile;

impl RecordFile for ChargesFile {
    type Output = Vec<f64>;
    type Error = TextError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut charges = Vec::new();
        for record in records(reader) {
            let (line, tokens) = record?;
            for token in &tokens {
                charges.push(parse_float(token, line)?);
            }
        }
        Ok(charges)
    }
}

/// Bond connectivity for a molecule of known size.
pub struct BondsFile {
    pub atom_count: usize,
    pub format: BondFormat,
}

impl BondsFile {
    fn read_pairs(&self, reader: &mut impl BufRead) -> Result<BondGraph, TextError> {
        let mut pairs = Vec::new();
        for record in records(reader) {
            let (line, tokens) = record?;
            if tokens.len() != 2 {
                return Err(TextError::Parse {
                    line,
                    kind: TextParseErrorKind::ColumnCount {
                        expected: "2".to_string(),
                        found: tokens.len(),
                    },
                });
            }
            pairs.push((parse_index(&tokens[0], line)?, parse_index(&tokens[1], line)?));
        }
        Ok(BondGraph::from_bonds(self.atom_count, &pairs)?)
    }

    fn read_matrix(&self, reader: &mut impl BufRead) -> Result<BondGraph, TextError> {
        let mut rows = Vec::with_capacity(self.atom_count);
        for record in records(reader) {
            let (line, tokens) = record?;
            if tokens.len() != self.atom_count {
                return Err(TextError::Parse {
                    line,
                    kind: TextParseErrorKind::ColumnCount {
                        expected: self.atom_count.to_string(),
                        found: tokens.len(),
                    },
                });
            }
            let row = tokens
                .iter()
                .map(|t| match t.as_str() {
                    "0" => Ok(false),
                    "1" => Ok(true),
                    other => Err(TextError::Parse {
                        line,
                        kind: TextParseErrorKind::InvalidFlag(other.to_string()),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        // Pad missing rows so the shape check reports the first one.
        if rows.len() < self.atom_count {
            rows.resize(self.atom_count, Vec::new());
        }
        let graph = BondGraph::from_adjacency_matrix(&rows)?;

        // Bonds are undirected and never close on the same atom.
        for (i, row) in rows.iter().enumerate() {
            if row[i] {
                return Err(GraphError::SelfLoop(i).into());
            }
            if let Some(j) = (i + 1..rows.len()).find(|&j| row[j] != rows[j][i]) {
                return Err(GraphError::Asymmetric { i, j }.into());
            }
        }
        Ok(graph)
    }
}

impl RecordFile for BondsFile {
    type Output = BondGraph;
    type Error = TextError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        match self.format {
            BondFormat::Pairs => self.read_pairs(reader),
            BondFormat::Matrix => self.read_matrix(reader),
        }
    }
}

/// Locations of the three files that together describe a molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeSource {
    pub positions: PathBuf,
    pub charges: PathBuf,
    pub bonds: PathBuf,
    pub bond_format: BondFormat,
}

impl MoleculeSource {
    /// Reads all three files and assembles a [`Molecule`].
    ///
    /// The atom count is taken from the positions file. Errors raised while
    /// reading one file are wrapped in [`TextError::InFile`].
    pub fn load(&self) -> Result<Molecule, TextError> {
        let positions = PositionsFile
            .read_from_path(&self.positions)
            .map_err(TextError::in_file(&self.positions))?;
        let charges = ChargesFile
            .read_from_path(&self.charges)
            .map_err(TextError::in_file(&self.charges))?;
        let bonds = BondsFile {
            atom_count: positions.len(),
            format: self.bond_format,
        }
        .read_from_path(&self.bonds)
        .map_err(TextError::in_file(&self.bonds))?;
        Ok(Molecule::new(positions, charges, bonds)?)
    }
}
