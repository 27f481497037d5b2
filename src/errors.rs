// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Errors that can be returned by the `molgeom_rs` library.

use colored::{ColoredString, Colorize};
use std::path::Path;
use thiserror::Error;

/// Highlight a value inside an error message.
fn hl(value: impl ToString) -> ColoredString {
    value.to_string().yellow()
}

/// Errors that can occur when constructing or using a `UnitCell`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitCellError {
    #[error("{} unit cell contains a non-finite value", "error:".red().bold())]
    NotFinite,
    #[error("{} periodic lattice vectors of the unit cell are linearly dependent (only {} of {} are independent)", "error:".red().bold(), hl(.0), hl(.1))]
    Degenerate(usize, usize),
    #[error("{} could not construct unit cell from lengths `{}` and angles `{}`", "error:".red().bold(), hl(format!("{:?}", .0)), hl(format!("{:?}", .1)))]
    InvalidParameters([f64; 3], [f64; 3]),
    #[error("{} lattice vectors `{}` and `{}` are parallel and do not define a plane", "error:".red().bold(), hl(.0), hl(.1))]
    NotAlignable(char, char),
}

/// Errors that can occur when constructing a `Molecule`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoleculeError {
    #[error("{} molecule has {} atomic numbers but {} {}", "error:".red().bold(), hl(.0), hl(.2), .1)]
    SizeMismatch(usize, &'static str, usize),
    #[error("{} operation requires at least {} atoms but the molecule contains {}", "error:".red().bold(), hl(.0), hl(.1))]
    TooFewAtoms(usize, usize),
    #[error("{} the first three atoms of the molecule are colinear", "error:".red().bold())]
    Colinear,
    #[error("{} position of atom `{}` is not finite", "error:".red().bold(), hl(.0))]
    NotFinite(usize),
    #[error("{} mass `{}` of atom `{}` is invalid", "error:".red().bold(), hl(.1), hl(.0))]
    InvalidMass(usize, f64),
    #[error("{} grid spacing `{}` must be positive", "error:".red().bold(), hl(.0))]
    InvalidSpacing(f64),
}

/// Errors that can occur when building a `BondGraph`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    #[error("{} no covalent radius available for atomic number `{}`", "error:".red().bold(), hl(.0))]
    MissingRadius(u32),
    #[error("{} distance matrix has size {} but {} atomic numbers were provided", "error:".red().bold(), hl(.0), hl(.1))]
    SizeMismatch(usize, usize),
    #[error("{} bond tolerance `{}` must be finite and larger than 1", "error:".red().bold(), hl(.0))]
    InvalidTolerance(f64),
}

/// Errors that can occur when constructing a `BondGraph` from explicit edges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{} edge `{}-{}` is a self-loop", "error:".red().bold(), hl(.0), hl(.0))]
    SelfLoop(usize),
    #[error("{} edge `{}-{}` refers to an atom outside the graph of {} atoms", "error:".red().bold(), hl(.0), hl(.1), hl(.2))]
    IndexOutOfRange(usize, usize, usize),
}

/// Errors that can occur when working with atomic masses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MassError {
    #[error("{} molecule has no masses assigned", "error:".red().bold())]
    NoMasses,
    #[error("{} no mass available for atomic number `{}`", "error:".red().bold(), hl(.0))]
    MissingMass(u32),
    #[error("{} total mass of the molecule is not positive", "error:".red().bold())]
    ZeroMass,
    #[error("{} eigen-decomposition of the inertia tensor did not converge", "error:".red().bold())]
    NoConvergence,
}

/// Errors that can occur when detecting rotational symmetry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymmetryError {
    #[error("{} structure has {} atomic numbers but {} positions", "error:".red().bold(), hl(.0), hl(.1))]
    SizeMismatch(usize, usize),
    #[error("{} {} did not converge", "error:".red().bold(), .0)]
    NoConvergence(&'static str),
    #[error("{} mass-weighted analysis requested but no masses were provided", "error:".red().bold())]
    MissingMasses,
    #[error("{} structure has {} positions but {} masses", "error:".red().bold(), hl(.0), hl(.1))]
    MassesMismatch(usize, usize),
    #[error("{} rotation axis `{}` has zero length", "error:".red().bold(), hl(format!("{:?}", .0)))]
    InvalidAxis([f64; 3]),
    #[error("{} invalid symmetry parameters: {}", "error:".red().bold(), .0)]
    InvalidParams(String),
    #[error("{} could not parse symmetry parameters ({})", "error:".red().bold(), .0)]
    CouldNotParseYaml(String),
}

/// Errors that can occur when aligning two sets of points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("{} reference contains {} points but mobile contains {}", "error:".red().bold(), hl(.0), hl(.1))]
    SizeMismatch(usize, usize),
    #[error("{} {} weights were provided for {} points", "error:".red().bold(), hl(.0), hl(.1))]
    WeightsMismatch(usize, usize),
    #[error("{} weights must be non-negative and sum to a positive value", "error:".red().bold())]
    InvalidWeights,
    #[error("{} cannot align empty sets of points", "error:".red().bold())]
    Empty,
    #[error("{} singular value decomposition of the covariance matrix did not converge", "error:".red().bold())]
    NoConvergence,
}

/// Errors that can occur when reading the element table.
#[derive(Error, Debug)]
pub enum ElementError {
    #[error("{} file `{}` was not found", "error:".red().bold(), hl(.0.display()))]
    FileNotFound(Box<Path>),
    #[error("{} file `{}` could not be read", "error:".red().bold(), hl(.0.display()))]
    FileCouldNotBeRead(Box<Path>),
    #[error("{} could not parse yaml input ({})", "error:".red().bold(), .0)]
    CouldNotParseYaml(serde_yaml::Error),
    #[error("{} element `{}` has an invalid {} (`{}`)", "error:".red().bold(), hl(.0), .1, hl(.2))]
    InvalidValue(String, &'static str, f64),
    #[error("{} element `{}` is missing the field `{}`", "error:".red().bold(), hl(.0), .1)]
    MissingField(String, &'static str),
    #[error("{} atomic number `{}` is shared by elements `{}` and `{}`", "error:".red().bold(), hl(.0), hl(.1), hl(.2))]
    DuplicateNumber(u32, String, String),
    #[error("{} symbol `{}` is shared by elements `{}` and `{}`", "error:".red().bold(), hl(.0), hl(.1), hl(.2))]
    DuplicateSymbol(String, String, String),
}
