// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of the Molecule structure and its builder.

use crate::{
    errors::MoleculeError,
    structures::{bond_graph::BondGraph, unit_cell::UnitCell, vector3d::Vector3D},
};

pub mod composition;
pub mod distances;
pub mod geometry;
pub mod guess;
pub mod mass;
pub mod rmsd;
pub mod symmetry;

/// Set of atoms with positions in space, optionally inside a periodic unit cell.
///
/// `Molecule` is immutable: all fields are private and only shared references to them are provided.
/// Modified copies are created using [`Molecule::copy_with`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "MoleculeBuilder")
)]
pub struct Molecule {
    /// Atomic numbers of the atoms. Zero is used for probes (dummy atoms).
    numbers: Vec<u32>,
    /// Cartesian coordinates of the atoms in Å.
    coordinates: Vec<Vector3D>,
    /// Masses of the atoms in daltons.
    masses: Option<Vec<f64>>,
    /// Symbols of the atoms.
    symbols: Option<Vec<String>>,
    /// Periodic unit cell.
    unit_cell: Option<UnitCell>,
    /// Bonds between the atoms.
    graph: Option<BondGraph>,
    /// Title of the molecule.
    title: Option<String>,
}

impl Molecule {
    /// Create a new molecule from atomic numbers and positions.
    ///
    /// ## Returns
    /// `Molecule` if successful.
    /// `MoleculeError::SizeMismatch` if the number of positions does not match the number of atomic numbers.
    /// `MoleculeError::NotFinite` if any position is NaN or infinite.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let water = Molecule::new(
    ///     vec![8, 1, 1],
    ///     vec![
    ///         Vector3D::new(0.0, 0.0, 0.0),
    ///         Vector3D::new(0.757, 0.586, 0.0),
    ///         Vector3D::new(-0.757, 0.586, 0.0),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(water.n_atoms(), 3);
    /// ```
    pub fn new(numbers: Vec<u32>, coordinates: Vec<Vector3D>) -> Result<Molecule, MoleculeError> {
        MoleculeBuilder::new(numbers, coordinates).build()
    }

    /// Start a copy of this molecule with some of its properties replaced.
    ///
    /// The returned builder holds deep copies of all properties;
    /// the original molecule and the new one never share any data.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let water = Molecule::new(
    ///     vec![8, 1, 1],
    ///     vec![
    ///         Vector3D::new(0.0, 0.0, 0.0),
    ///         Vector3D::new(0.757, 0.586, 0.0),
    ///         Vector3D::new(-0.757, 0.586, 0.0),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let other = water.copy_with().numbers(vec![3, 4, 5]).build().unwrap();
    /// assert_eq!(water.numbers(), &[8, 1, 1]);
    /// assert_eq!(other.numbers(), &[3, 4, 5]);
    /// assert_eq!(other.coordinates(), water.coordinates());
    ///
    /// // sizes are validated again
    /// assert!(water.copy_with().numbers(vec![8, 1]).build().is_err());
    /// ```
    pub fn copy_with(&self) -> MoleculeBuilder {
        MoleculeBuilder {
            numbers: self.numbers.clone(),
            coordinates: self.coordinates.clone(),
            masses: self.masses.clone(),
            symbols: self.symbols.clone(),
            unit_cell: self.unit_cell.clone(),
            graph: self.graph.clone(),
            title: self.title.clone(),
        }
    }

    /// Number of atoms in the molecule.
    #[inline(always)]
    pub fn n_atoms(&self) -> usize {
        self.numbers.len()
    }

    /// Get the atomic numbers of the atoms.
    #[inline(always)]
    pub fn numbers(&self) -> &[u32] {
        &self.numbers
    }

    /// Get the positions of the atoms.
    #[inline(always)]
    pub fn coordinates(&self) -> &[Vector3D] {
        &self.coordinates
    }

    /// Get the masses of the atoms, if assigned.
    #[inline(always)]
    pub fn masses(&self) -> Option<&[f64]> {
        self.masses.as_deref()
    }

    /// Get the symbols of the atoms, if assigned.
    #[inline(always)]
    pub fn symbols(&self) -> Option<&[String]> {
        self.symbols.as_deref()
    }

    /// Get the unit cell of the molecule, if any.
    #[inline(always)]
    pub fn unit_cell(&self) -> Option<&UnitCell> {
        self.unit_cell.as_ref()
    }

    /// Get the bond graph of the molecule, if assigned.
    #[inline(always)]
    pub fn graph(&self) -> Option<&BondGraph> {
        self.graph.as_ref()
    }

    /// Get the title of the molecule, if any.
    #[inline(always)]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Builder of `Molecule` structures.
///
/// Obtained from [`Molecule::copy_with`] or [`MoleculeBuilder::new`].
/// All per-atom properties are validated against the number of atomic numbers in [`MoleculeBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(deny_unknown_fields))]
pub struct MoleculeBuilder {
    numbers: Vec<u32>,
    coordinates: Vec<Vector3D>,
    #[cfg_attr(feature = "serde", serde(default))]
    masses: Option<Vec<f64>>,
    #[cfg_attr(feature = "serde", serde(default))]
    symbols: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default))]
    unit_cell: Option<UnitCell>,
    #[cfg_attr(feature = "serde", serde(default))]
    graph: Option<BondGraph>,
    #[cfg_attr(feature = "serde", serde(default))]
    title: Option<String>,
}

impl MoleculeBuilder {
    /// Start building a molecule from atomic numbers and positions.
    pub fn new(numbers: Vec<u32>, coordinates: Vec<Vector3D>) -> Self {
        MoleculeBuilder {
            numbers,
            coordinates,
            masses: None,
            symbols: None,
            unit_cell: None,
            graph: None,
            title: None,
        }
    }

    /// Replace atomic numbers.
    pub fn numbers(mut self, numbers: Vec<u32>) -> Self {
        self.numbers = numbers;
        self
    }

    /// Replace positions of the atoms.
    pub fn coordinates(mut self, coordinates: Vec<Vector3D>) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Replace (or remove) masses of the atoms.
    pub fn masses(mut self, masses: Option<Vec<f64>>) -> Self {
        self.masses = masses;
        self
    }

    /// Replace (or remove) symbols of the atoms.
    pub fn symbols(mut self, symbols: Option<Vec<String>>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Replace (or remove) the unit cell.
    pub fn unit_cell(mut self, unit_cell: Option<UnitCell>) -> Self {
        self.unit_cell = unit_cell;
        self
    }

    /// Replace (or remove) the bond graph.
    pub fn graph(mut self, graph: Option<BondGraph>) -> Self {
        self.graph = graph;
        self
    }

    /// Replace (or remove) the title.
    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Validate the properties and construct the molecule.
    ///
    /// ## Returns
    /// `Molecule` if all per-atom properties have the same length as the atomic numbers,
    /// all positions are finite, and all masses are finite and non-negative.
    /// `MoleculeError` otherwise.
    pub fn build(self) -> Result<Molecule, MoleculeError> {
        let n_atoms = self.numbers.len();

        let check = |what: &'static str, len: usize| {
            if len == n_atoms {
                Ok(())
            } else {
                Err(MoleculeError::SizeMismatch(n_atoms, what, len))
            }
        };

        check("positions", self.coordinates.len())?;
        if let Some(masses) = &self.masses {
            check("masses", masses.len())?;
        }
        if let Some(symbols) = &self.symbols {
            check("symbols", symbols.len())?;
        }
        if let Some(graph) = &self.graph {
            check("graph vertices", graph.n_atoms())?;
        }

        if let Some(index) = self
            .coordinates
            .iter()
            .position(|x| x.iter().any(|c| !c.is_finite()))
        {
            return Err(MoleculeError::NotFinite(index));
        }

        if let Some(masses) = &self.masses {
            if let Some((index, &mass)) = masses
                .iter()
                .enumerate()
                .find(|(_, m)| !m.is_finite() || **m < 0.0)
            {
                return Err(MoleculeError::InvalidMass(index, mass));
            }
        }

        Ok(Molecule {
            numbers: self.numbers,
            coordinates: self.coordinates,
            masses: self.masses,
            symbols: self.symbols,
            unit_cell: self.unit_cell,
            graph: self.graph,
            title: self.title,
        })
    }
}

#[cfg(feature = "serde")]
impl TryFrom<MoleculeBuilder> for Molecule {
    type Error = MoleculeError;

    fn try_from(builder: MoleculeBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::utilities::water;
    use nalgebra::Matrix3;

    fn water_molecule() -> Molecule {
        let (numbers, coordinates) = water();
        Molecule::new(numbers, coordinates).unwrap()
    }

    #[test]
    fn new() {
        let molecule = water_molecule();
        assert_eq!(molecule.n_atoms(), 3);
        assert_eq!(molecule.numbers(), &[8, 1, 1]);
        assert!(molecule.masses().is_none());
        assert!(molecule.symbols().is_none());
        assert!(molecule.unit_cell().is_none());
        assert!(molecule.graph().is_none());
        assert!(molecule.title().is_none());
    }

    #[test]
    fn new_size_mismatch() {
        let (_, coordinates) = water();
        match Molecule::new(vec![8, 1], coordinates) {
            Ok(_) => panic!("Function should have failed."),
            Err(MoleculeError::SizeMismatch(2, "positions", 3)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }
    }

    #[test]
    fn new_not_finite() {
        let (numbers, mut coordinates) = water();
        coordinates[1].y = f64::INFINITY;
        match Molecule::new(numbers, coordinates) {
            Ok(_) => panic!("Function should have failed."),
            Err(MoleculeError::NotFinite(1)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }
    }

    #[test]
    fn empty() {
        let molecule = Molecule::new(vec![], vec![]).unwrap();
        assert_eq!(molecule.n_atoms(), 0);
    }

    #[test]
    fn copy_with_numbers() {
        let original = water_molecule();
        let copy = original.copy_with().numbers(vec![3, 4, 5]).build().unwrap();

        assert_eq!(original.numbers(), &[8, 1, 1]);
        assert_eq!(copy.numbers(), &[3, 4, 5]);
        assert_eq!(original.coordinates(), copy.coordinates());

        // independent storage
        assert_ne!(original.numbers().as_ptr(), copy.numbers().as_ptr());
        assert_ne!(original.coordinates().as_ptr(), copy.coordinates().as_ptr());
    }

    #[test]
    fn copy_with_everything() {
        let original = water_molecule();
        let cell = UnitCell::new(Matrix3::from_diagonal_element(10.0), [true; 3]).unwrap();
        let graph = BondGraph::new(3, [(0, 1), (0, 2)]).unwrap();

        let copy = original
            .copy_with()
            .masses(Some(vec![15.999, 1.008, 1.008]))
            .symbols(Some(vec!["O".to_owned(), "H".to_owned(), "H".to_owned()]))
            .unit_cell(Some(cell.clone()))
            .graph(Some(graph.clone()))
            .title(Some("water".to_owned()))
            .build()
            .unwrap();

        assert_eq!(copy.masses().unwrap(), &[15.999, 1.008, 1.008]);
        assert_eq!(copy.symbols().unwrap()[0], "O");
        assert_eq!(copy.unit_cell(), Some(&cell));
        assert_eq!(copy.graph(), Some(&graph));
        assert_eq!(copy.title(), Some("water"));

        // remove properties again
        let stripped = copy
            .copy_with()
            .masses(None)
            .unit_cell(None)
            .title(None)
            .build()
            .unwrap();
        assert!(stripped.masses().is_none());
        assert!(stripped.unit_cell().is_none());
        assert!(stripped.title().is_none());
        assert!(stripped.graph().is_some());

        assert!(original.masses().is_none());
    }

    #[test]
    fn copy_with_size_mismatch() {
        let original = water_molecule();

        for (builder, expected) in [
            (original.copy_with().numbers(vec![1, 1]), "positions"),
            (original.copy_with().masses(Some(vec![1.0])), "masses"),
            (original.copy_with().symbols(Some(vec![])), "symbols"),
            (
                original
                    .copy_with()
                    .graph(Some(BondGraph::new(4, [(0, 3)]).unwrap())),
                "graph vertices",
            ),
        ] {
            match builder.build() {
                Ok(_) => panic!("Function should have failed."),
                Err(MoleculeError::SizeMismatch(_, what, _)) => assert_eq!(what, expected),
                Err(e) => panic!(
                    "Function failed successfully but incorrect error type `{:?}` was returned.",
                    e
                ),
            }
        }
    }

    #[test]
    fn copy_with_invalid_mass() {
        let original = water_molecule();
        match original
            .copy_with()
            .masses(Some(vec![16.0, -1.0, 1.0]))
            .build()
        {
            Ok(_) => panic!("Function should have failed."),
            Err(MoleculeError::InvalidMass(1, _)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }
    }
}
