// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of methods assigning default properties to molecules.

use crate::{
    errors::{BondError, MassError},
    molecule::Molecule,
    structures::{bond_graph::BondGraph, element::Elements},
};

/// Symbol assigned to atoms which are not present in the element table.
const UNKNOWN_SYMBOL: &str = "X";

impl Molecule {
    /// Guess bonds between atoms based on the distances between them,
    /// their covalent radii and the provided `tolerance`.
    /// If `tolerance` is not provided, the default value of 1.2 is used.
    ///
    /// The unit cell of the molecule (if any) is taken into account.
    ///
    /// ## Returns
    /// `BondGraph` if successful.
    /// `BondError::MissingRadius` if any non-probe atom has no covalent radius in `elements`.
    pub fn guess_bonds(
        &self,
        elements: &Elements,
        tolerance: Option<f64>,
    ) -> Result<BondGraph, BondError> {
        BondGraph::infer(
            self.coordinates(),
            self.numbers(),
            self.unit_cell(),
            elements,
            tolerance,
        )
    }

    /// Guess bonds between atoms using multiple threads.
    /// See [`Molecule::guess_bonds`] for more information.
    #[cfg(feature = "parallel")]
    pub fn guess_bonds_parallel(
        &self,
        elements: &Elements,
        tolerance: Option<f64>,
        n_threads: usize,
    ) -> Result<BondGraph, BondError> {
        BondGraph::infer_parallel(
            self.coordinates(),
            self.numbers(),
            self.unit_cell(),
            elements,
            tolerance,
            n_threads,
        )
    }

    /// Return a copy of the molecule with bonds guessed using the default tolerance.
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
    /// .unwrap()
    /// .with_default_graph(&Elements::default())
    /// .unwrap();
    ///
    /// assert_eq!(water.graph().unwrap().n_edges(), 2);
    /// ```
    pub fn with_default_graph(&self, elements: &Elements) -> Result<Molecule, BondError> {
        let graph = self.guess_bonds(elements, None)?;

        Ok(self
            .copy_with()
            .graph(Some(graph))
            .build()
            .expect("FATAL MOLGEOM ERROR | Molecule::with_default_graph | Graph should match the molecule."))
    }

    /// Return a copy of the molecule with masses of the atoms taken from the element table.
    ///
    /// ## Returns
    /// `Molecule` with assigned masses if successful.
    /// `MassError::MissingMass` if any non-probe atom has no mass in `elements`.
    ///
    /// ## Notes
    /// - Probes (atomic number 0) are assigned zero mass.
    pub fn with_default_masses(&self, elements: &Elements) -> Result<Molecule, MassError> {
        let masses = self
            .numbers()
            .iter()
            .map(|&number| match number {
                0 => Ok(0.0),
                n => elements.mass_of(n).ok_or(MassError::MissingMass(n)),
            })
            .collect::<Result<Vec<f64>, MassError>>()?;

        Ok(self
            .copy_with()
            .masses(Some(masses))
            .build()
            .expect("FATAL MOLGEOM ERROR | Molecule::with_default_masses | Masses should match the molecule."))
    }

    /// Return a copy of the molecule with symbols of the atoms taken from the element table.
    ///
    /// Atoms that are not in the table (including probes) are assigned the symbol `X`.
    pub fn with_default_symbols(&self, elements: &Elements) -> Molecule {
        let symbols = self
            .numbers()
            .iter()
            .map(|&number| {
                elements
                    .symbol_of(number)
                    .unwrap_or(UNKNOWN_SYMBOL)
                    .to_owned()
            })
            .collect();

        self.copy_with()
            .symbols(Some(symbols))
            .build()
            .expect("FATAL MOLGEOM ERROR | Molecule::with_default_symbols | Symbols should match the molecule.")
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
