// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of the chemical formula of molecules.

use indexmap::IndexMap;

use crate::{molecule::Molecule, structures::element::Elements};

impl Molecule {
    /// Get the chemical formula of the molecule.
    ///
    /// Elements are listed in the order of their first appearance in the molecule.
    /// The number of atoms is written after the symbol if it is larger than one.
    /// Atoms with symbols assigned to the molecule use those symbols,
    /// other atoms are looked up in `elements` and atoms missing from the table are written as `X`.
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
    /// assert_eq!(water.chemical_formula(&Elements::default()), "OH2");
    /// ```
    pub fn chemical_formula(&self, elements: &Elements) -> String {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();

        for (index, &number) in self.numbers().iter().enumerate() {
            let symbol = self
                .symbols()
                .map(|symbols| symbols[index].as_str())
                .or_else(|| elements.symbol_of(number))
                .unwrap_or("X");

            *counts.entry(symbol).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(symbol, count)| match count {
                1 => symbol.to_owned(),
                n => format!("{}{}", symbol, n),
            })
            .collect()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
