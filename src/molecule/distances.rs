// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of distance calculations for molecules.

use crate::{
    molecule::Molecule,
    structures::{distance_matrix::DistanceMatrix, vector3d::Vector3D},
};

impl Molecule {
    /// Calculate the matrix of distances between all pairs of atoms.
    ///
    /// If the molecule has a unit cell, the minimum-image convention is applied
    /// along its periodic directions.
    #[inline]
    pub fn distance_matrix(&self) -> DistanceMatrix {
        DistanceMatrix::from_coordinates(self.coordinates(), self.unit_cell())
    }

    /// Calculate the matrix of distances between all pairs of atoms using multiple threads.
    /// See [`DistanceMatrix::from_coordinates_parallel`] for more information.
    #[cfg(feature = "parallel")]
    #[inline]
    pub fn distance_matrix_parallel(&self, n_threads: usize) -> DistanceMatrix {
        DistanceMatrix::from_coordinates_parallel(self.coordinates(), self.unit_cell(), n_threads)
    }

    /// Get the shortest vector pointing from atom `i` to atom `j`,
    /// taking the unit cell of the molecule into account.
    ///
    /// Returns `None` if either atom does not exist.
    pub fn shortest_vector(&self, i: usize, j: usize) -> Option<Vector3D> {
        let start = self.coordinates().get(i)?;
        let end = self.coordinates().get(j)?;

        let delta = start.vector_to(end);
        Some(match self.unit_cell() {
            Some(cell) => cell.shortest_vector(&delta),
            None => delta,
        })
    }

    /// Get the distance between atoms `i` and `j`,
    /// taking the unit cell of the molecule into account.
    ///
    /// Returns `None` if either atom does not exist.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> Option<f64> {
        self.shortest_vector(i, j).map(|x| x.len())
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
