// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of the matrix of pairwise interatomic distances.

use nalgebra::Matrix3xX;
use ndarray::Array2;

use crate::structures::{unit_cell::UnitCell, vector3d::Vector3D};

/// Symmetric matrix of distances between all pairs of atoms (in Å).
///
/// The diagonal is exactly zero. If the distances were calculated with a periodic unit cell,
/// each entry is the length of the shortest periodic image of the displacement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix(Array2<f64>);

impl DistanceMatrix {
    /// Calculate distances between all pairs of positions.
    ///
    /// ## Parameters
    /// - `coordinates`: positions of the atoms
    /// - `unit_cell`: if provided, the minimum-image convention is applied along its periodic directions
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// # use nalgebra::Matrix3;
    /// #
    /// let coordinates = [Vector3D::new(0.5, 0.0, 0.0), Vector3D::new(9.5, 0.0, 0.0)];
    ///
    /// let plain = DistanceMatrix::from_coordinates(&coordinates, None);
    /// assert!((plain.get(0, 1) - 9.0).abs() < 1e-12);
    ///
    /// let cell = UnitCell::new(Matrix3::from_diagonal_element(10.0), [true; 3]).unwrap();
    /// let periodic = DistanceMatrix::from_coordinates(&coordinates, Some(&cell));
    /// assert!((periodic.get(1, 0) - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_coordinates(coordinates: &[Vector3D], unit_cell: Option<&UnitCell>) -> Self {
        let n_atoms = coordinates.len();
        let mut matrix = Array2::zeros((n_atoms, n_atoms));

        for i in 0..n_atoms {
            let row = calc_row(coordinates, unit_cell, i);
            for (k, distance) in row.into_iter().enumerate() {
                let j = i + 1 + k;
                matrix[(i, j)] = distance;
                matrix[(j, i)] = distance;
            }
        }

        DistanceMatrix(matrix)
    }

    /// Calculate distances between all pairs of positions using multiple threads.
    ///
    /// Works the same as [`DistanceMatrix::from_coordinates`] and returns the same matrix.
    /// Rows of the upper triangle are distributed between `n_threads` threads in an interleaved
    /// manner so that each thread receives a similar amount of work.
    ///
    /// ## Notes
    /// - If `n_threads` is zero, one thread is used.
    /// - If the number of threads is higher than the number of atoms, only `n_atoms` threads are used.
    #[cfg(feature = "parallel")]
    pub fn from_coordinates_parallel(
        coordinates: &[Vector3D],
        unit_cell: Option<&UnitCell>,
        n_threads: usize,
    ) -> Self {
        let n_atoms = coordinates.len();
        let n_threads = n_threads.clamp(1, n_atoms.max(1));
        let mut matrix = Array2::zeros((n_atoms, n_atoms));

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..n_threads)
                .map(|thread| {
                    s.spawn(move || -> Vec<(usize, Vec<f64>)> {
                        (thread..n_atoms)
                            .step_by(n_threads)
                            .map(|i| (i, calc_row(coordinates, unit_cell, i)))
                            .collect()
                    })
                })
                .collect();

            for handle in handles {
                let rows = handle.join().expect(
                    "FATAL MOLGEOM ERROR | DistanceMatrix::from_coordinates_parallel | Could not join handle.",
                );

                for (i, row) in rows {
                    for (k, distance) in row.into_iter().enumerate() {
                        let j = i + 1 + k;
                        matrix[(i, j)] = distance;
                        matrix[(j, i)] = distance;
                    }
                }
            }
        });

        DistanceMatrix(matrix)
    }

    /// Get distance between atoms with indices `i` and `j`.
    ///
    /// ## Panics
    /// Panics if either index is out of range.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.0[(i, j)]
    }

    /// Number of atoms described by the matrix.
    #[inline(always)]
    pub fn n_atoms(&self) -> usize {
        self.0.nrows()
    }

    /// Get the underlying `ndarray` array.
    #[inline(always)]
    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }

    /// Consume the structure and return the underlying `ndarray` array.
    #[inline(always)]
    pub fn into_array(self) -> Array2<f64> {
        self.0
    }
}

/// Calculate distances between atom `i` and all atoms with higher indices.
fn calc_row(coordinates: &[Vector3D], unit_cell: Option<&UnitCell>, i: usize) -> Vec<f64> {
    let origin = coordinates[i].0;
    let others = &coordinates[i + 1..];

    let deltas = Matrix3xX::from_fn(others.len(), |r, c| others[c].0[r] - origin[r]);

    match unit_cell {
        Some(cell) if cell.is_periodic() => {
            let fractional = cell.reduced_reciprocal().tr_mul(&deltas);
            deltas
                .column_iter()
                .zip(fractional.column_iter())
                .map(|(delta, frac)| {
                    cell.shortest_from_fractional(delta.into_owned(), &frac.into_owned())
                        .norm()
                })
                .collect()
        }
        _ => deltas.column_iter().map(|delta| delta.norm()).collect(),
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
