// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of frame normalization, bounding boxes and grids surrounding molecules.

use getset::CopyGetters;
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{errors::MoleculeError, molecule::Molecule, structures::vector3d::Vector3D};

/// Regular orthogonal grid of points.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Grid {
    /// Position of the first grid point.
    origin: Vector3D,
    /// Number of grid points along each axis.
    counts: [usize; 3],
    /// Displacement between neighboring grid points along each axis.
    steps: [Vector3D; 3],
}

impl Grid {
    /// Total number of points in the grid.
    #[inline(always)]
    pub fn n_points(&self) -> usize {
        self.counts.iter().product()
    }

    /// Get position of the grid point with indices `i`, `j`, `k`.
    /// Returns `None` if any index is out of range.
    pub fn point(&self, i: usize, j: usize, k: usize) -> Option<Vector3D> {
        if i >= self.counts[0] || j >= self.counts[1] || k >= self.counts[2] {
            return None;
        }

        Some(
            self.origin
                + self.steps[0] * i as f64
                + self.steps[1] * j as f64
                + self.steps[2] * k as f64,
        )
    }

    /// Iterate over all points of the grid. The last index changes the fastest.
    pub fn points(&self) -> impl Iterator<Item = Vector3D> + '_ {
        let [ni, nj, nk] = self.counts;
        (0..ni).flat_map(move |i| {
            (0..nj).flat_map(move |j| {
                (0..nk).map(move |k| {
                    self.origin
                        + self.steps[0] * i as f64
                        + self.steps[1] * j as f64
                        + self.steps[2] * k as f64
                })
            })
        })
    }
}

impl Molecule {
    /// Create a copy of the molecule in a normalized frame.
    ///
    /// The molecule is translated so that the first atom lies at the origin
    /// and rotated so that the second atom lies on the positive x-axis
    /// and the third atom lies in the xy-plane with positive y.
    /// The unit cell (if any) is rotated together with the atoms.
    ///
    /// ## Returns
    /// Normalized `Molecule` if successful.
    /// `MoleculeError::TooFewAtoms` if the molecule has fewer than three atoms.
    /// `MoleculeError::Colinear` if the first three atoms are colinear.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let molecule = Molecule::new(
    ///     vec![8, 1, 1],
    ///     vec![
    ///         Vector3D::new(1.0, 1.0, 1.0),
    ///         Vector3D::new(1.0, 2.0, 1.0),
    ///         Vector3D::new(1.0, 1.0, 3.0),
    ///     ],
    /// )
    /// .unwrap()
    /// .normalized()
    /// .unwrap();
    ///
    /// let second = molecule.coordinates()[1];
    /// assert!((second.x - 1.0).abs() < 1e-12);
    /// assert!(second.y.abs() < 1e-12 && second.z.abs() < 1e-12);
    /// ```
    pub fn normalized(&self) -> Result<Molecule, MoleculeError> {
        if self.n_atoms() < 3 {
            return Err(MoleculeError::TooFewAtoms(3, self.n_atoms()));
        }

        let origin = self.coordinates()[0].0;
        let second = self.coordinates()[1].0 - origin;
        let third = self.coordinates()[2].0 - origin;

        let normal = second.cross(&third);
        if second.norm() == 0.0 || normal.norm() <= f64::EPSILON * second.norm() * third.norm() {
            return Err(MoleculeError::Colinear);
        }

        let new_x = second.normalize();
        let new_z = normal.normalize();
        let new_y = new_z.cross(&new_x);

        // rows of the rotation are the new axes
        let rotation = Matrix3::from_rows(&[new_x.transpose(), new_y.transpose(), new_z.transpose()]);

        let coordinates = self
            .coordinates()
            .iter()
            .map(|x| Vector3D(rotation * (x.0 - origin)))
            .collect();

        let unit_cell = self
            .unit_cell()
            .map(|cell| cell.rotated(&Rotation3::from_matrix_unchecked(rotation)));

        Ok(self
            .copy_with()
            .coordinates(coordinates)
            .unit_cell(unit_cell)
            .build()
            .expect("FATAL MOLGEOM ERROR | Molecule::normalized | Normalized molecule should be valid."))
    }

    /// Calculate the axis-aligned bounding box of the molecule enlarged by `margin` on every side.
    ///
    /// ## Returns
    /// Lower and upper corner of the box.
    /// `MoleculeError::TooFewAtoms` if the molecule contains no atoms.
    pub fn bounding_box(&self, margin: f64) -> Result<(Vector3D, Vector3D), MoleculeError> {
        if self.n_atoms() == 0 {
            return Err(MoleculeError::TooFewAtoms(1, 0));
        }

        let (low, high) = self.coordinates().iter().fold(
            (
                Vector3::repeat(f64::INFINITY),
                Vector3::repeat(f64::NEG_INFINITY),
            ),
            |(low, high), x| (low.inf(&x.0), high.sup(&x.0)),
        );

        let margin = Vector3::repeat(margin);
        Ok((Vector3D(low - margin), Vector3D(high + margin)))
    }

    /// Construct a grid with spacing `spacing` covering the bounding box of the molecule
    /// enlarged by `margin`. The grid is centered in the box and its outermost points
    /// are at most `spacing / 2` away from the faces of the box.
    ///
    /// `Grid::counts` are numbers of grid points, not numbers of intervals between them:
    /// along an axis where the box has size `size`, the grid contains `floor(size / spacing)`
    /// intervals and therefore `floor(size / spacing) + 1` points.
    ///
    /// ## Returns
    /// `Grid` if successful.
    /// `MoleculeError::InvalidSpacing` if `spacing` is not positive.
    /// `MoleculeError::TooFewAtoms` if the molecule contains no atoms.
    pub fn surrounding_grid(&self, margin: f64, spacing: f64) -> Result<Grid, MoleculeError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(MoleculeError::InvalidSpacing(spacing));
        }

        let (low, high) = self.bounding_box(margin)?;
        let size = (high.0 - low.0).map(|x| x.max(0.0));

        let intervals = size.map(|x| (x / spacing).floor());
        let correction = (size - intervals * spacing) * 0.5;
        let counts = intervals.map(|n| n as usize + 1);

        Ok(Grid {
            origin: Vector3D(low.0 + correction),
            counts: [counts.x, counts.y, counts.z],
            steps: [
                Vector3D::new(spacing, 0.0, 0.0),
                Vector3D::new(0.0, spacing, 0.0),
                Vector3D::new(0.0, 0.0, spacing),
            ],
        })
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
