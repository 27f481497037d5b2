// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of the UnitCell structure and its methods.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{errors::UnitCellError, structures::vector3d::Vector3D};

/// Relative threshold below which a singular value of the periodic lattice is considered zero.
const RANK_TOLERANCE: f64 = 1e-8;

/// Upper bound on the number of passes of the lattice basis reduction.
const MAX_REDUCTION_PASSES: usize = 256;

/// Relative decrease of the squared length required to accept a reduction step.
const REDUCTION_EPSILON: f64 = 1e-12;

/// Periodic (or partially periodic) unit cell.
///
/// The columns of `matrix` are the lattice vectors `a`, `b`, and `c` (in Å).
/// Only the directions flagged in `active` are periodic.
/// The reciprocal matrix is calculated once on construction: its columns are
/// the reciprocal vectors of the periodic directions and zero vectors for
/// non-periodic directions.
///
/// On construction, the periodic lattice vectors are also reduced to a short and nearly
/// orthogonal basis of the same lattice. Minimum-image searches are performed in this
/// reduced basis, so their cost does not depend on how strongly sheared the cell is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "raw::RawUnitCell", into = "raw::RawUnitCell")
)]
pub struct UnitCell {
    matrix: Matrix3<f64>,
    active: [bool; 3],
    reciprocal: Matrix3<f64>,
    reduced: Matrix3<f64>,
    reduced_reciprocal: Matrix3<f64>,
}

impl Default for UnitCell {
    /// Fully aperiodic unit cell.
    fn default() -> Self {
        UnitCell::aperiodic()
    }
}

impl UnitCell {
    /// Construct a new unit cell from lattice vectors (columns of `matrix`)
    /// and periodicity flags.
    ///
    /// ## Returns
    /// `UnitCell` if successful.
    /// `UnitCellError::NotFinite` if the matrix contains NaN or infinite values.
    /// `UnitCellError::Degenerate` if the periodic lattice vectors are linearly dependent.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// # use nalgebra::Matrix3;
    /// #
    /// // slab periodic in x and y
    /// let cell = UnitCell::new(Matrix3::from_diagonal_element(10.0), [true, true, false]).unwrap();
    /// assert_eq!(cell.n_periodic(), 2);
    ///
    /// // the wrapped displacement is never longer than half of the box in x and y
    /// let shortest = cell.shortest_vector(&Vector3D::new(9.0, -6.0, 25.0));
    /// assert!((shortest.x + 1.0).abs() < 1e-12);
    /// assert!((shortest.y - 4.0).abs() < 1e-12);
    /// assert!((shortest.z - 25.0).abs() < 1e-12);
    /// ```
    pub fn new(matrix: Matrix3<f64>, active: [bool; 3]) -> Result<UnitCell, UnitCellError> {
        if matrix.iter().any(|x| !x.is_finite()) {
            return Err(UnitCellError::NotFinite);
        }

        let reciprocal = Self::calc_reciprocal(&matrix, &active)?;
        let reduced = reduce_basis(&matrix, &active);
        let reduced_reciprocal = Self::calc_reciprocal(&reduced, &active)?;

        Ok(UnitCell {
            matrix,
            active,
            reciprocal,
            reduced,
            reduced_reciprocal,
        })
    }

    /// Construct a unit cell with no periodic direction.
    /// All displacements are left unchanged by such cell.
    pub fn aperiodic() -> UnitCell {
        UnitCell {
            matrix: Matrix3::identity(),
            active: [false; 3],
            reciprocal: Matrix3::zeros(),
            reduced: Matrix3::zeros(),
            reduced_reciprocal: Matrix3::zeros(),
        }
    }

    /// Construct a unit cell from the lengths of the lattice vectors (in Å)
    /// and the angles between them (`alpha`, `beta`, `gamma`; in degrees).
    ///
    /// Vector `a` is placed along the x-axis and vector `b` in the xy-plane.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let cell = UnitCell::from_parameters([5.0, 4.0, 3.0], [80.0, 70.0, 120.0], [true; 3]).unwrap();
    /// let (lengths, angles) = cell.parameters();
    ///
    /// assert!((lengths[1] - 4.0).abs() < 1e-10);
    /// assert!((angles[2] - 120.0).abs() < 1e-10);
    /// ```
    ///
    /// ## Notes
    /// - Uses the same construction as Tsjerk Wassenaar's `triclinic` function:
    ///   <https://www.mail-archive.com/gmx-users@gromacs.org/msg28032.html>
    pub fn from_parameters(
        lengths: [f64; 3],
        angles: [f64; 3],
        active: [bool; 3],
    ) -> Result<UnitCell, UnitCellError> {
        let invalid = || UnitCellError::InvalidParameters(lengths, angles);

        if lengths.iter().any(|&l| !l.is_finite() || l <= 0.0)
            || angles
                .iter()
                .any(|&a| !a.is_finite() || a <= 0.0 || a >= 180.0)
        {
            return Err(invalid());
        }

        let [alpha, beta, gamma] = angles.map(f64::to_radians);

        let a = Vector3::new(lengths[0], 0.0, 0.0);
        let b = Vector3::new(lengths[1] * gamma.cos(), lengths[1] * gamma.sin(), 0.0);

        let c_x = lengths[2] * beta.cos();
        let c_y = lengths[2] * (alpha.cos() - beta.cos() * gamma.cos()) / gamma.sin();
        let c_z2 = lengths[2] * lengths[2] - c_x * c_x - c_y * c_y;
        if c_z2 <= 0.0 {
            return Err(invalid());
        }
        let c = Vector3::new(c_x, c_y, c_z2.sqrt());

        UnitCell::new(Matrix3::from_columns(&[a, b, c]), active)
    }

    /// Pseudo-inverse-transpose of the lattice restricted to the periodic directions.
    fn calc_reciprocal(
        matrix: &Matrix3<f64>,
        active: &[bool; 3],
    ) -> Result<Matrix3<f64>, UnitCellError> {
        let n_active = active.iter().filter(|&&x| x).count();
        if n_active == 0 {
            return Ok(Matrix3::zeros());
        }

        let mut masked = *matrix;
        for (i, &periodic) in active.iter().enumerate() {
            if !periodic {
                masked.set_column(i, &Vector3::zeros());
            }
        }

        let singular = masked.singular_values();
        let max = singular.max();
        let rank = singular
            .iter()
            .filter(|&&s| s > max * RANK_TOLERANCE && s > 0.0)
            .count();
        if rank < n_active {
            return Err(UnitCellError::Degenerate(rank, n_active));
        }

        // Gram matrix of the periodic vectors padded with ones for the non-periodic directions
        let mut gram = masked.transpose() * masked;
        for (i, &periodic) in active.iter().enumerate() {
            if !periodic {
                gram[(i, i)] = 1.0;
            }
        }

        let inverse = gram
            .try_inverse()
            .ok_or(UnitCellError::Degenerate(rank.saturating_sub(1), n_active))?;

        // rows of the pseudo-inverse are the reciprocal vectors
        Ok((inverse * masked.transpose()).transpose())
    }

    /// Get the lattice vectors as columns of a matrix.
    #[inline(always)]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Get the reciprocal vectors as columns of a matrix.
    /// Columns of non-periodic directions are zero.
    #[inline(always)]
    pub fn reciprocal(&self) -> &Matrix3<f64> {
        &self.reciprocal
    }

    /// Get the reduced basis of the periodic lattice as columns of a matrix.
    ///
    /// The reduced vectors generate the same lattice as the periodic lattice vectors,
    /// occupy the columns of the periodic directions (shortest first) and are zero
    /// for non-periodic directions.
    #[inline(always)]
    pub fn reduced_matrix(&self) -> &Matrix3<f64> {
        &self.reduced
    }

    /// Get the reciprocal vectors of the reduced basis as columns of a matrix.
    #[inline(always)]
    pub(crate) fn reduced_reciprocal(&self) -> &Matrix3<f64> {
        &self.reduced_reciprocal
    }

    /// Get the periodicity flags.
    #[inline(always)]
    pub fn active(&self) -> [bool; 3] {
        self.active
    }

    /// Number of periodic directions.
    #[inline]
    pub fn n_periodic(&self) -> usize {
        self.active.iter().filter(|&&x| x).count()
    }

    /// Returns `true` if at least one direction is periodic.
    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.active.iter().any(|&x| x)
    }

    /// Get lattice vector with index `index` (0 = a, 1 = b, 2 = c).
    ///
    /// ## Panics
    /// Panics if `index` is larger than 2.
    #[inline]
    pub fn lattice_vector(&self, index: usize) -> Vector3D {
        Vector3D(self.matrix.column(index).into_owned())
    }

    /// Convert fractional coordinates into cartesian coordinates.
    #[inline]
    pub fn to_cartesian(&self, fractional: &Vector3D) -> Vector3D {
        Vector3D(self.matrix * fractional.0)
    }

    /// Convert cartesian coordinates into fractional coordinates.
    /// Fractional components along non-periodic directions are zero.
    #[inline]
    pub fn to_fractional(&self, cartesian: &Vector3D) -> Vector3D {
        Vector3D(self.reciprocal.tr_mul(&cartesian.0))
    }

    /// Volume spanned by the periodic lattice vectors.
    ///
    /// For three periodic directions this is the volume of the cell,
    /// for two it is the area of the periodic face and for one the length of the periodic vector.
    /// Aperiodic cell has zero volume.
    pub fn volume(&self) -> f64 {
        match self.n_periodic() {
            0 => 0.0,
            3 => self.matrix.determinant().abs(),
            _ => {
                let mut gram = Matrix3::<f64>::identity();
                for i in 0..3 {
                    for j in 0..3 {
                        if self.active[i] && self.active[j] {
                            gram[(i, j)] = self.matrix.column(i).dot(&self.matrix.column(j));
                        }
                    }
                }
                gram.determinant().abs().sqrt()
            }
        }
    }

    /// Distances between neighboring lattice planes along each direction.
    /// Non-periodic directions are `None`.
    pub fn spacings(&self) -> [Option<f64>; 3] {
        std::array::from_fn(|i| {
            if self.active[i] {
                Some(1.0 / self.reciprocal.column(i).norm())
            } else {
                None
            }
        })
    }

    /// Lengths of the lattice vectors (in Å) and the angles `alpha`, `beta`, `gamma` (in degrees).
    pub fn parameters(&self) -> ([f64; 3], [f64; 3]) {
        let a = self.lattice_vector(0);
        let b = self.lattice_vector(1);
        let c = self.lattice_vector(2);

        (
            [a.len(), b.len(), c.len()],
            [
                b.angle(&c).to_degrees(),
                a.angle(&c).to_degrees(),
                a.angle(&b).to_degrees(),
            ],
        )
    }

    /// Number of periodic images needed along each direction to cover a sphere with the given radius.
    /// Zero for non-periodic directions.
    pub fn image_ranges(&self, radius: f64) -> [usize; 3] {
        std::array::from_fn(|i| {
            if self.active[i] {
                (radius * self.reciprocal.column(i).norm()).ceil() as usize
            } else {
                0
            }
        })
    }

    /// Wrap a position into the unit cell.
    /// Fractional components along periodic directions end up in the interval [0, 1).
    pub fn wrap(&self, position: &Vector3D) -> Vector3D {
        let fractional = self.to_fractional(position);
        let shift = Vector3::from_fn(|i, _| {
            if self.active[i] {
                fractional[i].floor()
            } else {
                0.0
            }
        });

        Vector3D(position.0 - self.matrix * shift)
    }

    /// Return the shortest periodic image of the displacement `delta` (minimum-image convention).
    ///
    /// Non-periodic directions are never wrapped. For an aperiodic cell, `delta` is returned unchanged.
    ///
    /// ## Notes
    /// - All calculations use the reduced basis of the lattice (see [`UnitCell::reduced_matrix`]).
    /// - The fractional components along the periodic directions are first rounded to
    ///   the nearest integer. If the resulting vector is shorter than half of the smallest
    ///   plane spacing, it is guaranteed to be the shortest image.
    /// - Otherwise, all lattice translations `n` with `|n_i| <= 2 |delta'| |b_i|` are
    ///   examined, where `b_i` is the reciprocal vector of the reduced basis.
    ///   No shorter image can exist outside this range, so the result is exact.
    ///   For a reduced basis, the range is at most a few translations along each direction.
    pub fn shortest_vector(&self, delta: &Vector3D) -> Vector3D {
        if !self.is_periodic() {
            return *delta;
        }

        let fractional = self.reduced_reciprocal.tr_mul(&delta.0);
        Vector3D(self.shortest_from_fractional(delta.0, &fractional))
    }

    /// Minimum image of `delta` whose fractional coordinates
    /// with respect to the reduced basis have already been computed.
    #[inline]
    pub(crate) fn shortest_from_fractional(
        &self,
        delta: Vector3<f64>,
        fractional: &Vector3<f64>,
    ) -> Vector3<f64> {
        let rounded = fractional.map(|x| x.round());
        let reduced = delta - self.reduced * rounded;

        let length = reduced.norm();
        if length <= 0.5 * self.min_spacing() {
            return reduced;
        }

        self.search_images(reduced, length)
    }

    /// Smallest plane spacing of the reduced basis.
    #[inline]
    fn min_spacing(&self) -> f64 {
        (0..3)
            .filter(|&i| self.active[i])
            .map(|i| 1.0 / self.reduced_reciprocal.column(i).norm())
            .fold(f64::INFINITY, f64::min)
    }

    /// Exhaustive search over the translations of the reduced basis that may yield a shorter image.
    fn search_images(&self, reduced: Vector3<f64>, length: f64) -> Vector3<f64> {
        let ranges: [i64; 3] = std::array::from_fn(|i| {
            if self.active[i] {
                (2.0 * length * self.reduced_reciprocal.column(i).norm()).floor() as i64
            } else {
                0
            }
        });

        let mut best = reduced;
        let mut best_norm2 = reduced.norm_squared();

        for n0 in -ranges[0]..=ranges[0] {
            for n1 in -ranges[1]..=ranges[1] {
                for n2 in -ranges[2]..=ranges[2] {
                    if n0 == 0 && n1 == 0 && n2 == 0 {
                        continue;
                    }

                    let candidate =
                        reduced - self.reduced * Vector3::new(n0 as f64, n1 as f64, n2 as f64);
                    let norm2 = candidate.norm_squared();
                    if norm2 < best_norm2 {
                        best = candidate;
                        best_norm2 = norm2;
                    }
                }
            }
        }

        best
    }

    /// Apply a linear transformation (typically a rotation) to the lattice vectors.
    ///
    /// ## Example
    /// Bring a monoclinic cell into an orientation where `c` lies along the z-axis.
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let cell = UnitCell::from_parameters([14.587, 12.877, 7.613], [90.0, 111.159, 90.0], [true; 3]).unwrap();
    /// let aligned = cell.transformed(&cell.alignment_c().unwrap()).unwrap();
    ///
    /// let c = aligned.lattice_vector(2);
    /// assert!(c.x.abs() < 1e-10 && c.y.abs() < 1e-10);
    /// ```
    pub fn transformed(&self, transformation: &Matrix3<f64>) -> Result<UnitCell, UnitCellError> {
        UnitCell::new(transformation * self.matrix, self.active)
    }

    /// Rotate the unit cell. The reciprocal vectors and the reduced basis are rotated along with the lattice.
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> UnitCell {
        UnitCell {
            matrix: rotation * self.matrix,
            active: self.active,
            reciprocal: rotation * self.reciprocal,
            reduced: rotation * self.reduced,
            reduced_reciprocal: rotation * self.reduced_reciprocal,
        }
    }

    /// Rotation matrix that brings vector `a` onto the positive x-axis
    /// and vector `b` into the xy-plane (with positive y component).
    pub fn alignment_a(&self) -> Result<Matrix3<f64>, UnitCellError> {
        let a = self.matrix.column(0).into_owned();
        let b = self.matrix.column(1).into_owned();

        let z = a.cross(&b);
        if z.norm() == 0.0 || a.norm() == 0.0 {
            return Err(UnitCellError::NotAlignable('a', 'b'));
        }

        let x = a.normalize();
        let z = z.normalize();
        let y = z.cross(&x);

        Ok(Matrix3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
    }

    /// Rotation matrix that brings vector `c` onto the positive z-axis
    /// and vector `b` into the yz-plane (with positive y component).
    pub fn alignment_c(&self) -> Result<Matrix3<f64>, UnitCellError> {
        let b = self.matrix.column(1).into_owned();
        let c = self.matrix.column(2).into_owned();

        let x = b.cross(&c);
        if x.norm() == 0.0 || c.norm() == 0.0 {
            return Err(UnitCellError::NotAlignable('b', 'c'));
        }

        let z = c.normalize();
        let x = x.normalize();
        let y = z.cross(&x);

        Ok(Matrix3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
    }
}

/// Reduce the periodic lattice vectors to a short, nearly orthogonal basis of the same lattice.
///
/// Each vector is repeatedly shortened by subtracting the nearest integer multiple of the other
/// vectors and, for three periodic directions, by adding or subtracting sums and differences of
/// the other two vectors. Only unimodular steps are applied, so the lattice is unchanged.
/// The reduced vectors are placed into the columns of the periodic directions, shortest first.
/// Columns of the non-periodic directions are zero.
///
/// The periodic lattice vectors must be linearly independent.
fn reduce_basis(matrix: &Matrix3<f64>, active: &[bool; 3]) -> Matrix3<f64> {
    let slots: Vec<usize> = (0..3).filter(|&i| active[i]).collect();
    let mut basis: Vec<Vector3<f64>> = slots
        .iter()
        .map(|&i| matrix.column(i).into_owned())
        .collect();

    for _ in 0..MAX_REDUCTION_PASSES {
        basis.sort_by(|x, y| x.norm_squared().total_cmp(&y.norm_squared()));
        let mut changed = false;

        for i in 0..basis.len() {
            for j in 0..basis.len() {
                if i == j {
                    continue;
                }

                let factor = (basis[i].dot(&basis[j]) / basis[j].norm_squared()).round();
                if factor != 0.0 {
                    let shift = basis[j] * factor;
                    changed |= shorten(&mut basis, i, shift);
                }
            }
        }

        if basis.len() == 3 {
            for i in 0..3 {
                let (j, k) = ((i + 1) % 3, (i + 2) % 3);
                for sign in [1.0, -1.0] {
                    let shift = basis[j] + basis[k] * sign;
                    changed |= shorten(&mut basis, i, shift);
                    changed |= shorten(&mut basis, i, -shift);
                }
            }
        }

        if !changed {
            break;
        }
    }

    basis.sort_by(|x, y| x.norm_squared().total_cmp(&y.norm_squared()));

    let mut reduced = Matrix3::zeros();
    for (&slot, vector) in slots.iter().zip(basis.iter()) {
        reduced.set_column(slot, vector);
    }

    reduced
}

/// Replace `basis[index]` by `basis[index] - shift` if the result is shorter.
#[inline]
fn shorten(basis: &mut [Vector3<f64>], index: usize, shift: Vector3<f64>) -> bool {
    let candidate = basis[index] - shift;
    if candidate.norm_squared() < basis[index].norm_squared() * (1.0 - REDUCTION_EPSILON) {
        basis[index] = candidate;
        true
    } else {
        false
    }
}

#[cfg(feature = "serde")]
mod raw {
    use super::*;

    /// Serialized form of the unit cell: lattice vectors and periodicity flags.
    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(super) struct RawUnitCell {
        a: Vector3D,
        b: Vector3D,
        c: Vector3D,
        active: [bool; 3],
    }

    impl From<UnitCell> for RawUnitCell {
        fn from(cell: UnitCell) -> Self {
            RawUnitCell {
                a: cell.lattice_vector(0),
                b: cell.lattice_vector(1),
                c: cell.lattice_vector(2),
                active: cell.active,
            }
        }
    }

    impl TryFrom<RawUnitCell> for UnitCell {
        type Error = UnitCellError;

        fn try_from(raw: RawUnitCell) -> Result<Self, Self::Error> {
            UnitCell::new(Matrix3::from_columns(&[raw.a.0, raw.b.0, raw.c.0]), raw.active)
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
