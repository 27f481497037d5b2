// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of rigid-body alignment of structures and RMSD calculation.

use getset::CopyGetters;
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{
    errors::AlignmentError,
    molecule::{mass, Molecule},
    structures::vector3d::Vector3D,
};

/// Convergence threshold for the singular value decomposition of the covariance matrix.
const SVD_EPSILON: f64 = 1e-14;
/// Maximal number of iterations for the singular value decomposition of the covariance matrix.
const SVD_MAX_ITERATIONS: usize = 1000;

/// Optimal superposition of a mobile structure onto a reference structure.
///
/// Applying the alignment to a point `x` of the mobile structure yields `rotation * x + translation`.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
pub struct Alignment {
    /// Proper rotation matrix (determinant +1).
    #[getset(get_copy = "pub")]
    rotation: Matrix3<f64>,
    /// Translation applied after the rotation.
    #[getset(get_copy = "pub")]
    translation: Vector3D,
    /// Root-mean-square deviation after the superposition (in Å).
    #[getset(get_copy = "pub")]
    rmsd: f64,
}

impl Alignment {
    /// Apply the alignment to a set of points.
    pub fn apply(&self, points: &[Vector3D]) -> Vec<Vector3D> {
        points.iter().map(|x| self.apply_one(x)).collect()
    }

    #[inline(always)]
    fn apply_one(&self, point: &Vector3D) -> Vector3D {
        Vector3D(self.rotation * point.0 + self.translation.0)
    }
}

/// Calculate the optimal rotation matrix, translation vector, and RMSD
/// to superimpose `mobile` onto `reference` using the Kabsch algorithm.
///
/// ## Parameters
/// - `reference`: positions of the reference structure
/// - `mobile`: positions of the structure to align; `mobile[i]` corresponds to `reference[i]`
/// - `weights`: weights of the individual points; uniform weights are used if not provided
///
/// ## Returns
/// `Alignment` if successful.
/// `AlignmentError::SizeMismatch` if the structures have different numbers of points.
/// `AlignmentError::WeightsMismatch` if the number of weights does not match the number of points.
/// `AlignmentError::InvalidWeights` if any weight is negative or the weights do not sum to a positive value.
/// `AlignmentError::Empty` if the structures contain no points.
/// `AlignmentError::NoConvergence` if the singular value decomposition fails.
///
/// ## Example
/// ```
/// # use molgeom_rs::prelude::*;
/// #
/// let reference = [
///     Vector3D::new(1.0, 0.0, 0.0),
///     Vector3D::new(0.0, 1.0, 0.0),
///     Vector3D::new(0.0, 0.0, 1.0),
/// ];
/// let mobile = [
///     Vector3D::new(2.0, 1.0, 1.0),
///     Vector3D::new(1.0, 2.0, 1.0),
///     Vector3D::new(1.0, 1.0, 2.0),
/// ];
///
/// let alignment = align(&reference, &mobile, None).unwrap();
/// assert!(alignment.rotation().is_identity(1e-10));
/// assert!(alignment.rmsd() < 1e-10);
/// ```
pub fn align(
    reference: &[Vector3D],
    mobile: &[Vector3D],
    weights: Option<&[f64]>,
) -> Result<Alignment, AlignmentError> {
    if reference.len() != mobile.len() {
        return Err(AlignmentError::SizeMismatch(reference.len(), mobile.len()));
    }

    if reference.is_empty() {
        return Err(AlignmentError::Empty);
    }

    let weights = match weights {
        Some(w) if w.len() != reference.len() => {
            return Err(AlignmentError::WeightsMismatch(w.len(), reference.len()))
        }
        Some(w) if w.iter().any(|&x| !x.is_finite() || x < 0.0) => {
            return Err(AlignmentError::InvalidWeights)
        }
        Some(w) => w.to_vec(),
        None => vec![1.0; reference.len()],
    };

    let sum_w: f64 = weights.iter().sum();
    let centroid_reference =
        mass::weighted_center(reference, &weights).ok_or(AlignmentError::InvalidWeights)?;
    let centroid_mobile =
        mass::weighted_center(mobile, &weights).ok_or(AlignmentError::InvalidWeights)?;

    // center the points
    let reference_centered: Vec<Vector3<f64>> = reference
        .iter()
        .map(|x| x.0 - centroid_reference.0)
        .collect();
    let mobile_centered: Vec<Vector3<f64>> =
        mobile.iter().map(|x| x.0 - centroid_mobile.0).collect();

    // covariance matrix
    let h = mobile_centered
        .iter()
        .zip(reference_centered.iter())
        .zip(weights.iter())
        .fold(Matrix3::zeros(), |h, ((m, r), w)| h + *w * m * r.transpose());

    let svd = h
        .try_svd(true, true, SVD_EPSILON, SVD_MAX_ITERATIONS)
        .ok_or(AlignmentError::NoConvergence)?;
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(AlignmentError::NoConvergence);
    };

    // reflection correction
    let mut d = Matrix3::identity();
    if (v_t.transpose() * u.transpose()).determinant() < 0.0 {
        d[(2, 2)] = -1.0;
    }

    let rotation = v_t.transpose() * d * u.transpose();
    let translation = centroid_reference.0 - rotation * centroid_mobile.0;

    let rmsd = (mobile_centered
        .iter()
        .zip(reference_centered.iter())
        .zip(weights.iter())
        .map(|((m, r), w)| w * (rotation * m - r).norm_squared())
        .sum::<f64>()
        / sum_w)
        .sqrt();

    Ok(Alignment {
        rotation,
        translation: Vector3D(translation),
        rmsd,
    })
}

impl Molecule {
    /// Calculate the optimal superposition of this molecule onto `reference`.
    ///
    /// Atoms are weighted by the masses of the reference molecule if it has any,
    /// otherwise all atoms have the same weight.
    ///
    /// ## Notes
    /// - Atoms are matched by their indices; atomic numbers are not checked.
    /// - Unit cells are ignored; both molecules should be whole.
    pub fn align_to(&self, reference: &Molecule) -> Result<Alignment, AlignmentError> {
        align(
            reference.coordinates(),
            self.coordinates(),
            reference.masses(),
        )
    }

    /// Superimpose this molecule onto `reference`.
    ///
    /// ## Returns
    /// Copy of the molecule transformed by the optimal alignment (including its unit cell)
    /// together with the RMSD between the transformed molecule and the reference.
    pub fn fit_to(&self, reference: &Molecule) -> Result<(Molecule, f64), AlignmentError> {
        let alignment = self.align_to(reference)?;

        let rotation = Rotation3::from_matrix_unchecked(alignment.rotation());
        let unit_cell = self.unit_cell().map(|cell| cell.rotated(&rotation));

        let fitted = self
            .copy_with()
            .coordinates(alignment.apply(self.coordinates()))
            .unit_cell(unit_cell)
            .build()
            .expect("FATAL MOLGEOM ERROR | Molecule::fit_to | Fitted molecule should be valid.");

        Ok((fitted, alignment.rmsd()))
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
