// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of mass-related properties of molecules.

use getset::CopyGetters;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};

use crate::{errors::MassError, molecule::Molecule, structures::vector3d::Vector3D};

/// Convergence threshold for the eigen-decomposition of the inertia tensor.
const EIGEN_EPSILON: f64 = 1e-14;
/// Maximal number of iterations for the eigen-decomposition of the inertia tensor.
const EIGEN_MAX_ITERATIONS: usize = 1000;

/// Principal moments of inertia and the corresponding principal axes.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
pub struct PrincipalMoments {
    /// Principal moments of inertia in ascending order (in Da·Å²).
    #[getset(get_copy = "pub")]
    moments: [f64; 3],
    /// Unit vectors of the principal axes, matching the order of the moments.
    #[getset(get_copy = "pub")]
    axes: [Vector3D; 3],
}

impl Molecule {
    /// Calculate the total mass of the molecule (in daltons).
    ///
    /// ## Returns
    /// Total mass if the molecule has masses assigned. `MassError::NoMasses` otherwise.
    pub fn total_mass(&self) -> Result<f64, MassError> {
        Ok(self.masses().ok_or(MassError::NoMasses)?.iter().sum())
    }

    /// Calculate the center of mass of the molecule.
    ///
    /// ## Returns
    /// Center of mass if successful.
    /// `MassError::NoMasses` if the molecule has no masses assigned.
    /// `MassError::ZeroMass` if the total mass is not positive.
    ///
    /// ## Notes
    /// - The unit cell is ignored; the molecule should be whole.
    pub fn center_of_mass(&self) -> Result<Vector3D, MassError> {
        let masses = self.masses().ok_or(MassError::NoMasses)?;
        weighted_center(self.coordinates(), masses).ok_or(MassError::ZeroMass)
    }

    /// Calculate the center of geometry of the molecule.
    /// For a molecule with no atoms, null vector is returned.
    pub fn center_of_geometry(&self) -> Vector3D {
        if self.n_atoms() == 0 {
            return Vector3D::zeros();
        }

        let sum = self
            .coordinates()
            .iter()
            .fold(Vector3D::zeros(), |acc, &x| acc + x);
        sum * (1.0 / self.n_atoms() as f64)
    }

    /// Calculate the inertia tensor of the molecule about its center of mass (in Da·Å²).
    ///
    /// The tensor is calculated as `sum_i m_i (|r_i|^2 I - r_i r_i^T)`,
    /// where `r_i` is the position of atom `i` relative to the center of mass.
    pub fn inertia_tensor(&self) -> Result<Matrix3<f64>, MassError> {
        let masses = self.masses().ok_or(MassError::NoMasses)?;
        let center = weighted_center(self.coordinates(), masses).ok_or(MassError::ZeroMass)?;

        Ok(inertia_tensor_about(self.coordinates(), masses, &center))
    }

    /// Calculate the principal moments of inertia and the principal axes of the molecule.
    ///
    /// ## Returns
    /// `PrincipalMoments` if successful.
    /// `MassError::NoConvergence` if the eigen-decomposition of the inertia tensor fails.
    pub fn principal_moments(&self) -> Result<PrincipalMoments, MassError> {
        principal_moments(&self.inertia_tensor()?).ok_or(MassError::NoConvergence)
    }
}

/// Weighted average of positions. Returns `None` if the sum of weights is not positive.
pub(crate) fn weighted_center(coordinates: &[Vector3D], weights: &[f64]) -> Option<Vector3D> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let sum = coordinates
        .iter()
        .zip(weights.iter())
        .fold(Vector3::zeros(), |acc, (x, &w)| acc + x.0 * w);

    Some(Vector3D(sum / total))
}

/// Inertia tensor of weighted points about `center`.
pub(crate) fn inertia_tensor_about(
    coordinates: &[Vector3D],
    weights: &[f64],
    center: &Vector3D,
) -> Matrix3<f64> {
    coordinates
        .iter()
        .zip(weights.iter())
        .fold(Matrix3::zeros(), |tensor, (x, &w)| {
            let r = x.0 - center.0;
            tensor + (Matrix3::from_diagonal_element(r.norm_squared()) - r * r.transpose()) * w
        })
}

/// Eigen-decomposition of an inertia tensor with moments sorted in ascending order.
/// Returns `None` if the decomposition does not converge.
pub(crate) fn principal_moments(tensor: &Matrix3<f64>) -> Option<PrincipalMoments> {
    let decomposition = SymmetricEigen::try_new(*tensor, EIGEN_EPSILON, EIGEN_MAX_ITERATIONS)?;

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        decomposition.eigenvalues[a]
            .partial_cmp(&decomposition.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Some(PrincipalMoments {
        moments: order.map(|i| decomposition.eigenvalues[i]),
        axes: order.map(|i| Vector3D(decomposition.eigenvectors.column(i).into_owned())),
    })
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::element::Elements;
    use crate::test_utilities::utilities::{benzene, compare_matrices, water};
    use float_cmp::assert_approx_eq;

    fn water_with_masses() -> Molecule {
        let (numbers, coordinates) = water();
        Molecule::new(numbers, coordinates)
            .unwrap()
            .with_default_masses(&Elements::default())
            .unwrap()
    }

    #[test]
    fn total_mass() {
        let molecule = water_with_masses();
        assert_approx_eq!(f64, molecule.total_mass().unwrap(), 18.015, epsilon = 1e-10);
    }

    #[test]
    fn no_masses() {
        let (numbers, coordinates) = water();
        let molecule = Molecule::new(numbers, coordinates).unwrap();

        assert_eq!(molecule.total_mass(), Err(MassError::NoMasses));
        assert_eq!(molecule.center_of_mass(), Err(MassError::NoMasses));
        assert_eq!(molecule.inertia_tensor(), Err(MassError::NoMasses));
    }

    #[test]
    fn zero_mass() {
        let (numbers, coordinates) = water();
        let molecule = Molecule::new(numbers, coordinates)
            .unwrap()
            .copy_with()
            .masses(Some(vec![0.0; 3]))
            .build()
            .unwrap();

        assert_eq!(molecule.center_of_mass(), Err(MassError::ZeroMass));
    }

    #[test]
    fn center_of_mass() {
        let molecule = water_with_masses();
        let com = molecule.center_of_mass().unwrap();

        let masses = molecule.masses().unwrap();
        let total = molecule.total_mass().unwrap();
        let mut expected = Vector3D::zeros();
        for (m, x) in masses.iter().zip(molecule.coordinates()) {
            expected += *x * *m;
        }
        expected = expected * (1.0 / total);

        assert_approx_eq!(f64, com.x, expected.x, epsilon = 1e-12);
        assert_approx_eq!(f64, com.y, expected.y, epsilon = 1e-12);
        assert_approx_eq!(f64, com.z, expected.z, epsilon = 1e-12);

        // closed form for the symmetric water molecule
        assert_approx_eq!(f64, com.x, 0.0, epsilon = 1e-12);
        assert_approx_eq!(f64, com.y, 2.0 * 1.008 * 0.586 / 18.015, epsilon = 1e-12);
    }

    #[test]
    fn center_of_geometry() {
        let molecule = water_with_masses();
        let cog = molecule.center_of_geometry();

        assert_approx_eq!(f64, cog.x, 0.0, epsilon = 1e-12);
        assert_approx_eq!(f64, cog.y, 2.0 * 0.586 / 3.0, epsilon = 1e-12);
        assert_approx_eq!(f64, cog.z, 0.0, epsilon = 1e-12);

        let empty = Molecule::new(vec![], vec![]).unwrap();
        assert_eq!(empty.center_of_geometry(), Vector3D::zeros());
    }

    #[test]
    fn inertia_tensor() {
        let molecule = water_with_masses();
        let tensor = molecule.inertia_tensor().unwrap();
        let com = molecule.center_of_mass().unwrap();

        let mut expected = Matrix3::zeros();
        for (m, x) in molecule.masses().unwrap().iter().zip(molecule.coordinates()) {
            let r = (*x - com).0;
            expected += *m * (Matrix3::identity() * r.dot(&r) - r * r.transpose());
        }

        compare_matrices(&tensor, &expected, 1e-12);

        // planar molecule in the xy-plane: I_zz = I_xx + I_yy and no xz or yz products
        assert_approx_eq!(f64, tensor[(2, 2)], tensor[(0, 0)] + tensor[(1, 1)], epsilon = 1e-12);
        assert_approx_eq!(f64, tensor[(0, 2)], 0.0, epsilon = 1e-12);
        assert_approx_eq!(f64, tensor[(1, 2)], 0.0, epsilon = 1e-12);

        // closed form of I_yy = sum m x^2
        assert_approx_eq!(f64, tensor[(1, 1)], 2.0 * 1.008 * 0.757 * 0.757, epsilon = 1e-12);
        assert_eq!(tensor, tensor.transpose());
    }

    #[test]
    fn principal_moments_water() {
        let molecule = water_with_masses();
        let principal = molecule.principal_moments().unwrap();
        let moments = principal.moments();

        assert!(moments[0] <= moments[1] && moments[1] <= moments[2]);
        assert_approx_eq!(f64, moments[2], moments[0] + moments[1], epsilon = 1e-10);

        // largest moment about the axis perpendicular to the molecular plane
        assert_approx_eq!(f64, principal.axes()[2].z.abs(), 1.0, epsilon = 1e-10);
        for axis in principal.axes() {
            assert_approx_eq!(f64, axis.len(), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn principal_moments_benzene() {
        let (numbers, coordinates) = benzene();
        let molecule = Molecule::new(numbers, coordinates)
            .unwrap()
            .with_default_masses(&Elements::default())
            .unwrap();

        let moments = molecule.principal_moments().unwrap().moments();

        // oblate symmetric top
        assert_approx_eq!(f64, moments[0], moments[1], epsilon = 1e-8);
        assert_approx_eq!(f64, moments[2], 2.0 * moments[0], epsilon = 1e-8);

        let expected = 6.0 * (12.011 * 1.39 * 1.39 + 1.008 * 2.47 * 2.47);
        assert_approx_eq!(f64, moments[2], expected, epsilon = 1e-8);
    }
}
