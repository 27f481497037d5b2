// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of rotational symmetry detection.

use getset::{CopyGetters, Getters};
use hashbrown::HashSet;
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};
use serde::Deserialize;

use crate::{
    errors::SymmetryError,
    molecule::{mass, Molecule},
    structures::vector3d::Vector3D,
};

/// Parameters of the rotational symmetry analysis.
///
/// Can be deserialized from YAML:
/// ```yaml
/// tolerance: 0.01
/// max_order: 12
/// mass_weighted: true
/// ```
/// Fields that are not provided keep their default values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymmetryParams {
    /// Maximal distance (in Å) between a rotated atom and its image.
    pub tolerance: f64,
    /// Highest order of a rotation axis searched for by [`axis_order`].
    pub max_order: usize,
    /// Rotate about the center of mass instead of the center of geometry.
    pub mass_weighted: bool,
}

impl Default for SymmetryParams {
    fn default() -> Self {
        SymmetryParams {
            tolerance: 1e-3,
            max_order: 20,
            mass_weighted: false,
        }
    }
}

impl SymmetryParams {
    /// Read symmetry parameters from a YAML string.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let params = SymmetryParams::from_yaml("tolerance: 0.05").unwrap();
    /// assert_eq!(params.tolerance, 0.05);
    /// assert_eq!(params.max_order, 20);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, SymmetryError> {
        let params: SymmetryParams = serde_yaml::from_str(yaml)
            .map_err(|e| SymmetryError::CouldNotParseYaml(e.to_string()))?;

        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), SymmetryError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SymmetryError::InvalidParams(format!(
                "tolerance must be positive, got `{}`",
                self.tolerance
            )));
        }

        if self.max_order == 0 {
            return Err(SymmetryError::InvalidParams(
                "max_order must be at least 1".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Proper rotations mapping a structure onto itself.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct RotationalSymmetry {
    /// Number of distinct proper rotations (including identity).
    #[getset(get_copy = "pub")]
    order: usize,
    /// Highest order of any detected rotation.
    #[getset(get_copy = "pub")]
    max_axis_order: usize,
    /// Unit axis of a rotation with the highest order. `None` if only identity was found.
    #[getset(get_copy = "pub")]
    axis: Option<Vector3D>,
    /// Matrices of all detected rotations about the center of the structure.
    /// Identity is always the first rotation.
    #[getset(get = "pub")]
    rotations: Vec<Matrix3<f64>>,
    /// Is the structure linear?
    #[getset(get_copy = "pub")]
    linear: bool,
}

impl RotationalSymmetry {
    /// Find all proper rotations that map the structure onto itself.
    ///
    /// ## Parameters
    /// - `coordinates`: positions of the atoms
    /// - `numbers`: atomic numbers of the atoms
    /// - `masses`: masses of the atoms; required only if `params.mass_weighted` is set
    /// - `params`: parameters of the analysis
    ///
    /// ## Notes
    /// - An atom is only ever mapped onto an atom with the same atomic number.
    /// - Linear structures report either identity alone or identity and a perpendicular C2 rotation.
    /// - Empty structures and single atoms have only the identity.
    pub fn analyze(
        coordinates: &[Vector3D],
        numbers: &[u32],
        masses: Option<&[f64]>,
        params: &SymmetryParams,
    ) -> Result<Self, SymmetryError> {
        let structure = CenteredStructure::new(coordinates, numbers, masses, params)?;
        let tolerance = params.tolerance;

        let identity = RotationalSymmetry {
            order: 1,
            max_axis_order: 1,
            axis: None,
            rotations: vec![Matrix3::identity()],
            linear: false,
        };

        let classes = structure.classes();

        let Some(first_class) = classes
            .iter()
            .filter(|class| structure.radius(class[0]) > tolerance)
            .min_by_key(|class| class.len())
        else {
            return Ok(identity);
        };

        let a = structure.positions[first_class[0]];
        let direction = a.normalize();

        // linear structures
        if structure
            .positions
            .iter()
            .all(|x| line_distance(x, &direction) <= tolerance)
        {
            let axis = perpendicular(&direction);
            let c2 = 2.0 * axis * axis.transpose() - Matrix3::identity();

            return Ok(if structure.permutation(&c2).is_some() {
                RotationalSymmetry {
                    order: 2,
                    max_axis_order: 2,
                    axis: Some(Vector3D(axis)),
                    rotations: vec![Matrix3::identity(), c2],
                    linear: true,
                }
            } else {
                RotationalSymmetry {
                    linear: true,
                    ..identity
                }
            });
        }

        // second reference atom: the most off-line atom of the smallest class that has one
        let mut ordered_classes: Vec<&Vec<usize>> = classes.iter().collect();
        ordered_classes.sort_by_key(|class| class.len());

        let (second_class, b_index) = ordered_classes
            .into_iter()
            .find_map(|class| {
                let (index, distance) = class
                    .iter()
                    .map(|&i| (i, line_distance(&structure.positions[i], &direction)))
                    .fold((class[0], f64::NEG_INFINITY), |best, candidate| {
                        if candidate.1 > best.1 {
                            candidate
                        } else {
                            best
                        }
                    });

                (distance > tolerance).then_some((class, index))
            })
            .expect("FATAL MOLGEOM ERROR | RotationalSymmetry::analyze | Non-linear structure must contain an off-line atom.");

        let b = structure.positions[b_index];
        let reference_frame = frame(&a, &b);
        let reference_dot = a.dot(&b);
        let dot_tolerance = 2.0 * tolerance * (a.norm() + b.norm());

        let mut rotations = Vec::new();
        let mut permutations = HashSet::new();

        for &i in first_class.iter() {
            for &j in second_class.iter() {
                if i == j {
                    continue;
                }

                let a_image = structure.positions[i];
                let b_image = structure.positions[j];

                if (a_image.dot(&b_image) - reference_dot).abs() > dot_tolerance {
                    continue;
                }

                let rotation = frame(&a_image, &b_image) * reference_frame.transpose();

                if let Some(permutation) = structure.permutation(&rotation) {
                    let order = permutation_order(&permutation);
                    if permutations.insert(permutation) {
                        rotations.push((rotation, order));
                    }
                }
            }
        }

        // identity first
        rotations.sort_by_key(|(_, order)| *order);

        let (max_rotation, max_axis_order) = rotations
            .iter()
            .max_by_key(|(_, order)| *order)
            .map(|(rotation, order)| (*rotation, *order))
            .unwrap_or((Matrix3::identity(), 1));

        let axis = if max_axis_order > 1 {
            Rotation3::from_matrix_unchecked(max_rotation)
                .axis()
                .map(|axis| Vector3D(axis.into_inner()))
        } else {
            None
        };

        Ok(RotationalSymmetry {
            order: rotations.len().max(1),
            max_axis_order,
            axis,
            rotations: if rotations.is_empty() {
                vec![Matrix3::identity()]
            } else {
                rotations.into_iter().map(|(rotation, _)| rotation).collect()
            },
            linear: false,
        })
    }
}

/// Calculate the order of the proper rotation group of a structure (rotational symmetry number).
///
/// ## Returns
/// Number of distinct proper rotations about the center of the structure
/// (including identity) that map every atom onto an atom with the same atomic number.
///
/// ## Example
/// ```
/// # use molgeom_rs::prelude::*;
/// #
/// let numbers = vec![8, 1, 1];
/// let coordinates = vec![
///     Vector3D::new(0.0, 0.0, 0.0),
///     Vector3D::new(0.757, 0.586, 0.0),
///     Vector3D::new(-0.757, 0.586, 0.0),
/// ];
///
/// let order = rotational_order(&coordinates, &numbers, None, &SymmetryParams::default()).unwrap();
/// assert_eq!(order, 2);
/// ```
pub fn rotational_order(
    coordinates: &[Vector3D],
    numbers: &[u32],
    masses: Option<&[f64]>,
    params: &SymmetryParams,
) -> Result<usize, SymmetryError> {
    Ok(RotationalSymmetry::analyze(coordinates, numbers, masses, params)?.order())
}

/// Calculate the highest order `k` (up to `params.max_order`) such that rotation
/// by `2π/k` about `axis` passing through the center of the structure maps
/// the structure onto itself.
///
/// ## Returns
/// The order of the axis (at least 1). `SymmetryError::InvalidAxis` if the axis has zero length.
///
/// ## Notes
/// - If all atoms lie on the axis, `params.max_order` is returned.
pub fn axis_order(
    coordinates: &[Vector3D],
    numbers: &[u32],
    masses: Option<&[f64]>,
    axis: &Vector3D,
    params: &SymmetryParams,
) -> Result<usize, SymmetryError> {
    let structure = CenteredStructure::new(coordinates, numbers, masses, params)?;

    if !axis.norm().is_normal() {
        return Err(SymmetryError::InvalidAxis(axis.to_array()));
    }

    Ok(structure.axis_order(&Unit::new_normalize(axis.0), params.max_order))
}

/// Calculate the highest order of a rotation axis among the principal axes of the structure.
///
/// Principal axes are obtained from the inertia tensor about the center of the structure.
/// Atoms have unit weights unless `params.mass_weighted` is set.
pub fn principal_axis_order(
    coordinates: &[Vector3D],
    numbers: &[u32],
    masses: Option<&[f64]>,
    params: &SymmetryParams,
) -> Result<usize, SymmetryError> {
    let structure = CenteredStructure::new(coordinates, numbers, masses, params)?;
    if structure.positions.is_empty() {
        return Ok(1);
    }

    let centered: Vec<Vector3D> = structure.positions.iter().map(|&x| Vector3D(x)).collect();
    let weights = match (params.mass_weighted, masses) {
        (true, Some(masses)) => masses.to_vec(),
        _ => vec![1.0; centered.len()],
    };

    let tensor = mass::inertia_tensor_about(&centered, &weights, &Vector3D::zeros());
    let principal = mass::principal_moments(&tensor).ok_or(SymmetryError::NoConvergence(
        "eigen-decomposition of the inertia tensor",
    ))?;

    Ok(principal
        .axes()
        .iter()
        .map(|axis| structure.axis_order(&Unit::new_normalize(axis.0), params.max_order))
        .max()
        .unwrap_or(1))
}

impl Molecule {
    /// Calculate the rotational symmetry number of the molecule.
    /// See [`rotational_order`] for more information.
    ///
    /// ## Notes
    /// - The unit cell of the molecule is ignored.
    pub fn rotational_order(&self, params: &SymmetryParams) -> Result<usize, SymmetryError> {
        rotational_order(self.coordinates(), self.numbers(), self.masses(), params)
    }

    /// Find all proper rotations mapping the molecule onto itself.
    /// See [`RotationalSymmetry::analyze`] for more information.
    pub fn rotational_symmetry(
        &self,
        params: &SymmetryParams,
    ) -> Result<RotationalSymmetry, SymmetryError> {
        RotationalSymmetry::analyze(self.coordinates(), self.numbers(), self.masses(), params)
    }

    /// Calculate the highest order of a rotation axis among the principal axes of the molecule.
    /// See [`principal_axis_order`] for more information.
    pub fn principal_axis_order(&self, params: &SymmetryParams) -> Result<usize, SymmetryError> {
        principal_axis_order(self.coordinates(), self.numbers(), self.masses(), params)
    }
}

/// Atoms of a structure with positions relative to its center.
struct CenteredStructure<'a> {
    positions: Vec<Vector3<f64>>,
    numbers: &'a [u32],
    tolerance: f64,
}

impl<'a> CenteredStructure<'a> {
    fn new(
        coordinates: &[Vector3D],
        numbers: &'a [u32],
        masses: Option<&[f64]>,
        params: &SymmetryParams,
    ) -> Result<Self, SymmetryError> {
        params.validate()?;

        if coordinates.len() != numbers.len() {
            return Err(SymmetryError::SizeMismatch(numbers.len(), coordinates.len()));
        }

        if let Some(masses) = masses {
            if masses.len() != coordinates.len() {
                return Err(SymmetryError::MassesMismatch(coordinates.len(), masses.len()));
            }
        }

        let center = if coordinates.is_empty() {
            Vector3::zeros()
        } else if params.mass_weighted {
            let masses = masses.ok_or(SymmetryError::MissingMasses)?;
            mass::weighted_center(coordinates, masses)
                .ok_or(SymmetryError::MissingMasses)?
                .0
        } else {
            coordinates.iter().map(|x| x.0).sum::<Vector3<f64>>() / coordinates.len() as f64
        };

        Ok(CenteredStructure {
            positions: coordinates.iter().map(|x| x.0 - center).collect(),
            numbers,
            tolerance: params.tolerance,
        })
    }

    #[inline(always)]
    fn radius(&self, index: usize) -> f64 {
        self.positions[index].norm()
    }

    /// Group atoms with the same atomic number and the same distance from the center.
    fn classes(&self) -> Vec<Vec<usize>> {
        let mut classes: Vec<Vec<usize>> = Vec::new();

        for i in 0..self.positions.len() {
            match classes.iter_mut().find(|class| {
                self.numbers[class[0]] == self.numbers[i]
                    && (self.radius(class[0]) - self.radius(i)).abs() <= self.tolerance
            }) {
                Some(class) => class.push(i),
                None => classes.push(vec![i]),
            }
        }

        classes
    }

    /// Map every atom onto the nearest atom of the same kind after applying `rotation`.
    /// Returns the resulting permutation or `None` if the rotation is not a symmetry operation.
    fn permutation(&self, rotation: &Matrix3<f64>) -> Option<Vec<usize>> {
        let mut used = vec![false; self.positions.len()];
        let mut permutation = Vec::with_capacity(self.positions.len());

        for (position, number) in self.positions.iter().zip(self.numbers.iter()) {
            let image = rotation * position;

            let (target, distance) = self
                .positions
                .iter()
                .zip(self.numbers.iter())
                .enumerate()
                .filter(|(_, (_, n))| *n == number)
                .map(|(j, (x, _))| (j, (x - image).norm()))
                .min_by(|a, b| a.1.total_cmp(&b.1))?;

            if distance > self.tolerance || used[target] {
                return None;
            }

            used[target] = true;
            permutation.push(target);
        }

        Some(permutation)
    }

    fn axis_order(&self, axis: &Unit<Vector3<f64>>, max_order: usize) -> usize {
        if self.positions.is_empty() {
            return 1;
        }

        (2..=max_order)
            .rev()
            .find(|&k| {
                let rotation = Rotation3::from_axis_angle(axis, std::f64::consts::TAU / k as f64);
                self.permutation(rotation.matrix()).is_some()
            })
            .unwrap_or(1)
    }
}

/// Distance of a point from the line through the origin along `direction` (unit vector).
#[inline(always)]
fn line_distance(point: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
    (point - direction * point.dot(direction)).norm()
}

/// Any unit vector perpendicular to the unit vector `direction`.
fn perpendicular(direction: &Vector3<f64>) -> Vector3<f64> {
    let smallest = direction.iamin();
    let mut basis = Vector3::zeros();
    basis[smallest] = 1.0;

    direction.cross(&basis).normalize()
}

/// Right-handed orthonormal frame with the first axis along `a` and the third axis along `a × b`.
fn frame(a: &Vector3<f64>, b: &Vector3<f64>) -> Matrix3<f64> {
    let e1 = a.normalize();
    let e3 = a.cross(b).normalize();
    let e2 = e3.cross(&e1);

    Matrix3::from_columns(&[e1, e2, e3])
}

/// Order of a permutation (least common multiple of its cycle lengths).
fn permutation_order(permutation: &[usize]) -> usize {
    let mut visited = vec![false; permutation.len()];
    let mut order = 1;

    for start in 0..permutation.len() {
        if visited[start] {
            continue;
        }

        let mut length = 0;
        let mut current = start;
        while !visited[current] {
            visited[current] = true;
            current = permutation[current];
            length += 1;
        }

        order = order / gcd(order, length) * length;
    }

    order
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::element::Elements;
    use crate::test_utilities::utilities::{
        ammonia, asymmetric, benzene, ethene, methane, sulfur_hexafluoride, water,
    };
    use float_cmp::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    fn carbon_dioxide() -> (Vec<u32>, Vec<Vector3D>) {
        (
            vec![8, 6, 8],
            vec![
                Vector3D::new(-1.16, 0.0, 0.0),
                Vector3D::new(0.0, 0.0, 0.0),
                Vector3D::new(1.16, 0.0, 0.0),
            ],
        )
    }

    fn hydrogen_cyanide() -> (Vec<u32>, Vec<Vector3D>) {
        (
            vec![1, 6, 7],
            vec![
                Vector3D::new(-1.06, 0.0, 0.0),
                Vector3D::new(0.0, 0.0, 0.0),
                Vector3D::new(1.16, 0.0, 0.0),
            ],
        )
    }

    fn rotate(coordinates: &[Vector3D]) -> Vec<Vector3D> {
        let rotation = Rotation3::from_euler_angles(0.4, 1.3, -0.8);
        coordinates
            .iter()
            .map(|x| x.transform(rotation.matrix()) + Vector3D::new(1.5, -2.0, 3.0))
            .collect()
    }

    macro_rules! rotational_order_tests {
        ($name:ident, $structure:expr, $expected:expr) => {
            paste::item! {
                #[test]
                fn [<rotational_order_ $name>]() {
                    let (numbers, coordinates) = $structure;
                    let order =
                        rotational_order(&coordinates, &numbers, None, &SymmetryParams::default())
                            .unwrap();
                    assert_eq!(order, $expected);
                }

                #[test]
                fn [<rotational_order_ $name _rotated_and_translated>]() {
                    let (numbers, coordinates) = $structure;
                    let coordinates = rotate(&coordinates);
                    let order =
                        rotational_order(&coordinates, &numbers, None, &SymmetryParams::default())
                            .unwrap();
                    assert_eq!(order, $expected);
                }

                #[test]
                fn [<rotational_order_ $name _shuffled>]() {
                    let (numbers, coordinates) = $structure;
                    let mut atoms: Vec<(u32, Vector3D)> =
                        numbers.into_iter().zip(coordinates.into_iter()).collect();
                    atoms.reverse();
                    let (numbers, coordinates): (Vec<u32>, Vec<Vector3D>) =
                        atoms.into_iter().unzip();

                    let order =
                        rotational_order(&coordinates, &numbers, None, &SymmetryParams::default())
                            .unwrap();
                    assert_eq!(order, $expected);
                }
            }
        };
    }

    rotational_order_tests!(benzene, benzene(), 12);
    rotational_order_tests!(asymmetric, asymmetric(), 1);
    rotational_order_tests!(methane, methane(), 12);
    rotational_order_tests!(ammonia, ammonia(), 3);
    rotational_order_tests!(water, water(), 2);
    rotational_order_tests!(ethene, ethene(), 4);
    rotational_order_tests!(sulfur_hexafluoride, sulfur_hexafluoride(), 24);
    rotational_order_tests!(carbon_dioxide, carbon_dioxide(), 2);
    rotational_order_tests!(hydrogen_cyanide, hydrogen_cyanide(), 1);

    #[test]
    fn rotational_order_trivial() {
        let params = SymmetryParams::default();
        assert_eq!(rotational_order(&[], &[], None, &params).unwrap(), 1);
        assert_eq!(
            rotational_order(&[Vector3D::new(1.0, 2.0, 3.0)], &[6], None, &params).unwrap(),
            1
        );
    }

    #[test]
    fn rotational_order_elements_matter() {
        // one hydrogen of ammonia replaced by fluorine
        let (mut numbers, coordinates) = ammonia();
        numbers[1] = 9;
        let order =
            rotational_order(&coordinates, &numbers, None, &SymmetryParams::default()).unwrap();
        assert_eq!(order, 1);
    }

    #[test]
    fn rotational_order_noisy_benzene() {
        let (numbers, coordinates) = benzene();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1337);
        let noisy: Vec<Vector3D> = coordinates
            .iter()
            .map(|x| {
                *x + Vector3D::new(
                    rng.gen_range(-0.001..0.001),
                    rng.gen_range(-0.001..0.001),
                    rng.gen_range(-0.001..0.001),
                )
            })
            .collect();

        let strict = SymmetryParams {
            tolerance: 1e-5,
            ..SymmetryParams::default()
        };
        assert_eq!(rotational_order(&noisy, &numbers, None, &strict).unwrap(), 1);

        let loose = SymmetryParams {
            tolerance: 0.05,
            ..SymmetryParams::default()
        };
        assert_eq!(rotational_order(&noisy, &numbers, None, &loose).unwrap(), 12);
    }

    #[test]
    fn rotational_symmetry_benzene() {
        let (numbers, coordinates) = benzene();
        let symmetry =
            RotationalSymmetry::analyze(&coordinates, &numbers, None, &SymmetryParams::default())
                .unwrap();

        assert_eq!(symmetry.order(), 12);
        assert_eq!(symmetry.max_axis_order(), 6);
        assert!(!symmetry.linear());
        assert_eq!(symmetry.rotations().len(), 12);
        assert!(symmetry.rotations()[0].is_identity(1e-10));

        let axis = symmetry.axis().unwrap();
        assert_approx_eq!(f64, axis.z.abs(), 1.0, epsilon = 1e-8);

        for rotation in symmetry.rotations() {
            assert_approx_eq!(f64, rotation.determinant(), 1.0, epsilon = 1e-10);
            assert!((rotation * rotation.transpose()).is_identity(1e-10));
        }
    }

    #[test]
    fn rotational_symmetry_methane() {
        let (numbers, coordinates) = methane();
        let symmetry =
            RotationalSymmetry::analyze(&coordinates, &numbers, None, &SymmetryParams::default())
                .unwrap();

        assert_eq!(symmetry.order(), 12);
        assert_eq!(symmetry.max_axis_order(), 3);
    }

    #[test]
    fn rotational_symmetry_linear() {
        let (numbers, coordinates) = carbon_dioxide();
        let symmetry =
            RotationalSymmetry::analyze(&coordinates, &numbers, None, &SymmetryParams::default())
                .unwrap();

        assert!(symmetry.linear());
        assert_eq!(symmetry.order(), 2);
        let axis = symmetry.axis().unwrap();
        assert_approx_eq!(f64, axis.x, 0.0, epsilon = 1e-12);
        assert_approx_eq!(f64, axis.len(), 1.0, epsilon = 1e-12);

        let (numbers, coordinates) = hydrogen_cyanide();
        let symmetry =
            RotationalSymmetry::analyze(&coordinates, &numbers, None, &SymmetryParams::default())
                .unwrap();
        assert!(symmetry.linear());
        assert_eq!(symmetry.order(), 1);
        assert!(symmetry.axis().is_none());
    }

    #[test]
    fn axis_order_benzene() {
        let (numbers, coordinates) = benzene();
        let params = SymmetryParams::default();

        let z = Vector3D::new(0.0, 0.0, 2.0);
        assert_eq!(axis_order(&coordinates, &numbers, None, &z, &params).unwrap(), 6);

        let x = Vector3D::new(1.0, 0.0, 0.0);
        assert_eq!(axis_order(&coordinates, &numbers, None, &x, &params).unwrap(), 2);

        let tilted = Vector3D::new(1.0, 1.0, 1.0);
        assert_eq!(axis_order(&coordinates, &numbers, None, &tilted, &params).unwrap(), 1);

        let limited = SymmetryParams {
            max_order: 4,
            ..SymmetryParams::default()
        };
        assert_eq!(axis_order(&coordinates, &numbers, None, &z, &limited).unwrap(), 3);
    }

    #[test]
    fn axis_order_invalid_axis() {
        let (numbers, coordinates) = benzene();
        match axis_order(
            &coordinates,
            &numbers,
            None,
            &Vector3D::zeros(),
            &SymmetryParams::default(),
        ) {
            Ok(_) => panic!("Function should have failed."),
            Err(SymmetryError::InvalidAxis(_)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }
    }

    #[test]
    fn principal_axis_order_benzene() {
        let (numbers, coordinates) = benzene();
        let coordinates = rotate(&coordinates);
        let order =
            principal_axis_order(&coordinates, &numbers, None, &SymmetryParams::default()).unwrap();
        assert_eq!(order, 6);
    }

    #[test]
    fn principal_axis_order_ammonia_mass_weighted() {
        let (numbers, coordinates) = ammonia();
        let molecule = Molecule::new(numbers, coordinates)
            .unwrap()
            .with_default_masses(&Elements::default())
            .unwrap();

        let params = SymmetryParams {
            mass_weighted: true,
            ..SymmetryParams::default()
        };

        assert_eq!(molecule.principal_axis_order(&params).unwrap(), 3);
        assert_eq!(molecule.rotational_order(&params).unwrap(), 3);
    }

    #[test]
    fn mass_weighted_without_masses() {
        let (numbers, coordinates) = water();
        let params = SymmetryParams {
            mass_weighted: true,
            ..SymmetryParams::default()
        };

        match rotational_order(&coordinates, &numbers, None, &params) {
            Ok(_) => panic!("Function should have failed."),
            Err(SymmetryError::MissingMasses) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }
    }

    #[test]
    fn size_mismatch() {
        let (_, coordinates) = water();

        match rotational_order(&coordinates, &[8, 1], None, &SymmetryParams::default()) {
            Ok(_) => panic!("Function should have failed."),
            Err(SymmetryError::SizeMismatch(2, 3)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }

        let (numbers, coordinates) = water();
        match rotational_order(&coordinates, &numbers, Some(&[1.0][..]), &SymmetryParams::default()) {
            Ok(_) => panic!("Function should have failed."),
            Err(SymmetryError::MassesMismatch(3, 1)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }
    }

    #[test]
    fn params_from_yaml() {
        let params =
            SymmetryParams::from_yaml("tolerance: 0.01\nmax_order: 8\nmass_weighted: true")
                .unwrap();
        assert_approx_eq!(f64, params.tolerance, 0.01);
        assert_eq!(params.max_order, 8);
        assert!(params.mass_weighted);

        let params = SymmetryParams::from_yaml("max_order: 6").unwrap();
        assert_approx_eq!(f64, params.tolerance, 1e-3);
        assert_eq!(params.max_order, 6);
        assert!(!params.mass_weighted);
    }

    #[test]
    fn params_from_yaml_fail() {
        match SymmetryParams::from_yaml("tolerance: 0.01\nunknown: 3") {
            Ok(_) => panic!("Function should have failed."),
            Err(SymmetryError::CouldNotParseYaml(_)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }

        match SymmetryParams::from_yaml("tolerance: -0.01") {
            Ok(_) => panic!("Function should have failed."),
            Err(SymmetryError::InvalidParams(_)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }

        match SymmetryParams::from_yaml("max_order: 0") {
            Ok(_) => panic!("Function should have failed."),
            Err(SymmetryError::InvalidParams(_)) => (),
            Err(e) => panic!(
                "Function failed successfully but incorrect error type `{:?}` was returned.",
                e
            ),
        }
    }

    #[test]
    fn permutation_orders() {
        assert_eq!(permutation_order(&[0, 1, 2]), 1);
        assert_eq!(permutation_order(&[1, 0, 2]), 2);
        assert_eq!(permutation_order(&[1, 2, 0, 4, 3]), 6);
        assert_eq!(permutation_order(&[]), 1);
    }
}
