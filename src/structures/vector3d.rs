// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of a three-dimensional vector used for atomic positions and displacements.

use std::ops::{Add, AddAssign, Deref, DerefMut, Mul, Neg, Sub, SubAssign};

use nalgebra::{Matrix3, Vector3};

/// Position of a point in space or a displacement between two points (in Å).
/// Wraps `nalgebra`'s `Vector3<f64>` and dereferences to it,
/// so all `nalgebra` vector methods (`norm`, `dot`, `cross`, ...) are available.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Vector3D(pub(crate) Vector3<f64>);

impl From<[f64; 3]> for Vector3D {
    #[inline]
    fn from(arr: [f64; 3]) -> Self {
        Vector3D(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

impl From<Vector3<f64>> for Vector3D {
    #[inline(always)]
    fn from(vec: Vector3<f64>) -> Self {
        Vector3D(vec)
    }
}

impl From<Vector3D> for Vector3<f64> {
    #[inline(always)]
    fn from(vec: Vector3D) -> Self {
        vec.0
    }
}

impl From<Vector3D> for [f64; 3] {
    #[inline]
    fn from(vec: Vector3D) -> Self {
        [vec.0.x, vec.0.y, vec.0.z]
    }
}

impl Deref for Vector3D {
    type Target = Vector3<f64>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vector3D {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    #[inline(always)]
    fn add(self, rhs: Vector3D) -> Self::Output {
        Vector3D(self.0 + rhs.0)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    #[inline(always)]
    fn sub(self, rhs: Vector3D) -> Self::Output {
        Vector3D(self.0 - rhs.0)
    }
}

impl AddAssign for Vector3D {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Vector3D) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Vector3D {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Vector3D) {
        self.0 -= rhs.0;
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Vector3D(-self.0)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    #[inline(always)]
    fn mul(self, rhs: f64) -> Self::Output {
        Vector3D(self.0 * rhs)
    }
}

impl Vector3D {
    /// Create a new `Vector3D` structure.
    #[inline(always)]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }

    /// Null vector.
    #[inline(always)]
    pub fn zeros() -> Self {
        Vector3D(Vector3::zeros())
    }

    /// Calculate length of the vector.
    #[inline(always)]
    pub fn len(&self) -> f64 {
        self.0.norm()
    }

    /// Convert the vector to a unit vector.
    /// A null vector is returned unchanged.
    #[inline]
    pub fn to_unit(mut self) -> Self {
        let len = self.len();
        if len > 0.0 {
            self.0 /= len;
        }
        self
    }

    /// Calculate the angle between two vectors. Returns the angle in radians.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let vec1 = Vector3D::new(1.0, 0.0, 0.0);
    /// let vec2 = Vector3D::new(0.0, 2.0, 0.0);
    /// assert!((vec1.angle(&vec2) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn angle(&self, vector: &Vector3D) -> f64 {
        let cos = self.0.dot(&vector.0) / (self.len() * vector.len());
        cos.clamp(-1.0, 1.0).acos()
    }

    /// Calculate the Euclidean distance between two points.
    #[inline(always)]
    pub fn distance(&self, point: &Vector3D) -> f64 {
        (point.0 - self.0).norm()
    }

    /// Get the vector pointing from `self` to `point`.
    #[inline(always)]
    pub fn vector_to(&self, point: &Vector3D) -> Vector3D {
        Vector3D(point.0 - self.0)
    }

    /// Apply a linear transformation (typically a rotation) to the vector.
    #[inline(always)]
    pub fn transform(&self, matrix: &Matrix3<f64>) -> Vector3D {
        Vector3D(matrix * self.0)
    }

    /// Convert to a fixed-size array.
    #[inline(always)]
    pub fn to_array(&self) -> [f64; 3] {
        (*self).into()
    }
}

#[cfg(feature = "serde")]
mod serde {
    use std::fmt;

    use super::*;
    use ::serde::{
        de::{self, SeqAccess, Visitor},
        ser::SerializeSeq,
        Deserialize, Deserializer, Serialize, Serializer,
    };

    impl Serialize for Vector3D {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut seq = serializer.serialize_seq(Some(3))?;
            for value in self.0.iter() {
                seq.serialize_element(value)?;
            }
            seq.end()
        }
    }

    impl<'de> Deserialize<'de> for Vector3D {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct Vector3DVisitor;

            impl<'de> Visitor<'de> for Vector3DVisitor {
                type Value = Vector3D;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a sequence of three floats")
                }

                fn visit_seq<S>(self, mut seq: S) -> Result<Vector3D, S::Error>
                where
                    S: SeqAccess<'de>,
                {
                    let mut xyz = [0.0f64; 3];
                    for (i, value) in xyz.iter_mut().enumerate() {
                        *value = seq
                            .next_element()?
                            .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                    }
                    Ok(Vector3D::from(xyz))
                }
            }

            deserializer.deserialize_seq(Vector3DVisitor)
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn len_and_unit() {
        let vec = Vector3D::new(3.0, 0.0, 4.0);
        assert_approx_eq!(f64, vec.len(), 5.0);

        let unit = vec.to_unit();
        assert_approx_eq!(f64, unit.len(), 1.0);
        assert_approx_eq!(f64, unit.x, 0.6);
        assert_approx_eq!(f64, unit.z, 0.8);
    }

    #[test]
    fn to_unit_null() {
        let vec = Vector3D::zeros();
        assert_eq!(vec.to_unit(), vec);
    }

    #[test]
    fn angle_parallel_and_antiparallel() {
        let vec1 = Vector3D::new(1.0, 1.0, 0.0);
        let vec2 = Vector3D::new(2.0, 2.0, 0.0);
        assert_approx_eq!(f64, vec1.angle(&vec2), 0.0, epsilon = 1e-7);
        assert_approx_eq!(f64, vec1.angle(&-vec2), std::f64::consts::PI, epsilon = 1e-7);
    }

    #[test]
    fn distance_and_vector_to() {
        let p1 = Vector3D::new(1.0, 2.0, 3.0);
        let p2 = Vector3D::new(2.0, 4.0, 5.0);

        assert_approx_eq!(f64, p1.distance(&p2), 3.0);
        assert_eq!(p1.vector_to(&p2), Vector3D::new(1.0, 2.0, 2.0));
        assert_eq!(p1 + p1.vector_to(&p2), p2);
    }

    #[test]
    fn transform_rotation() {
        let rotation = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let vec = Vector3D::new(1.0, 0.0, 2.0).transform(&rotation);

        assert_approx_eq!(f64, vec.x, 0.0);
        assert_approx_eq!(f64, vec.y, 1.0);
        assert_approx_eq!(f64, vec.z, 2.0);
    }

    #[test]
    fn arithmetic() {
        let mut vec = Vector3D::new(1.0, 2.0, 3.0);
        vec += Vector3D::new(1.0, 1.0, 1.0);
        vec -= Vector3D::new(0.5, 0.5, 0.5);
        assert_eq!(vec * 2.0, Vector3D::new(3.0, 5.0, 7.0));
        assert_eq!(vec.to_array(), [1.5, 2.5, 3.5]);
    }
}

#[cfg(feature = "serde")]
#[cfg(test)]
mod serde_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn vector3d_to_yaml() {
        let vector = Vector3D::new(4.376, 2.13, 4.0);
        let string = serde_yaml::to_string(&vector).unwrap();
        assert_eq!(string, "- 4.376\n- 2.13\n- 4.0\n");
    }

    #[test]
    fn vector3d_from_yaml() {
        let vector: Vector3D = serde_yaml::from_str("[ 4.376, 2.13, 4.0 ]\n").unwrap();
        assert_approx_eq!(f64, vector.x, 4.376);
        assert_approx_eq!(f64, vector.y, 2.13);
        assert_approx_eq!(f64, vector.z, 4.0);
    }

    #[test]
    fn vector3d_from_yaml_fail() {
        assert!(serde_yaml::from_str::<Vector3D>("[ 4.376, 2.13 ]\n").is_err());
    }
}
