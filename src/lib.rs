// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! # molgeom_rs: Molecular Geometry Library for Rust
//!
//! Rust library for deriving structural properties of molecules and crystals
//! from the positions of their atoms.
//!
//! ## Usage
//!
//! Run
//!
//! ```bash
//! $ cargo add molgeom_rs
//! ```
//!
//! Import the crate in your Rust code:
//! ```
//! use molgeom_rs::prelude::*;
//! ```
//!
//! ## Examples
//!
//! #### Distances in a periodic system
//!
//! Calculate distances between all pairs of atoms using the minimum-image convention.
//! The unit cell may be triclinic and periodic only along some of its lattice vectors.
//!
//! ```
//! use molgeom_rs::prelude::*;
//! use nalgebra::Matrix3;
//!
//! // lattice vectors are the columns of the matrix
//! let matrix = Matrix3::new(
//!     5.0, 1.0, 0.0,
//!     0.0, 5.0, 0.0,
//!     0.0, 0.0, 5.0,
//! );
//! // periodic along the first two lattice vectors only
//! let cell = UnitCell::new(matrix, [true, true, false]).unwrap();
//!
//! let coordinates = vec![
//!     Vector3D::new(0.5, 0.5, 0.5),
//!     Vector3D::new(4.5, 0.5, 0.5),
//!     Vector3D::new(0.5, 0.5, 4.5),
//! ];
//!
//! let distances = DistanceMatrix::from_coordinates(&coordinates, Some(&cell));
//! assert!((distances.get(0, 1) - 1.0).abs() < 1e-12);
//! // no periodicity along the third lattice vector
//! assert!((distances.get(0, 2) - 4.0).abs() < 1e-12);
//! ```
//!
//! #### Guessing bonds
//!
//! Bonds are assigned to pairs of atoms that are closer than the sum of their covalent radii
//! multiplied by a tolerance factor. Covalent radii are taken from the element table.
//!
//! ```
//! use molgeom_rs::prelude::*;
//!
//! let water = Molecule::new(
//!     vec![8, 1, 1],
//!     vec![
//!         Vector3D::new(0.0, 0.0, 0.0),
//!         Vector3D::new(0.757, 0.586, 0.0),
//!         Vector3D::new(-0.757, 0.586, 0.0),
//!     ],
//! )
//! .unwrap();
//!
//! let elements = Elements::default();
//! let graph = water.guess_bonds(&elements, None).unwrap();
//! assert_eq!(graph.edges(), &[(0, 1), (0, 2)]);
//! ```
//!
//! #### Rotational symmetry and alignment
//!
//! ```
//! use molgeom_rs::prelude::*;
//!
//! let water = Molecule::new(
//!     vec![8, 1, 1],
//!     vec![
//!         Vector3D::new(0.0, 0.0, 0.0),
//!         Vector3D::new(0.757, 0.586, 0.0),
//!         Vector3D::new(-0.757, 0.586, 0.0),
//!     ],
//! )
//! .unwrap();
//!
//! // symmetry number of water is 2
//! assert_eq!(water.rotational_order(&SymmetryParams::default()).unwrap(), 2);
//!
//! // superimpose a shifted copy of the molecule onto the original
//! let shifted = water
//!     .copy_with()
//!     .coordinates(
//!         water
//!             .coordinates()
//!             .iter()
//!             .map(|x| *x + Vector3D::new(1.0, 2.0, 3.0))
//!             .collect(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let (fitted, rmsd) = shifted.fit_to(&water).unwrap();
//! assert!(rmsd < 1e-10);
//! assert!(fitted.coordinates()[0].len() < 1e-10);
//! ```
//!
//! ## Element table
//! Masses and covalent radii of elements are read from a YAML table.
//! The default table (`Elements::default()`) is compiled into the library.
//! Additional elements or modified properties can be loaded using `Elements::update`:
//! ```yaml
//! deuterium:
//!   symbol: D
//!   number: 101
//!   mass: 2.014
//!   covalent_radius: 0.31
//! ```
//!
//! ## Error handling
//! Proper error handling and propagation is at heart of the `molgeom_rs` library.
//! The individual error types provided by the `molgeom_rs` are however not exported into the `prelude` module.
//!
//! If you want to use specific error type from the `molgeom_rs` library, you will have to include
//! it explicitly from the `errors` module. For instance, if you want to directly work with errors
//! that can occur when constructing a unit cell, use:
//! ```
//! use molgeom_rs::errors::UnitCellError;
//! ```
//!
//! ## Features
//! - `serde`: serialization and deserialization of vectors, unit cells, bond graphs, distance matrices and molecules
//! - `parallel`: multi-threaded calculation of distance matrices and bond graphs
//!
//! ## Units
//! Lengths are in ångströms, masses in daltons. Angles at the public interface are in degrees.
//!
//! ## License
//! This library is released under the MIT License.

/// Current version of the `molgeom_rs` library.
pub const MOLGEOM_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod errors;
pub mod molecule;
pub mod structures;
mod test_utilities;

/// Reexported basic `molgeom_rs` structures, traits and functions.
pub mod prelude {
    pub use crate::molecule::geometry::Grid;
    pub use crate::molecule::mass::PrincipalMoments;
    pub use crate::molecule::rmsd::{align, Alignment};
    pub use crate::molecule::symmetry::{
        axis_order, principal_axis_order, rotational_order, RotationalSymmetry, SymmetryParams,
    };
    pub use crate::molecule::{Molecule, MoleculeBuilder};
    pub use crate::structures::bond_graph::{BondGraph, RadiusTable, DEFAULT_BOND_TOLERANCE};
    pub use crate::structures::distance_matrix::DistanceMatrix;
    pub use crate::structures::element::{Element, Elements};
    pub use crate::structures::unit_cell::UnitCell;
    pub use crate::structures::vector3d::Vector3D;
}
