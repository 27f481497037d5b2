// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of the BondGraph structure and of bond inference from interatomic distances.

use std::collections::HashMap as StdHashMap;

use hashbrown::HashMap;

use crate::{
    errors::{BondError, GraphError},
    structures::{
        distance_matrix::DistanceMatrix, element::Elements, unit_cell::UnitCell,
        vector3d::Vector3D,
    },
};

/// Default factor by which the sum of covalent radii is multiplied to obtain the bonding threshold.
pub const DEFAULT_BOND_TOLERANCE: f64 = 1.2;

/// Source of covalent radii (in Å) indexed by atomic number.
pub trait RadiusTable {
    /// Get the covalent radius of an atom with the given atomic number.
    /// Returns `None` if the radius is not known.
    fn covalent_radius(&self, number: u32) -> Option<f64>;
}

impl RadiusTable for Elements {
    #[inline]
    fn covalent_radius(&self, number: u32) -> Option<f64> {
        self.by_number(number).and_then(|e| e.covalent_radius())
    }
}

impl RadiusTable for HashMap<u32, f64> {
    #[inline(always)]
    fn covalent_radius(&self, number: u32) -> Option<f64> {
        self.get(&number).copied()
    }
}

impl RadiusTable for StdHashMap<u32, f64> {
    #[inline(always)]
    fn covalent_radius(&self, number: u32) -> Option<f64> {
        self.get(&number).copied()
    }
}

/// Undirected simple graph of bonds between atoms.
///
/// Edges are stored as `(i, j)` pairs with `i < j`, sorted in ascending order, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "raw::RawBondGraph", into = "raw::RawBondGraph")
)]
pub struct BondGraph {
    n_atoms: usize,
    edges: Vec<(usize, usize)>,
    neighbors: Vec<Vec<usize>>,
}

impl BondGraph {
    /// Construct a new graph with `n_atoms` vertices from a list of edges.
    ///
    /// The order of atoms in an edge does not matter and duplicate edges are merged.
    ///
    /// ## Returns
    /// `BondGraph` if successful.
    /// `GraphError::SelfLoop` if an edge connects an atom with itself.
    /// `GraphError::IndexOutOfRange` if an edge refers to a non-existent atom.
    pub fn new(
        n_atoms: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<BondGraph, GraphError> {
        let mut normalized = Vec::new();
        for (i, j) in edges {
            if i == j {
                return Err(GraphError::SelfLoop(i));
            }

            if i >= n_atoms || j >= n_atoms {
                return Err(GraphError::IndexOutOfRange(i, j, n_atoms));
            }

            normalized.push((i.min(j), i.max(j)));
        }

        normalized.sort_unstable();
        normalized.dedup();

        Ok(BondGraph::from_sorted_edges(n_atoms, normalized))
    }

    /// Construct the graph from edges that are already ordered, unique, and valid.
    fn from_sorted_edges(n_atoms: usize, edges: Vec<(usize, usize)>) -> BondGraph {
        let mut neighbors = vec![Vec::new(); n_atoms];
        for &(i, j) in edges.iter() {
            neighbors[i].push(j);
            neighbors[j].push(i);
        }

        for list in neighbors.iter_mut() {
            list.sort_unstable();
        }

        BondGraph {
            n_atoms,
            edges,
            neighbors,
        }
    }

    /// Infer bonds from the positions of atoms.
    ///
    /// Two atoms are bonded if their (minimum-image) distance is not larger than
    /// the sum of their covalent radii multiplied by `tolerance`.
    /// If `tolerance` is not provided, [`DEFAULT_BOND_TOLERANCE`] is used.
    /// The tolerance must be a finite number larger than 1, otherwise `BondError::InvalidTolerance` is returned.
    ///
    /// ## Returns
    /// `BondGraph` if successful. `BondError` otherwise.
    ///
    /// ## Example
    /// ```
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let elements = Elements::default();
    /// let coordinates = [
    ///     Vector3D::new(0.0, 0.0, 0.0),
    ///     Vector3D::new(0.757, 0.586, 0.0),
    ///     Vector3D::new(-0.757, 0.586, 0.0),
    /// ];
    ///
    /// let graph = BondGraph::infer(&coordinates, &[8, 1, 1], None, &elements, None).unwrap();
    /// assert_eq!(graph.edges(), &[(0, 1), (0, 2)]);
    /// ```
    ///
    /// ## Notes
    /// - Atoms with atomic number 0 (probes) never form bonds.
    /// - For periodic systems, only the nearest periodic image of each pair is considered,
    ///   so at most one bond is created between any two atoms.
    pub fn infer(
        coordinates: &[Vector3D],
        numbers: &[u32],
        unit_cell: Option<&UnitCell>,
        radii: &impl RadiusTable,
        tolerance: Option<f64>,
    ) -> Result<BondGraph, BondError> {
        if coordinates.len() != numbers.len() {
            return Err(BondError::SizeMismatch(coordinates.len(), numbers.len()));
        }

        // radii are checked before any distance is calculated
        let atom_radii = collect_radii(numbers, radii)?;
        let tolerance = check_tolerance(tolerance)?;

        let distances = DistanceMatrix::from_coordinates(coordinates, unit_cell);
        Ok(identify_bonds(&distances, &atom_radii, tolerance))
    }

    /// Infer bonds from the positions of atoms using multiple threads.
    ///
    /// Works the same as [`BondGraph::infer`] but calculates the distance matrix in parallel.
    #[cfg(feature = "parallel")]
    pub fn infer_parallel(
        coordinates: &[Vector3D],
        numbers: &[u32],
        unit_cell: Option<&UnitCell>,
        radii: &impl RadiusTable,
        tolerance: Option<f64>,
        n_threads: usize,
    ) -> Result<BondGraph, BondError> {
        if coordinates.len() != numbers.len() {
            return Err(BondError::SizeMismatch(coordinates.len(), numbers.len()));
        }

        let atom_radii = collect_radii(numbers, radii)?;
        let tolerance = check_tolerance(tolerance)?;

        let distances = DistanceMatrix::from_coordinates_parallel(coordinates, unit_cell, n_threads);
        Ok(identify_bonds(&distances, &atom_radii, tolerance))
    }

    /// Infer bonds from an already calculated distance matrix.
    ///
    /// See [`BondGraph::infer`] for the bonding criterion.
    pub fn from_distances(
        distances: &DistanceMatrix,
        numbers: &[u32],
        radii: &impl RadiusTable,
        tolerance: Option<f64>,
    ) -> Result<BondGraph, BondError> {
        if distances.n_atoms() != numbers.len() {
            return Err(BondError::SizeMismatch(distances.n_atoms(), numbers.len()));
        }

        let atom_radii = collect_radii(numbers, radii)?;
        let tolerance = check_tolerance(tolerance)?;

        Ok(identify_bonds(distances, &atom_radii, tolerance))
    }

    /// Get all edges of the graph.
    #[inline(always)]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Number of edges (bonds) in the graph.
    #[inline(always)]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of vertices (atoms) in the graph.
    #[inline(always)]
    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Get indices of atoms bonded to atom `index` in ascending order.
    /// Returns `None` if the atom does not exist.
    #[inline]
    pub fn neighbors(&self, index: usize) -> Option<&[usize]> {
        self.neighbors.get(index).map(|x| x.as_slice())
    }

    /// Number of bonds of atom `index`.
    /// Returns `None` if the atom does not exist.
    #[inline]
    pub fn degree(&self, index: usize) -> Option<usize> {
        self.neighbors.get(index).map(|x| x.len())
    }

    /// Returns `true` if atoms `i` and `j` are bonded.
    #[inline]
    pub fn are_bonded(&self, i: usize, j: usize) -> bool {
        self.edges.binary_search(&(i.min(j), i.max(j))).is_ok()
    }

    /// Split the atoms into connected components (molecules).
    ///
    /// Components are ordered by their lowest atom index and atoms inside each
    /// component are sorted in ascending order.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut parents: Vec<usize> = (0..self.n_atoms).collect();

        fn find(parents: &mut [usize], mut x: usize) -> usize {
            while parents[x] != x {
                parents[x] = parents[parents[x]];
                x = parents[x];
            }
            x
        }

        for &(i, j) in self.edges.iter() {
            let root_i = find(&mut parents, i);
            let root_j = find(&mut parents, j);
            if root_i != root_j {
                parents[root_i.max(root_j)] = root_i.min(root_j);
            }
        }

        let mut component_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for atom in 0..self.n_atoms {
            let root = find(&mut parents, atom);
            let index = *component_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[index].push(atom);
        }

        components
    }
}

/// Get covalent radii of all atoms. Probes (atomic number 0) have no radius.
fn collect_radii(
    numbers: &[u32],
    radii: &impl RadiusTable,
) -> Result<Vec<Option<f64>>, BondError> {
    numbers
        .iter()
        .map(|&number| {
            if number == 0 {
                Ok(None)
            } else {
                radii
                    .covalent_radius(number)
                    .map(Some)
                    .ok_or(BondError::MissingRadius(number))
            }
        })
        .collect()
}

/// Check that the tolerance is a finite factor larger than 1 and fill in the default value.
fn check_tolerance(tolerance: Option<f64>) -> Result<f64, BondError> {
    let tolerance = tolerance.unwrap_or(DEFAULT_BOND_TOLERANCE);
    if !tolerance.is_finite() || tolerance <= 1.0 {
        return Err(BondError::InvalidTolerance(tolerance));
    }

    Ok(tolerance)
}

/// Identify bonded atoms. Edges are produced in ascending order.
fn identify_bonds(distances: &DistanceMatrix, radii: &[Option<f64>], tolerance: f64) -> BondGraph {
    let n_atoms = radii.len();
    let mut bonds = Vec::new();

    for a in 0..n_atoms {
        let r1 = match radii[a] {
            Some(x) => x,
            None => continue,
        };

        for b in (a + 1)..n_atoms {
            let r2 = match radii[b] {
                Some(x) => x,
                None => continue,
            };

            let limit = (r1 + r2) * tolerance;
            if distances.get(a, b) <= limit {
                bonds.push((a, b));
            }
        }
    }

    BondGraph::from_sorted_edges(n_atoms, bonds)
}

#[cfg(feature = "serde")]
mod raw {
    use super::*;

    /// Serialized form of the graph: number of atoms and the list of edges.
    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(super) struct RawBondGraph {
        n_atoms: usize,
        edges: Vec<(usize, usize)>,
    }

    impl From<BondGraph> for RawBondGraph {
        fn from(graph: BondGraph) -> Self {
            RawBondGraph {
                n_atoms: graph.n_atoms,
                edges: graph.edges,
            }
        }
    }

    impl TryFrom<RawBondGraph> for BondGraph {
        type Error = GraphError;

        fn try_from(raw: RawBondGraph) -> Result<Self, Self::Error> {
            BondGraph::new(raw.n_atoms, raw.edges)
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
