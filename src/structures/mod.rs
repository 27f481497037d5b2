// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of various structures used in the `molgeom_rs` library.

pub mod bond_graph;
pub mod distance_matrix;
pub mod element;
pub mod unit_cell;
pub mod vector3d;
