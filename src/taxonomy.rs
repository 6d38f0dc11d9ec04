// src/taxonomy.rs

//! Element type tables: for every origin format, which canonical kind/order a
//! type code stands for and how its node slots map onto canonical ordering.
//!
//! Canonical ordering lists corners first, then mid-edge nodes:
//! - Line3: `e0 e1 m01`
//! - Tri6: `c0 c1 c2 m01 m12 m20`
//! - Quad8: `c0 c1 c2 c3 m01 m12 m23 m30`
//! - Tet10: `c0 c1 c2 c3 m01 m12 m20 m03 m13 m23`
//! - Hex20: `c0..c7 m01 m12 m23 m30 m45 m56 m67 m74 m04 m15 m26 m37`

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::MeshImportError;
use crate::format::MeshFormat;
use crate::structs_and_impls::{ElementKind, ElementOrder};

/// One row of the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTypeEntry {
    pub kind: ElementKind,
    pub order: ElementOrder,
    /// Nodes per element as written in the origin file.
    pub origin_nodes: usize,
    /// `canonical[i] = origin[permutation[i]]`. Its length is the canonical
    /// node count, which is smaller than `origin_nodes` when face or body
    /// centre nodes are dropped.
    pub permutation: &'static [usize],
}

impl ElementTypeEntry {
    const fn new(
        kind: ElementKind,
        order: ElementOrder,
        origin_nodes: usize,
        permutation: &'static [usize],
    ) -> Self {
        ElementTypeEntry {
            kind,
            order,
            origin_nodes,
            permutation,
        }
    }

    pub fn canonical_nodes(&self) -> usize {
        self.permutation.len()
    }

    /// Reorder one element's origin node list into canonical order.
    /// `origin` must hold exactly `origin_nodes` entries.
    pub fn reorder<T: Copy>(&self, origin: &[T]) -> Vec<T> {
        debug_assert_eq!(origin.len(), self.origin_nodes);
        self.permutation.iter().map(|&slot| origin[slot]).collect()
    }
}

use ElementKind::*;
use ElementOrder::*;

const ID1: &[usize] = &[0];
const ID2: &[usize] = &[0, 1];
const ID3: &[usize] = &[0, 1, 2];
const ID4: &[usize] = &[0, 1, 2, 3];
const ID6: &[usize] = &[0, 1, 2, 3, 4, 5];
const ID8: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7];
const ID10: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
const ID20: &[usize] = &[
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
];

// Mid node written between the two end nodes.
const LINE3_MIDDLE: &[usize] = &[0, 2, 1];

// Comsol lists corners in tensor order, then the remaining nodes of the
// lagrange grid lexicographically (x fastest).
const COMSOL_TRI2: &[usize] = &[0, 1, 2, 3, 5, 4];
const COMSOL_QUAD: &[usize] = &[0, 1, 3, 2];
const COMSOL_QUAD2: &[usize] = &[0, 1, 3, 2, 4, 7, 8, 5];
const COMSOL_TET2: &[usize] = &[0, 1, 2, 3, 4, 6, 5, 7, 8, 9];
const COMSOL_HEX: &[usize] = &[0, 1, 3, 2, 4, 5, 7, 6];
const COMSOL_HEX2: &[usize] = &[
    0, 1, 3, 2, 4, 5, 7, 6, 8, 11, 12, 9, 22, 25, 26, 23, 13, 15, 21, 19,
];

const GMSH_TET10: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 9, 8];
const GMSH_HEX20: &[usize] = &[
    0, 1, 2, 3, 4, 5, 6, 7, 8, 11, 13, 9, 16, 18, 19, 17, 10, 12, 14, 15,
];

// Elfen walks the perimeter: corner, mid, corner, mid, ...
const ELFEN_TRI6: &[usize] = &[0, 2, 4, 1, 3, 5];
const ELFEN_QUAD8: &[usize] = &[0, 2, 4, 6, 1, 3, 5, 7];

static COMSOL_TYPES: &[(&str, ElementTypeEntry)] = &[
    ("vtx", ElementTypeEntry::new(Point, Linear, 1, ID1)),
    ("edg", ElementTypeEntry::new(Line, Linear, 2, ID2)),
    ("edg2", ElementTypeEntry::new(Line, Quadratic, 3, ID3)),
    ("tri", ElementTypeEntry::new(Triangle, Linear, 3, ID3)),
    ("tri2", ElementTypeEntry::new(Triangle, Quadratic, 6, COMSOL_TRI2)),
    ("quad", ElementTypeEntry::new(Quad, Linear, 4, COMSOL_QUAD)),
    ("quad2", ElementTypeEntry::new(Quad, Quadratic, 9, COMSOL_QUAD2)),
    ("tet", ElementTypeEntry::new(Tetrahedron, Linear, 4, ID4)),
    ("tet2", ElementTypeEntry::new(Tetrahedron, Quadratic, 10, COMSOL_TET2)),
    ("hex", ElementTypeEntry::new(Hexahedron, Linear, 8, COMSOL_HEX)),
    ("hex2", ElementTypeEntry::new(Hexahedron, Quadratic, 27, COMSOL_HEX2)),
];

static GMSH_TYPES: &[(u32, ElementTypeEntry)] = &[
    (15, ElementTypeEntry::new(Point, Linear, 1, ID1)),
    (1, ElementTypeEntry::new(Line, Linear, 2, ID2)),
    (8, ElementTypeEntry::new(Line, Quadratic, 3, ID3)),
    (2, ElementTypeEntry::new(Triangle, Linear, 3, ID3)),
    (9, ElementTypeEntry::new(Triangle, Quadratic, 6, ID6)),
    (3, ElementTypeEntry::new(Quad, Linear, 4, ID4)),
    (16, ElementTypeEntry::new(Quad, Quadratic, 8, ID8)),
    (10, ElementTypeEntry::new(Quad, Quadratic, 9, ID8)),
    (4, ElementTypeEntry::new(Tetrahedron, Linear, 4, ID4)),
    (11, ElementTypeEntry::new(Tetrahedron, Quadratic, 10, GMSH_TET10)),
    (5, ElementTypeEntry::new(Hexahedron, Linear, 8, ID8)),
    (17, ElementTypeEntry::new(Hexahedron, Quadratic, 20, GMSH_HEX20)),
    (12, ElementTypeEntry::new(Hexahedron, Quadratic, 27, GMSH_HEX20)),
];

static ELFEN_TYPES: &[(u32, ElementTypeEntry)] = &[
    (1, ElementTypeEntry::new(Point, Linear, 1, ID1)),
    (2, ElementTypeEntry::new(Line, Linear, 2, ID2)),
    (3, ElementTypeEntry::new(Line, Quadratic, 3, LINE3_MIDDLE)),
    (4, ElementTypeEntry::new(Triangle, Linear, 3, ID3)),
    (5, ElementTypeEntry::new(Triangle, Quadratic, 6, ELFEN_TRI6)),
    (6, ElementTypeEntry::new(Quad, Linear, 4, ID4)),
    (7, ElementTypeEntry::new(Quad, Quadratic, 8, ELFEN_QUAD8)),
    (8, ElementTypeEntry::new(Tetrahedron, Linear, 4, ID4)),
    (9, ElementTypeEntry::new(Tetrahedron, Quadratic, 10, ID10)),
    (10, ElementTypeEntry::new(Hexahedron, Linear, 8, ID8)),
    (11, ElementTypeEntry::new(Hexahedron, Quadratic, 20, ID20)),
];

/// Topology class an Abaqus element type name decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbaqusTopology {
    /// C3D*, DC3D*
    Solid,
    /// Plane/axisymmetric continuum, shells, membranes, rigid surfaces.
    Surface,
    /// Trusses, beams, rigid lines.
    Curve,
    /// MASS, ROTARYI.
    Node,
}

static ABAQUS_TYPES: &[((AbaqusTopology, usize), ElementTypeEntry)] = &[
    ((AbaqusTopology::Node, 1), ElementTypeEntry::new(Point, Linear, 1, ID1)),
    ((AbaqusTopology::Curve, 2), ElementTypeEntry::new(Line, Linear, 2, ID2)),
    ((AbaqusTopology::Curve, 3), ElementTypeEntry::new(Line, Quadratic, 3, LINE3_MIDDLE)),
    ((AbaqusTopology::Surface, 3), ElementTypeEntry::new(Triangle, Linear, 3, ID3)),
    ((AbaqusTopology::Surface, 6), ElementTypeEntry::new(Triangle, Quadratic, 6, ID6)),
    ((AbaqusTopology::Surface, 4), ElementTypeEntry::new(Quad, Linear, 4, ID4)),
    ((AbaqusTopology::Surface, 8), ElementTypeEntry::new(Quad, Quadratic, 8, ID8)),
    ((AbaqusTopology::Solid, 4), ElementTypeEntry::new(Tetrahedron, Linear, 4, ID4)),
    ((AbaqusTopology::Solid, 10), ElementTypeEntry::new(Tetrahedron, Quadratic, 10, ID10)),
    ((AbaqusTopology::Solid, 8), ElementTypeEntry::new(Hexahedron, Linear, 8, ID8)),
    ((AbaqusTopology::Solid, 20), ElementTypeEntry::new(Hexahedron, Quadratic, 20, ID20)),
];

static COMSOL_INDEX: Lazy<HashMap<&'static str, &'static ElementTypeEntry>> =
    Lazy::new(|| COMSOL_TYPES.iter().map(|(name, entry)| (*name, entry)).collect());

static GMSH_INDEX: Lazy<HashMap<u32, &'static ElementTypeEntry>> =
    Lazy::new(|| GMSH_TYPES.iter().map(|(code, entry)| (*code, entry)).collect());

static ELFEN_INDEX: Lazy<HashMap<u32, &'static ElementTypeEntry>> =
    Lazy::new(|| ELFEN_TYPES.iter().map(|(code, entry)| (*code, entry)).collect());

static ABAQUS_INDEX: Lazy<HashMap<(AbaqusTopology, usize), &'static ElementTypeEntry>> =
    Lazy::new(|| ABAQUS_TYPES.iter().map(|(key, entry)| (*key, entry)).collect());

pub fn comsol(type_name: &str) -> Result<&'static ElementTypeEntry, MeshImportError> {
    COMSOL_INDEX
        .get(type_name)
        .copied()
        .ok_or_else(|| MeshImportError::UnsupportedElementType(type_name.to_string()))
}

pub fn gmsh(type_code: u32) -> Result<&'static ElementTypeEntry, MeshImportError> {
    GMSH_INDEX
        .get(&type_code)
        .copied()
        .ok_or_else(|| MeshImportError::UnsupportedElementType(format!("gmsh type {}", type_code)))
}

pub fn elfen(type_code: u32) -> Result<&'static ElementTypeEntry, MeshImportError> {
    ELFEN_INDEX
        .get(&type_code)
        .copied()
        .ok_or_else(|| MeshImportError::UnsupportedElementType(format!("elfen type {}", type_code)))
}

/// `type_name` is only used for the error message.
pub fn abaqus(
    topology: AbaqusTopology,
    node_count: usize,
    type_name: &str,
) -> Result<&'static ElementTypeEntry, MeshImportError> {
    ABAQUS_INDEX
        .get(&(topology, node_count))
        .copied()
        .ok_or_else(|| MeshImportError::UnsupportedElementType(type_name.to_string()))
}

/// Every entry registered for a format.
pub fn entries(format: MeshFormat) -> Vec<&'static ElementTypeEntry> {
    match format {
        MeshFormat::Abaqus => ABAQUS_TYPES.iter().map(|(_, entry)| entry).collect(),
        MeshFormat::Comsol => COMSOL_TYPES.iter().map(|(_, entry)| entry).collect(),
        MeshFormat::Gmsh => GMSH_TYPES.iter().map(|(_, entry)| entry).collect(),
        MeshFormat::Elfen => ELFEN_TYPES.iter().map(|(_, entry)| entry).collect(),
    }
}
