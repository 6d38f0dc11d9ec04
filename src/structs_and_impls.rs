// src/structs_and_impls.rs

use std::collections::BTreeSet;

/// Dense 0-based index into [`CanonicalMesh::nodes`].
pub type NodeIndex = usize;

/// Region marker. 0 means "unmarked".
pub type MarkerId = u32;

pub const UNMARKED: MarkerId = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub coordinates: Vec<f64>, // x for 1D, x,y for 2D, x,y,z for 3D
}

impl Point {
    pub fn new(coordinates: Vec<f64>) -> Self {
        Point { coordinates }
    }

    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }
}

/// Topological family of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Point,
    Line,
    Triangle,
    Quad,
    Tetrahedron,
    Hexahedron,
}

/// Interpolation order of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementOrder {
    Linear,
    Quadratic,
}

impl ElementKind {
    /// Topological dimension: 0 for points up to 3 for solids.
    pub fn dimension(&self) -> usize {
        match self {
            ElementKind::Point => 0,
            ElementKind::Line => 1,
            ElementKind::Triangle | ElementKind::Quad => 2,
            ElementKind::Tetrahedron | ElementKind::Hexahedron => 3,
        }
    }

    /// Number of nodes of this kind in canonical ordering, or `None` for
    /// combinations that do not exist (a quadratic point).
    pub fn node_count(&self, order: ElementOrder) -> Option<usize> {
        match (self, order) {
            (ElementKind::Point, ElementOrder::Linear) => Some(1),
            (ElementKind::Point, ElementOrder::Quadratic) => None,
            (ElementKind::Line, ElementOrder::Linear) => Some(2),
            (ElementKind::Line, ElementOrder::Quadratic) => Some(3),
            (ElementKind::Triangle, ElementOrder::Linear) => Some(3),
            (ElementKind::Triangle, ElementOrder::Quadratic) => Some(6),
            (ElementKind::Quad, ElementOrder::Linear) => Some(4),
            (ElementKind::Quad, ElementOrder::Quadratic) => Some(8),
            (ElementKind::Tetrahedron, ElementOrder::Linear) => Some(4),
            (ElementKind::Tetrahedron, ElementOrder::Quadratic) => Some(10),
            (ElementKind::Hexahedron, ElementOrder::Linear) => Some(8),
            (ElementKind::Hexahedron, ElementOrder::Quadratic) => Some(20),
        }
    }
}

/// All elements of one kind and order, in canonical node ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBlock {
    pub kind: ElementKind,
    pub order: ElementOrder,
    pub connectivity: Vec<Vec<NodeIndex>>,
    pub markers: Vec<MarkerId>, // one per connectivity row
}

impl ElementBlock {
    pub fn new(kind: ElementKind, order: ElementOrder) -> Self {
        ElementBlock {
            kind,
            order,
            connectivity: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.connectivity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectivity.is_empty()
    }

    pub fn nodes_per_element(&self) -> usize {
        self.kind.node_count(self.order).unwrap_or(0)
    }

    /// Iterate over `(connectivity, marker)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[NodeIndex], MarkerId)> + '_ {
        self.connectivity
            .iter()
            .zip(self.markers.iter())
            .map(|(nodes, &marker)| (nodes.as_slice(), marker))
    }
}

/// The format-independent mesh every driver produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalMesh {
    pub nodes: Vec<Point>,
    pub blocks: Vec<ElementBlock>,
    pub spatial_dimension: usize,
    /// True when elements were supplied but none of them reaches the spatial
    /// dimension, so a consumer should build a boundary-only mesh.
    pub boundary_only: bool,
    /// Sorted group names; the name at position `i` is marker id `i + 1`.
    /// Empty when the file carries integer markers only.
    pub marker_names: Vec<String>,
}

impl CanonicalMesh {
    pub fn new(nodes: Vec<Point>, blocks: Vec<ElementBlock>, spatial_dimension: usize) -> Self {
        let has_elements = blocks.iter().any(|block| !block.is_empty());
        let has_full_dimension = blocks
            .iter()
            .any(|block| !block.is_empty() && block.kind.dimension() >= spatial_dimension);

        CanonicalMesh {
            nodes,
            blocks,
            spatial_dimension,
            boundary_only: has_elements && !has_full_dimension,
            marker_names: Vec::new(),
        }
    }

    pub fn marker_name(&self, marker: MarkerId) -> Option<&str> {
        let slot = (marker as usize).checked_sub(1)?;
        self.marker_names.get(slot).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of elements across all blocks.
    pub fn element_count(&self) -> usize {
        self.blocks.iter().map(ElementBlock::len).sum()
    }

    pub fn blocks_of_dimension(&self, dimension: usize) -> impl Iterator<Item = &ElementBlock> + '_ {
        self.blocks
            .iter()
            .filter(move |block| block.kind.dimension() == dimension)
    }

    pub fn block(&self, kind: ElementKind, order: ElementOrder) -> Option<&ElementBlock> {
        self.blocks
            .iter()
            .find(|block| block.kind == kind && block.order == order)
    }

    /// Sorted distinct marker ids used by any element.
    pub fn marker_ids(&self) -> Vec<MarkerId> {
        let ids: BTreeSet<MarkerId> = self
            .blocks
            .iter()
            .flat_map(|block| block.markers.iter().copied())
            .collect();
        ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: ElementKind, rows: usize) -> ElementBlock {
        let mut block = ElementBlock::new(kind, ElementOrder::Linear);
        let width = block.nodes_per_element();
        for _ in 0..rows {
            block.connectivity.push(vec![0; width]);
            block.markers.push(UNMARKED);
        }
        block
    }

    #[test]
    fn test_node_counts() {
        assert_eq!(ElementKind::Triangle.node_count(ElementOrder::Linear), Some(3));
        assert_eq!(ElementKind::Triangle.node_count(ElementOrder::Quadratic), Some(6));
        assert_eq!(ElementKind::Hexahedron.node_count(ElementOrder::Quadratic), Some(20));
        assert_eq!(ElementKind::Point.node_count(ElementOrder::Quadratic), None);
    }

    #[test]
    fn test_boundary_only_flag() {
        let nodes = vec![Point::new(vec![0.0, 0.0, 0.0])];

        let surface = CanonicalMesh::new(nodes.clone(), vec![block(ElementKind::Triangle, 2)], 3);
        assert!(surface.boundary_only);

        let solid = CanonicalMesh::new(
            nodes.clone(),
            vec![block(ElementKind::Triangle, 2), block(ElementKind::Tetrahedron, 1)],
            3,
        );
        assert!(!solid.boundary_only);

        let planar = CanonicalMesh::new(nodes.clone(), vec![block(ElementKind::Quad, 1)], 2);
        assert!(!planar.boundary_only);

        // Solids flattened onto a forced plane still fill it.
        let flattened = CanonicalMesh::new(nodes.clone(), vec![block(ElementKind::Tetrahedron, 1)], 2);
        assert!(!flattened.boundary_only);

        let empty = CanonicalMesh::new(nodes, Vec::new(), 3);
        assert!(!empty.boundary_only);
    }

    #[test]
    fn test_counts_and_markers() {
        let mut lines = block(ElementKind::Line, 2);
        lines.markers = vec![3, 1];
        let mesh = CanonicalMesh::new(
            vec![Point::new(vec![0.0, 0.0])],
            vec![lines, block(ElementKind::Quad, 3)],
            2,
        );
        assert_eq!(mesh.element_count(), 5);
        assert_eq!(mesh.marker_ids(), vec![0, 1, 3]);
        assert_eq!(mesh.blocks_of_dimension(1).count(), 1);
        assert!(mesh.block(ElementKind::Quad, ElementOrder::Linear).is_some());
        assert!(mesh.block(ElementKind::Quad, ElementOrder::Quadratic).is_none());
    }
}
