// src/builder/mod.rs

//! Per-parse state shared by every format driver.

pub mod element_block;
pub mod marker;
pub mod node_table;

pub use element_block::ElementBlockBuilder;
pub use marker::{MarkerResolver, MarkerTable, MarkerToken};
pub use node_table::{FileId, NodeTableBuilder};

use crate::error::{Location, MeshImportError};
use crate::options::ImportOptions;
use crate::structs_and_impls::CanonicalMesh;
use crate::taxonomy::ElementTypeEntry;

/// Everything one parse accumulates. Created by a driver, threaded through its
/// helpers, and consumed by [`ParseContext::finish`]; nothing outlives the call.
#[derive(Debug, Default)]
pub struct ParseContext {
    pub nodes: NodeTableBuilder,
    pub elements: ElementBlockBuilder,
    pub markers: MarkerResolver,
    dimension_hint: Option<usize>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a spatial dimension implied by the file; the largest one wins.
    pub fn note_dimension(&mut self, dimension: usize) {
        self.dimension_hint = Some(self.dimension_hint.map_or(dimension, |d| d.max(dimension)));
    }

    pub fn dimension_hint(&self) -> Option<usize> {
        self.dimension_hint
    }

    pub fn add_elements(
        &mut self,
        entry: &ElementTypeEntry,
        node_ids: &[FileId],
        markers: &[MarkerToken],
        location: Location,
    ) -> Result<(), MeshImportError> {
        self.elements
            .add_elements(entry, node_ids, markers, &self.nodes, location)
    }

    pub fn add_element(
        &mut self,
        entry: &ElementTypeEntry,
        node_ids: &[FileId],
        marker: MarkerToken,
        location: Location,
    ) -> Result<(), MeshImportError> {
        self.elements
            .add_element(entry, node_ids, marker, &self.nodes, location)
    }

    /// Resolve markers, settle the spatial dimension and hand over the mesh.
    ///
    /// The dimension is the caller's if given, else the driver's hint, else
    /// the widest coordinate row.
    pub fn finish(self, options: &ImportOptions) -> Result<CanonicalMesh, MeshImportError> {
        if self.nodes.is_empty() {
            return Err(MeshImportError::malformed(
                Location::EndOfInput,
                "mesh has no node coordinates",
            ));
        }

        let inferred = self
            .dimension_hint
            .unwrap_or_else(|| self.nodes.max_width());
        let dimension = options.resolve_dimension(inferred)?;

        let marker_table = self.markers.finish();
        let blocks = self.elements.finish(&marker_table);
        let nodes = self.nodes.finish(dimension);

        let mut mesh = CanonicalMesh::new(nodes, blocks, dimension);
        mesh.marker_names = marker_table.into_names();
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs_and_impls::ElementKind;
    use crate::taxonomy;

    #[test]
    fn test_finish_uses_hint_then_width() {
        let mut ctx = ParseContext::new();
        ctx.nodes.insert(1, vec![0.0, 0.0, 0.0], Location::Line(1)).unwrap();
        ctx.nodes.insert(2, vec![1.0, 0.0, 0.0], Location::Line(2)).unwrap();
        let line = taxonomy::gmsh(1).unwrap();
        ctx.add_element(line, &[1, 2], MarkerToken::Unmarked, Location::Line(3)).unwrap();

        let mesh = ctx.finish(&ImportOptions::default()).unwrap();
        assert_eq!(mesh.spatial_dimension, 3);
        assert!(mesh.boundary_only);

        let mut ctx = ParseContext::new();
        ctx.nodes.insert(1, vec![0.0, 0.0, 0.0], Location::Line(1)).unwrap();
        ctx.nodes.insert(2, vec![1.0, 0.0, 0.0], Location::Line(2)).unwrap();
        ctx.note_dimension(1);
        ctx.add_element(line, &[1, 2], MarkerToken::Unmarked, Location::Line(3)).unwrap();

        let mesh = ctx.finish(&ImportOptions::default()).unwrap();
        assert_eq!(mesh.spatial_dimension, 1);
        assert_eq!(mesh.nodes[1].coordinates, vec![1.0]);
        assert!(!mesh.boundary_only);
        assert_eq!(mesh.blocks[0].kind, ElementKind::Line);
    }

    #[test]
    fn test_note_dimension_keeps_largest() {
        let mut ctx = ParseContext::new();
        ctx.note_dimension(2);
        ctx.note_dimension(3);
        ctx.note_dimension(1);
        assert_eq!(ctx.dimension_hint(), Some(3));
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let err = ParseContext::new().finish(&ImportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MeshImportError::MalformedRecord { location: Location::EndOfInput, .. }
        ));
    }

    #[test]
    fn test_named_markers_are_resolved() {
        let mut ctx = ParseContext::new();
        for id in 1..=3 {
            ctx.nodes.insert(id, vec![id as f64, 0.0], Location::Line(id as usize)).unwrap();
        }
        let line = taxonomy::gmsh(1).unwrap();
        let outlet = ctx.markers.named(Some("outlet"));
        let inlet = ctx.markers.named(Some("inlet"));
        ctx.add_element(line, &[1, 2], outlet, Location::Line(4)).unwrap();
        ctx.add_element(line, &[2, 3], inlet, Location::Line(5)).unwrap();

        let mesh = ctx.finish(&ImportOptions::default()).unwrap();
        assert_eq!(mesh.blocks[0].markers, vec![2, 1]);
        assert_eq!(mesh.marker_names, vec!["inlet", "outlet"]);
    }
}
