// src/builder/element_block.rs

use indexmap::IndexMap;

use super::marker::{MarkerTable, MarkerToken};
use super::node_table::{FileId, NodeTableBuilder};
use crate::error::{Location, MeshImportError};
use crate::structs_and_impls::{ElementBlock, ElementKind, ElementOrder, NodeIndex};
use crate::taxonomy::ElementTypeEntry;

#[derive(Debug, Default)]
struct PendingBlock {
    connectivity: Vec<Vec<NodeIndex>>,
    markers: Vec<MarkerToken>,
}

/// Accumulates elements into one block per (kind, order), in first-seen order.
#[derive(Debug, Default)]
pub struct ElementBlockBuilder {
    blocks: IndexMap<(ElementKind, ElementOrder), PendingBlock>,
}

impl ElementBlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run of elements of one type.
    ///
    /// `node_ids` is the flat list of file node ids in origin ordering, `markers`
    /// holds one token per element. The run is reordered into canonical
    /// ordering and remapped through `nodes`.
    pub fn add_elements(
        &mut self,
        entry: &ElementTypeEntry,
        node_ids: &[FileId],
        markers: &[MarkerToken],
        nodes: &NodeTableBuilder,
        location: Location,
    ) -> Result<(), MeshImportError> {
        let per_element = entry.origin_nodes;
        if per_element == 0 || node_ids.len() % per_element != 0 {
            return Err(MeshImportError::malformed(
                location,
                format!(
                    "{} node ids do not divide into {:?} elements of {} nodes",
                    node_ids.len(),
                    entry.kind,
                    per_element
                ),
            ));
        }

        let element_count = node_ids.len() / per_element;
        if markers.len() != element_count {
            return Err(MeshImportError::malformed(
                location,
                format!("{} markers for {} elements", markers.len(), element_count),
            ));
        }
        if element_count == 0 {
            return Ok(());
        }

        let block = self.blocks.entry((entry.kind, entry.order)).or_default();
        block.connectivity.reserve(element_count);

        for (origin, &marker) in node_ids.chunks_exact(per_element).zip(markers) {
            let connectivity = entry
                .reorder(origin)
                .into_iter()
                .map(|id| nodes.lookup(id, location))
                .collect::<Result<Vec<_>, _>>()?;
            block.connectivity.push(connectivity);
            block.markers.push(marker);
        }

        Ok(())
    }

    pub fn add_element(
        &mut self,
        entry: &ElementTypeEntry,
        node_ids: &[FileId],
        marker: MarkerToken,
        nodes: &NodeTableBuilder,
        location: Location,
    ) -> Result<(), MeshImportError> {
        if node_ids.len() != entry.origin_nodes {
            return Err(MeshImportError::malformed(
                location,
                format!(
                    "{:?} element has {} nodes, expected {}",
                    entry.kind,
                    node_ids.len(),
                    entry.origin_nodes
                ),
            ));
        }
        self.add_elements(entry, node_ids, &[marker], nodes, location)
    }

    pub fn element_count(&self) -> usize {
        self.blocks.values().map(|block| block.connectivity.len()).sum()
    }

    pub fn finish(self, markers: &MarkerTable) -> Vec<ElementBlock> {
        self.blocks
            .into_iter()
            .map(|((kind, order), pending)| ElementBlock {
                kind,
                order,
                connectivity: pending.connectivity,
                markers: pending.markers.into_iter().map(|token| markers.resolve(token)).collect(),
            })
            .collect()
    }
}
