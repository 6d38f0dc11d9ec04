// src/builder/node_table.rs

use std::collections::HashMap;

use crate::error::{Location, MeshImportError};
use crate::structs_and_impls::{NodeIndex, Point};

/// Node id as written in the source file.
pub type FileId = u64;

/// Collects coordinate rows and renumbers file ids into dense 0-based indices.
#[derive(Debug, Default)]
pub struct NodeTableBuilder {
    rows: Vec<Vec<f64>>,
    index: HashMap<FileId, NodeIndex>,
}

impl NodeTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Ids must be unique but need not be sorted or contiguous.
    pub fn insert(
        &mut self,
        id: FileId,
        coordinates: Vec<f64>,
        location: Location,
    ) -> Result<NodeIndex, MeshImportError> {
        let dense = self.rows.len();
        if self.index.insert(id, dense).is_some() {
            return Err(MeshImportError::malformed(
                location,
                format!("duplicate node id {}", id),
            ));
        }
        self.rows.push(coordinates);
        Ok(dense)
    }

    pub fn lookup(&self, id: FileId, location: Location) -> Result<NodeIndex, MeshImportError> {
        self.index.get(&id).copied().ok_or_else(|| {
            MeshImportError::malformed(location, format!("unknown node id {}", id))
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest coordinate row supplied.
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of leading columns left once trailing columns that are zero in
    /// every row are dropped.
    pub fn significant_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().rposition(|&value| value != 0.0).map_or(0, |last| last + 1))
            .max()
            .unwrap_or(0)
    }

    /// Produce the node table with every row cut or zero-padded to `dimension` columns.
    pub fn finish(self, dimension: usize) -> Vec<Point> {
        self.rows
            .into_iter()
            .map(|mut coordinates| {
                coordinates.resize(dimension, 0.0);
                Point::new(coordinates)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_renumbering() {
        let mut table = NodeTableBuilder::new();
        table.insert(40, vec![0.0, 0.0], Location::Line(1)).unwrap();
        table.insert(7, vec![1.0, 0.0], Location::Line(2)).unwrap();
        table.insert(1000, vec![0.0, 1.0], Location::Line(3)).unwrap();

        assert_eq!(table.lookup(40, Location::Line(9)).unwrap(), 0);
        assert_eq!(table.lookup(7, Location::Line(9)).unwrap(), 1);
        assert_eq!(table.lookup(1000, Location::Line(9)).unwrap(), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_duplicate_and_unknown_ids() {
        let mut table = NodeTableBuilder::new();
        table.insert(1, vec![0.0], Location::Line(1)).unwrap();

        let err = table.insert(1, vec![2.0], Location::Line(2)).unwrap_err();
        assert!(err.to_string().contains("duplicate node id 1"));

        let err = table.lookup(5, Location::Line(3)).unwrap_err();
        assert!(matches!(
            err,
            MeshImportError::MalformedRecord { location: Location::Line(3), ref detail } if detail == "unknown node id 5"
        ));
    }

    #[test]
    fn test_widths_and_finish() {
        let mut table = NodeTableBuilder::new();
        table.insert(1, vec![0.0, 0.0, 0.0], Location::Line(1)).unwrap();
        table.insert(2, vec![1.0, 2.0, 0.0], Location::Line(2)).unwrap();
        table.insert(3, vec![4.0], Location::Line(3)).unwrap();

        assert_eq!(table.max_width(), 3);
        assert_eq!(table.significant_width(), 2);

        let points = table.finish(2);
        assert_eq!(points[1].coordinates, vec![1.0, 2.0]);
        assert_eq!(points[2].coordinates, vec![4.0, 0.0]);
    }
}
