// src/parser/elfen/mes.rs

//! Elfen `.mes` mesh files.
//!
//! Three keyword sections carry the mesh, anywhere in the token stream:
//!
//! ```text
//! coordinates <dim> <count>          { <id> <x> [<y> [<z>]] } * count
//! element_type_numbers <count>       { <code> } * count
//! element_topology <npe> <count>     { <id> <region> <node> * npe } * count
//! ```
//!
//! The i-th type code belongs to the i-th `element_topology` section. Other
//! words and their values are skipped.

use log::{debug, trace};

use super::tokens::TokenCursor;
use crate::builder::{FileId, MarkerResolver, MarkerToken, ParseContext};
use crate::error::{Location, MeshImportError};
use crate::options::ImportOptions;
use crate::structs_and_impls::{CanonicalMesh, MarkerId};
use crate::taxonomy;

#[derive(Debug)]
struct TopologyElement {
    location: Location,
    nodes: Vec<FileId>,
    marker: MarkerToken,
}

#[derive(Debug)]
struct TopologySection {
    location: Location,
    nodes_per_element: usize,
    elements: Vec<TopologyElement>,
}

/// Parser for Elfen `.mes` meshes.
pub struct MesParser;

impl MesParser {
    pub fn parse(content: &str, options: &ImportOptions) -> Result<CanonicalMesh, MeshImportError> {
        let mut cursor = TokenCursor::new(content);
        let mut ctx = ParseContext::new();
        let mut type_codes: Vec<(u32, Location)> = Vec::new();
        let mut topologies: Vec<TopologySection> = Vec::new();

        while let Some((token, location)) = cursor.next_token() {
            match token.text {
                "coordinates" => Self::parse_coordinates(&mut cursor, &mut ctx)?,
                "element_type_numbers" => Self::parse_type_numbers(&mut cursor, &mut type_codes)?,
                "element_topology" => topologies.push(Self::parse_topology(&mut cursor, location)?),
                other => trace!(token = other, location:% = location; "Skipping Elfen token"),
            }
        }

        if type_codes.len() != topologies.len() {
            return Err(MeshImportError::malformed(
                Location::EndOfInput,
                format!(
                    "{} element type numbers for {} element_topology sections",
                    type_codes.len(),
                    topologies.len()
                ),
            ));
        }

        for ((code, _), topology) in type_codes.iter().zip(&topologies) {
            let entry = taxonomy::elfen(*code)?;
            if topology.nodes_per_element != entry.origin_nodes {
                return Err(MeshImportError::malformed(
                    topology.location,
                    format!(
                        "element type {} has {} nodes, topology declares {}",
                        code, entry.origin_nodes, topology.nodes_per_element
                    ),
                ));
            }
            for element in &topology.elements {
                ctx.add_element(entry, &element.nodes, element.marker, element.location)?;
            }
        }

        debug!(
            nodes = ctx.nodes.len(),
            topology_sections = topologies.len(),
            elements = ctx.elements.element_count();
            "Parsed Elfen mesh",
        );

        ctx.finish(options)
    }

    fn parse_coordinates(
        cursor: &mut TokenCursor<'_>,
        ctx: &mut ParseContext,
    ) -> Result<(), MeshImportError> {
        const SECTION: &str = "coordinates";

        let (dimension, _): (usize, _) = cursor.next_int("dimension", SECTION, 1, 0)?;
        let (count, _): (usize, _) = cursor.next_int("node count", SECTION, 1, 0)?;
        ctx.note_dimension(dimension);

        for read in 0..count {
            let (id, location): (FileId, _) = cursor.next_int("node id", SECTION, count, read)?;
            let coordinates = (0..dimension)
                .map(|_| cursor.next_float(SECTION, count, read))
                .collect::<Result<Vec<f64>, _>>()?;
            ctx.nodes.insert(id, coordinates, location)?;
        }
        Ok(())
    }

    fn parse_type_numbers(
        cursor: &mut TokenCursor<'_>,
        type_codes: &mut Vec<(u32, Location)>,
    ) -> Result<(), MeshImportError> {
        const SECTION: &str = "element_type_numbers";

        let (count, _): (usize, _) = cursor.next_int("type count", SECTION, 1, 0)?;
        for read in 0..count {
            type_codes.push(cursor.next_int("element type", SECTION, count, read)?);
        }
        Ok(())
    }

    fn parse_topology(
        cursor: &mut TokenCursor<'_>,
        location: Location,
    ) -> Result<TopologySection, MeshImportError> {
        const SECTION: &str = "element_topology";

        let (nodes_per_element, _): (usize, _) =
            cursor.next_int("nodes per element", SECTION, 1, 0)?;
        let (count, _): (usize, _) = cursor.next_int("element count", SECTION, 1, 0)?;

        let mut elements = Vec::new();
        for read in 0..count {
            let (_id, element_location): (u64, _) =
                cursor.next_int("element id", SECTION, count, read)?;
            let (region, _): (MarkerId, _) = cursor.next_int("region", SECTION, count, read)?;
            let nodes = (0..nodes_per_element)
                .map(|_| cursor.next_int("node id", SECTION, count, read).map(|(id, _)| id))
                .collect::<Result<Vec<FileId>, _>>()?;

            elements.push(TopologyElement {
                location: element_location,
                nodes,
                marker: MarkerResolver::integer(Some(region)),
            });
        }

        Ok(TopologySection {
            location,
            nodes_per_element,
            elements,
        })
    }
}
