// src/parser/abaqus/abaqus_inp.rs

use log::{debug, trace, warn};

use super::element_type;
use super::records::{self, KeywordRecord};
use crate::builder::{FileId, ParseContext};
use crate::error::{parse_float, parse_int, Feature, Location, MeshImportError};
use crate::options::ImportOptions;
use crate::structs_and_impls::CanonicalMesh;

/// Keywords that generate nodes or elements procedurally.
const GENERATION_KEYWORDS: &[&str] = &["NGEN", "NFILL", "NCOPY", "ELGEN", "ELCOPY"];

/// At most x, y and z are read from a node line.
const MAX_COORDINATES: usize = 3;

/// Parser for Abaqus `.inp` input decks.
pub struct AbaqusInpParser;

impl AbaqusInpParser {
    /// Parse the text of an Abaqus `.inp` file.
    ///
    /// All `*NODE` records are read before any `*ELEMENT` record, so element
    /// blocks may precede the nodes they reference.
    pub fn parse(content: &str, options: &ImportOptions) -> Result<CanonicalMesh, MeshImportError> {
        let records = records::tokenize(content)?;
        Self::reject_unsupported_keywords(&records)?;

        let mut ctx = ParseContext::new();

        for record in records.iter().filter(|record| record.keyword == "NODE") {
            Self::parse_nodes(record, &mut ctx)?;
        }

        for record in records.iter().filter(|record| record.keyword == "ELEMENT") {
            Self::parse_elements(record, &mut ctx)?;
        }

        for record in records
            .iter()
            .filter(|record| record.keyword != "NODE" && record.keyword != "ELEMENT")
        {
            trace!(
                keyword = record.keyword.as_str(),
                line = record.line,
                data_lines = record.data.len();
                "Skipping Abaqus keyword",
            );
        }

        debug!(
            nodes = ctx.nodes.len(),
            elements = ctx.elements.element_count(),
            dimension_hint:? = ctx.dimension_hint();
            "Parsed Abaqus input",
        );

        ctx.finish(options)
    }

    fn reject_unsupported_keywords(records: &[KeywordRecord]) -> Result<(), MeshImportError> {
        for record in records {
            if GENERATION_KEYWORDS.contains(&record.keyword.as_str()) {
                return Err(MeshImportError::UnsupportedFeature(
                    Feature::IncrementalGeneration,
                ));
            }
            if record.keyword == "INCLUDE" {
                return Err(MeshImportError::UnsupportedFeature(Feature::Include));
            }
        }
        Ok(())
    }

    /// Each data line is `id, x[, y[, z]]`. Omitted coordinates are zero.
    fn parse_nodes(record: &KeywordRecord, ctx: &mut ParseContext) -> Result<(), MeshImportError> {
        for data in &record.data {
            let location = Location::Line(data.line);
            let (id_field, coordinate_fields) = data
                .fields
                .split_first()
                .ok_or_else(|| MeshImportError::malformed(location, "empty node record"))?;

            let id: FileId = parse_int(id_field, "node id", location)?;

            if coordinate_fields.len() > MAX_COORDINATES {
                warn!(
                    node = id,
                    line = data.line,
                    fields = coordinate_fields.len();
                    "Ignoring node fields beyond the third coordinate",
                );
            }

            let coordinates = coordinate_fields
                .iter()
                .take(MAX_COORDINATES)
                .map(|field| parse_float(field, location))
                .collect::<Result<Vec<f64>, _>>()?;

            ctx.nodes.insert(id, coordinates, location)?;
        }
        Ok(())
    }

    /// Data lines may wrap anywhere, so the record is read as one flat run of
    /// integers cut into `element id + node ids` chunks.
    fn parse_elements(
        record: &KeywordRecord,
        ctx: &mut ParseContext,
    ) -> Result<(), MeshImportError> {
        let type_name = record.parameter("TYPE").ok_or_else(|| {
            MeshImportError::malformed(record.location(), "*ELEMENT without TYPE parameter")
        })?;
        let decoded = element_type::decode(type_name)?;

        if let Some(dimension) = decoded.spatial_context {
            ctx.note_dimension(dimension);
        }
        let marker = ctx.markers.named(record.parameter("ELSET"));

        let fields: Vec<(&str, usize)> = record
            .data
            .iter()
            .flat_map(|data| data.fields.iter().map(move |field| (field.as_str(), data.line)))
            .collect();

        let chunk_len = decoded.node_count + 1;
        if fields.len() % chunk_len != 0 {
            let line = fields.last().map_or(record.line, |&(_, line)| line);
            return Err(MeshImportError::malformed(
                Location::Line(line),
                format!(
                    "{} fields in *ELEMENT, TYPE={} do not form whole records of {}",
                    fields.len(),
                    type_name,
                    chunk_len
                ),
            ));
        }

        let mut node_ids: Vec<FileId> = Vec::with_capacity(decoded.node_count);
        for chunk in fields.chunks_exact(chunk_len) {
            let location = Location::Line(chunk[0].1);
            let _element_id: u64 = parse_int(chunk[0].0, "element id", location)?;

            node_ids.clear();
            for &(field, line) in &chunk[1..] {
                node_ids.push(parse_int(field, "node id", Location::Line(line))?);
            }

            ctx.add_element(decoded.entry, &node_ids, marker, location)?;
        }

        debug!(
            element_type = type_name,
            elements = fields.len() / chunk_len;
            "Parsed Abaqus element block",
        );
        Ok(())
    }
}
