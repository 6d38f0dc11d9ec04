// src/parser/comsol/mphtxt.rs

//! Comsol `.mphtxt` text meshes.
//!
//! The format is a sequence of lines whose meaning is given by a trailing
//! `# comment`: scalar lines such as `3 # sdim`, and header lines such as
//! `# Mesh vertex coordinates` followed by untagged data rows. Both the older
//! "mesh point" and the current "mesh vertex" spellings are understood.

use log::{debug, trace};

use crate::builder::{FileId, MarkerResolver, MarkerToken, ParseContext};
use crate::error::{parse_float, parse_int, Location, MeshImportError};
use crate::options::ImportOptions;
use crate::structs_and_impls::{CanonicalMesh, MarkerId};
use crate::taxonomy::{self, ElementTypeEntry};

const COORDINATES_SECTION: &str = "Mesh vertex coordinates";
const ELEMENTS_SECTION: &str = "Elements";

/// One non-blank line split at the first `#`.
#[derive(Debug, Clone, PartialEq)]
struct MphLine<'a> {
    line: usize,
    values: Vec<&'a str>,
    tag: Option<&'a str>,
}

impl MphLine<'_> {
    fn location(&self) -> Location {
        Location::Line(self.line)
    }
}

fn split_lines(content: &str) -> Vec<MphLine<'_>> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let (values, tag) = match raw.split_once('#') {
                Some((values, comment)) => (values, Some(comment.trim())),
                None => (raw, None),
            };
            let values: Vec<&str> = values.split_whitespace().collect();
            if values.is_empty() && tag.is_none() {
                return None;
            }
            Some(MphLine {
                line: index + 1,
                values,
                tag,
            })
        })
        .collect()
}

struct LineCursor<'a> {
    lines: Vec<MphLine<'a>>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str) -> Self {
        LineCursor {
            lines: split_lines(content),
            pos: 0,
        }
    }

    fn next_line(&mut self) -> Option<&MphLine<'a>> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some(line)
    }

    /// Take exactly `count` untagged data rows.
    fn take_rows(
        &mut self,
        count: usize,
        section: &'static str,
    ) -> Result<&[MphLine<'a>], MeshImportError> {
        let start = self.pos;
        let available = self.lines[start..]
            .iter()
            .take_while(|line| line.tag.is_none())
            .count();

        if available < count {
            return Err(MeshImportError::Truncated {
                section,
                expected: count,
                found: available,
            });
        }
        if available > count {
            let extra = &self.lines[start + count];
            return Err(MeshImportError::malformed(
                extra.location(),
                format!("{} has more than the declared {} rows", section, count),
            ));
        }

        self.pos += count;
        Ok(&self.lines[start..start + count])
    }
}

/// First value of a scalar line such as `3 # sdim`.
fn parse_first_number(line: &MphLine<'_>, what: &str) -> Result<usize, MeshImportError> {
    let value = line.values.first().ok_or_else(|| {
        MeshImportError::malformed(line.location(), format!("missing value for {}", what))
    })?;
    parse_int(value, what, line.location())
}

fn require(value: Option<usize>, what: &str, location: Location) -> Result<usize, MeshImportError> {
    value.ok_or_else(|| MeshImportError::malformed(location, format!("{} not declared", what)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerSource {
    Domains,
    GeometricEntities,
}

impl MarkerSource {
    fn section(self) -> &'static str {
        match self {
            MarkerSource::Domains => "Domains",
            MarkerSource::GeometricEntities => "Geometric entity indices",
        }
    }
}

/// One `# Type #k` block while it is being read.
#[derive(Debug)]
struct TypeBlock {
    header: Location,
    entry: Option<&'static ElementTypeEntry>,
    element_count: Option<usize>,
    connectivity: Option<Vec<FileId>>,
    marker_count: Option<usize>,
    markers: Option<(MarkerSource, Vec<MarkerToken>)>,
}

impl TypeBlock {
    fn new(header: Location) -> Self {
        TypeBlock {
            header,
            entry: None,
            element_count: None,
            connectivity: None,
            marker_count: None,
            markers: None,
        }
    }

    fn require_entry(&self, location: Location) -> Result<&'static ElementTypeEntry, MeshImportError> {
        self.entry
            .ok_or_else(|| MeshImportError::malformed(location, "element data before type name"))
    }

    /// Hand the block to the builder. A block without markers is unmarked.
    fn flush(self, ctx: &mut ParseContext) -> Result<(), MeshImportError> {
        let entry = self.require_entry(self.header)?;
        let element_count = self.element_count.unwrap_or(0);
        let connectivity = match self.connectivity {
            Some(connectivity) => connectivity,
            None if element_count == 0 => Vec::new(),
            None => {
                return Err(MeshImportError::malformed(
                    self.header,
                    format!("type block declares {} elements but has no Elements section", element_count),
                ))
            }
        };
        let markers = match self.markers {
            Some((_, markers)) => markers,
            None => vec![MarkerToken::Unmarked; element_count],
        };

        ctx.add_elements(entry, &connectivity, &markers, self.header)
    }
}

/// Parser for Comsol `.mphtxt` text meshes.
pub struct MphtxtParser;

impl MphtxtParser {
    pub fn parse(content: &str, options: &ImportOptions) -> Result<CanonicalMesh, MeshImportError> {
        let mut cursor = LineCursor::new(content);
        let mut ctx = ParseContext::new();

        let mut node_count: Option<usize> = None;
        let mut lowest_index: FileId = 0;
        let mut current: Option<TypeBlock> = None;
        let mut type_count = 0usize;

        while let Some(line) = cursor.next_line() {
            let line = line.clone();
            let Some(tag) = line.tag else {
                trace!(line = line.line; "Skipping untagged Comsol row");
                continue;
            };
            let location = line.location();

            match tag {
                "sdim" => {
                    ctx.note_dimension(parse_first_number(&line, "sdim")?);
                }
                "number of mesh points" | "number of mesh vertices" => {
                    node_count = Some(parse_first_number(&line, "number of mesh vertices")?);
                }
                "lowest mesh point index" | "lowest mesh vertex index" => {
                    lowest_index = parse_first_number(&line, "lowest mesh vertex index")? as FileId;
                }
                "Mesh point coordinates" | "Mesh vertex coordinates" => {
                    let count = require(node_count, "number of mesh vertices", location)?;
                    let rows = cursor.take_rows(count, COORDINATES_SECTION)?;
                    Self::parse_nodes(rows, lowest_index, &mut ctx)?;
                }
                tag if tag.starts_with("Type #") => {
                    if let Some(block) = current.take() {
                        block.flush(&mut ctx)?;
                    }
                    current = Some(TypeBlock::new(location));
                    type_count += 1;
                }
                "type name" => {
                    let block = Self::current_block(&mut current, location)?;
                    let name = line.values.get(1).ok_or_else(|| {
                        MeshImportError::malformed(location, "type name line has no name")
                    })?;
                    block.entry = Some(taxonomy::comsol(name)?);
                }
                "number of nodes per element" | "number of vertices per element" => {
                    let block = Self::current_block(&mut current, location)?;
                    let declared = parse_first_number(&line, "number of vertices per element")?;
                    let entry = block.require_entry(location)?;
                    if declared != entry.origin_nodes {
                        return Err(MeshImportError::malformed(
                            location,
                            format!(
                                "{:?} elements have {} nodes, file declares {}",
                                entry.kind, entry.origin_nodes, declared
                            ),
                        ));
                    }
                }
                "number of elements" => {
                    let block = Self::current_block(&mut current, location)?;
                    block.element_count = Some(parse_first_number(&line, "number of elements")?);
                }
                "Elements" => {
                    let block = Self::current_block(&mut current, location)?;
                    let entry = block.require_entry(location)?;
                    let count = require(block.element_count, "number of elements", location)?;
                    let rows = cursor.take_rows(count, ELEMENTS_SECTION)?;
                    block.connectivity = Some(Self::parse_connectivity(rows, entry.origin_nodes)?);
                }
                "number of domains" | "number of geometric entity indices" => {
                    let block = Self::current_block(&mut current, location)?;
                    block.marker_count = Some(parse_first_number(&line, "number of marker values")?);
                }
                "Domains" | "Geometric entity indices" => {
                    let source = if tag == "Domains" {
                        MarkerSource::Domains
                    } else {
                        MarkerSource::GeometricEntities
                    };
                    let block = Self::current_block(&mut current, location)?;
                    if let Some((existing, _)) = &block.markers {
                        return Err(MeshImportError::malformed(
                            location,
                            format!(
                                "type block has both {} and {}",
                                existing.section(),
                                source.section()
                            ),
                        ));
                    }

                    let count = require(block.marker_count, "number of marker values", location)?;
                    let element_count = block.element_count.unwrap_or(0);
                    if count != element_count {
                        return Err(MeshImportError::malformed(
                            location,
                            format!("{} markers for {} elements", count, element_count),
                        ));
                    }

                    let rows = cursor.take_rows(count, source.section())?;
                    let markers = rows
                        .iter()
                        .map(|row| {
                            let value = row.values.first().ok_or_else(|| {
                                MeshImportError::malformed(row.location(), "missing marker value")
                            })?;
                            let id: MarkerId = parse_int(value, "marker", row.location())?;
                            Ok::<_, MeshImportError>(MarkerResolver::integer(Some(id)))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    block.markers = Some((source, markers));
                }
                "number of up/down pairs" | "Up/down" => {
                    trace!(line = line.line; "Skipping Comsol up/down pairs");
                }
                other => {
                    trace!(tag = other, line = line.line; "Skipping Comsol tag");
                }
            }
        }

        if let Some(block) = current.take() {
            block.flush(&mut ctx)?;
        }

        debug!(
            nodes = ctx.nodes.len(),
            element_types = type_count,
            elements = ctx.elements.element_count();
            "Parsed Comsol mesh",
        );

        ctx.finish(options)
    }

    fn current_block(
        current: &mut Option<TypeBlock>,
        location: Location,
    ) -> Result<&mut TypeBlock, MeshImportError> {
        current
            .as_mut()
            .ok_or_else(|| MeshImportError::malformed(location, "element data outside a type block"))
    }

    /// Node ids run from the lowest mesh vertex index upward in row order.
    fn parse_nodes(
        rows: &[MphLine<'_>],
        lowest_index: FileId,
        ctx: &mut ParseContext,
    ) -> Result<(), MeshImportError> {
        let declared = ctx.dimension_hint();
        for (row, line) in rows.iter().enumerate() {
            let location = line.location();
            if let Some(dimension) = declared {
                if line.values.len() != dimension {
                    return Err(MeshImportError::malformed(
                        location,
                        format!(
                            "node has {} coordinates, expected {}",
                            line.values.len(),
                            dimension
                        ),
                    ));
                }
            }
            let coordinates = line
                .values
                .iter()
                .map(|value| parse_float(value, location))
                .collect::<Result<Vec<f64>, _>>()?;
            ctx.nodes.insert(lowest_index + row as FileId, coordinates, location)?;
        }
        Ok(())
    }

    fn parse_connectivity(
        rows: &[MphLine<'_>],
        nodes_per_element: usize,
    ) -> Result<Vec<FileId>, MeshImportError> {
        let mut connectivity = Vec::with_capacity(rows.len() * nodes_per_element);
        for line in rows {
            let location = line.location();
            if line.values.len() != nodes_per_element {
                return Err(MeshImportError::malformed(
                    location,
                    format!(
                        "element has {} nodes, expected {}",
                        line.values.len(),
                        nodes_per_element
                    ),
                ));
            }
            for value in &line.values {
                connectivity.push(parse_int(value, "node index", location)?);
            }
        }
        Ok(connectivity)
    }
}
