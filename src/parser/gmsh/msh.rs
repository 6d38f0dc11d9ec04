// src/parser/gmsh/msh.rs

//! Gmsh MSH 2.x ASCII files.
//!
//! The file is a list of `$Name ... $EndName` sections. `$MeshFormat`,
//! `$PhysicalNames`, `$Nodes` and `$Elements` are read; every other section is
//! skipped. Sections are interpreted in that order whatever their position in
//! the file, so physical names may follow the elements that use them.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::builder::{FileId, MarkerToken, ParseContext};
use crate::error::{parse_float, parse_int, Feature, Location, MeshImportError};
use crate::options::ImportOptions;
use crate::structs_and_impls::{CanonicalMesh, MarkerId};
use crate::taxonomy::{self, ElementTypeEntry};

/// One `$Name ... $EndName` block with its trimmed, non-blank body lines.
#[derive(Debug)]
struct Section<'a> {
    name: &'a str,
    line: usize,
    body: Vec<(usize, &'a str)>,
    terminated: bool,
}

fn split_sections(content: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();
    let mut open: Option<Section<'_>> = None;

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(mut section) = open.take() {
            match trimmed.strip_prefix("$End") {
                Some(name) if name == section.name => {
                    section.terminated = true;
                    sections.push(section);
                    continue;
                }
                // A new header inside a section: the open one never ended.
                _ if trimmed.starts_with('$') && !trimmed.starts_with("$End") => {
                    sections.push(section);
                }
                _ => {
                    section.body.push((line, trimmed));
                    open = Some(section);
                    continue;
                }
            }
        }

        match trimmed.strip_prefix('$') {
            Some(name) if !name.starts_with("End") => {
                open = Some(Section {
                    name,
                    line,
                    body: Vec::new(),
                    terminated: false,
                });
            }
            _ => trace!(line = line; "Skipping text outside Gmsh sections"),
        }
    }

    sections.extend(open);
    sections
}

fn end_tag(name: &str) -> &'static str {
    match name {
        "MeshFormat" => "$EndMeshFormat",
        "PhysicalNames" => "$EndPhysicalNames",
        "Nodes" => "$EndNodes",
        "Elements" => "$EndElements",
        _ => "$End section",
    }
}

fn ensure_terminated(section: &Section<'_>) -> Result<(), MeshImportError> {
    if section.terminated {
        Ok(())
    } else {
        Err(MeshImportError::Truncated {
            section: end_tag(section.name),
            expected: 1,
            found: 0,
        })
    }
}

/// Split a counted section into its declared count and record lines, checking
/// that exactly `count` records follow.
fn counted_records<'s, 'a>(
    section: &'s Section<'a>,
    name: &'static str,
) -> Result<&'s [(usize, &'a str)], MeshImportError> {
    let (&(count_line, count_text), records) = section.body.split_first().ok_or(
        MeshImportError::Truncated {
            section: name,
            expected: 1,
            found: 0,
        },
    )?;
    let declared: usize = parse_int(count_text, "record count", Location::Line(count_line))?;

    if records.len() < declared {
        return Err(MeshImportError::Truncated {
            section: name,
            expected: declared,
            found: records.len(),
        });
    }
    if records.len() > declared {
        let (extra_line, _) = records[declared];
        return Err(MeshImportError::malformed(
            Location::Line(extra_line),
            format!("{} declares {} records but has more", name, declared),
        ));
    }
    Ok(records)
}

/// Physical group names keyed by (dimension, tag), with a tag-only fallback.
#[derive(Debug, Default)]
struct PhysicalNames {
    by_dimension: HashMap<(usize, MarkerId), String>,
    by_tag: HashMap<MarkerId, String>,
}

impl PhysicalNames {
    fn lookup(&self, dimension: usize, tag: MarkerId) -> Option<&str> {
        self.by_dimension
            .get(&(dimension, tag))
            .or_else(|| self.by_tag.get(&tag))
            .map(String::as_str)
    }
}

#[derive(Debug)]
struct ElementRecord {
    line: usize,
    nodes: Vec<FileId>,
    physical_tag: Option<MarkerId>,
}

#[derive(Debug)]
struct ElementGroup {
    entry: &'static ElementTypeEntry,
    records: Vec<ElementRecord>,
}

/// Parser for Gmsh `.msh` files.
pub struct MshParser;

impl MshParser {
    pub fn parse(content: &str, options: &ImportOptions) -> Result<CanonicalMesh, MeshImportError> {
        let sections = split_sections(content);
        let find = |name: &'static str| sections.iter().filter(move |section| section.name == name);

        for section in &sections {
            if !matches!(
                section.name,
                "MeshFormat" | "PhysicalNames" | "Nodes" | "Elements"
            ) {
                trace!(section = section.name, line = section.line; "Skipping Gmsh section");
                ensure_terminated(section)?;
            }
        }

        for section in find("MeshFormat") {
            Self::parse_mesh_format(section)?;
        }

        let mut physical_names: Option<PhysicalNames> = None;
        for section in find("PhysicalNames") {
            let names = physical_names.get_or_insert_with(PhysicalNames::default);
            Self::parse_physical_names(section, names)?;
        }

        let mut ctx = ParseContext::new();
        for section in find("Nodes") {
            Self::parse_nodes(section, &mut ctx)?;
        }

        let mut groups: IndexMap<u32, ElementGroup> = IndexMap::new();
        for section in find("Elements") {
            Self::parse_elements(section, &mut groups)?;
        }

        let mut element_dimension = 0;
        for group in groups.values() {
            let dimension = group.entry.kind.dimension();
            element_dimension = element_dimension.max(dimension);

            for record in &group.records {
                let marker = match (&physical_names, record.physical_tag) {
                    (Some(names), Some(tag)) => ctx.markers.named(names.lookup(dimension, tag)),
                    _ => MarkerToken::Unmarked,
                };
                ctx.add_element(group.entry, &record.nodes, marker, Location::Line(record.line))?;
            }
        }

        let dimension = element_dimension.max(ctx.nodes.significant_width()).max(1);
        ctx.note_dimension(dimension);

        debug!(
            nodes = ctx.nodes.len(),
            element_types = groups.len(),
            elements = ctx.elements.element_count(),
            physical_names = physical_names.is_some();
            "Parsed Gmsh mesh",
        );

        ctx.finish(options)
    }

    /// `version file-type data-size`
    fn parse_mesh_format(section: &Section<'_>) -> Result<(), MeshImportError> {
        let &(line, text) = section.body.first().ok_or(MeshImportError::Truncated {
            section: "$MeshFormat",
            expected: 1,
            found: 0,
        })?;
        let fields: Vec<&str> = text.split_whitespace().collect();
        let (version, file_type) = match fields.as_slice() {
            [version, file_type, ..] => (*version, *file_type),
            _ => {
                return Err(MeshImportError::malformed(
                    Location::Line(line),
                    "expected 'version file-type data-size'",
                ))
            }
        };

        if !version.starts_with('2') {
            return Err(MeshImportError::UnsupportedFeature(Feature::FormatVersion(
                version.to_string(),
            )));
        }
        if file_type != "0" {
            return Err(MeshImportError::UnsupportedFeature(Feature::BinaryEncoding));
        }
        ensure_terminated(section)
    }

    /// `dim tag "name"`; the name may contain spaces.
    fn parse_physical_names(
        section: &Section<'_>,
        names: &mut PhysicalNames,
    ) -> Result<(), MeshImportError> {
        for &(line, text) in counted_records(section, "$PhysicalNames")? {
            let location = Location::Line(line);
            let mut parts = text.splitn(3, char::is_whitespace);
            let (Some(dimension), Some(tag), Some(name)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(MeshImportError::malformed(location, "expected 'dim tag \"name\"'"));
            };

            let dimension: usize = parse_int(dimension, "physical dimension", location)?;
            let tag: MarkerId = parse_int(tag, "physical tag", location)?;
            let name = name.trim().trim_matches('"').to_string();

            names.by_tag.entry(tag).or_insert_with(|| name.clone());
            names.by_dimension.insert((dimension, tag), name);
        }
        ensure_terminated(section)
    }

    /// `id x y z`
    fn parse_nodes(section: &Section<'_>, ctx: &mut ParseContext) -> Result<(), MeshImportError> {
        for &(line, text) in counted_records(section, "$Nodes")? {
            let location = Location::Line(line);
            let fields: Vec<&str> = text.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(MeshImportError::malformed(
                    location,
                    format!("node record has {} fields, expected 4", fields.len()),
                ));
            }

            let id: FileId = parse_int(fields[0], "node id", location)?;
            let coordinates = fields[1..]
                .iter()
                .map(|field| parse_float(field, location))
                .collect::<Result<Vec<f64>, _>>()?;
            ctx.nodes.insert(id, coordinates, location)?;
        }
        ensure_terminated(section)
    }

    /// `id type ntags tag... node...`, grouped by type code in first-seen order.
    fn parse_elements(
        section: &Section<'_>,
        groups: &mut IndexMap<u32, ElementGroup>,
    ) -> Result<(), MeshImportError> {
        for &(line, text) in counted_records(section, "$Elements")? {
            let location = Location::Line(line);
            let fields: Vec<&str> = text.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(MeshImportError::malformed(
                    location,
                    "expected 'id type ntags tags... nodes...'",
                ));
            }

            let _id: u64 = parse_int(fields[0], "element id", location)?;
            let type_code: u32 = parse_int(fields[1], "element type", location)?;
            let tag_count: usize = parse_int(fields[2], "tag count", location)?;
            let entry = taxonomy::gmsh(type_code)?;

            let expected = 3 + tag_count + entry.origin_nodes;
            if fields.len() != expected {
                return Err(MeshImportError::malformed(
                    location,
                    format!(
                        "gmsh type {} needs {} nodes after {} tags, record has {} fields",
                        type_code,
                        entry.origin_nodes,
                        tag_count,
                        fields.len()
                    ),
                ));
            }

            let physical_tag = match tag_count {
                0 => None,
                _ => Some(parse_int::<MarkerId>(fields[3], "physical tag", location)?),
            };
            let nodes = fields[3 + tag_count..]
                .iter()
                .map(|field| parse_int::<FileId>(field, "node id", location))
                .collect::<Result<Vec<_>, _>>()?;

            groups
                .entry(type_code)
                .or_insert_with(|| ElementGroup {
                    entry,
                    records: Vec::new(),
                })
                .records
                .push(ElementRecord {
                    line,
                    nodes,
                    physical_tag,
                });
        }
        ensure_terminated(section)
    }
}
