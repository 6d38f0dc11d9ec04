// src/parser/abaqus/element_type.rs

//! Decoding of Abaqus element type names such as `C3D20R`, `CPS4`, `S8R5`, `B32`.
//!
//! A name is peeled in two steps. The family prefix is matched against an
//! ordered rule list (first match wins), which fixes the topology class and
//! the spatial context the family lives in. The node count is then read from
//! the characters after the prefix; trailing letters (`R`, `H`, `T`, ...) are
//! formulation flags and carry no topology.

use crate::error::MeshImportError;
use crate::taxonomy::{self, AbaqusTopology, ElementTypeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeCount {
    /// The whole leading digit run.
    Digits,
    /// Only the first digit (`STRI65` has 6 nodes).
    FirstDigit,
    /// Beam interpolation digit: 1 and 3 are two-node beams, 2 is three-node.
    BeamOrder,
    Fixed(usize),
}

#[derive(Debug, Clone, Copy)]
struct PrefixRule {
    prefix: &'static str,
    topology: AbaqusTopology,
    spatial_context: Option<usize>,
    node_count: NodeCount,
}

const fn rule(
    prefix: &'static str,
    topology: AbaqusTopology,
    spatial_context: Option<usize>,
    node_count: NodeCount,
) -> PrefixRule {
    PrefixRule {
        prefix,
        topology,
        spatial_context,
        node_count,
    }
}

use AbaqusTopology::{Curve, Node, Solid, Surface};
use NodeCount::{BeamOrder, Digits, FirstDigit, Fixed};

// Longer prefixes sharing a start with shorter ones must come first.
const PREFIX_RULES: &[PrefixRule] = &[
    rule("DCAX", Surface, Some(2), Digits),
    rule("DC1D", Curve, None, Digits),
    rule("DC2D", Surface, Some(2), Digits),
    rule("DC3D", Solid, Some(3), Digits),
    rule("CPEG", Surface, Some(2), Digits),
    rule("CPE", Surface, Some(2), Digits),
    rule("CPS", Surface, Some(2), Digits),
    rule("CGAX", Surface, Some(2), Digits),
    rule("CAX", Surface, Some(2), Digits),
    rule("C3D", Solid, Some(3), Digits),
    rule("STRI", Surface, Some(3), FirstDigit),
    rule("SFM3D", Surface, Some(3), Digits),
    rule("SC", Solid, Some(3), Digits),
    rule("S", Surface, Some(3), Digits),
    rule("M3D", Surface, Some(3), Digits),
    rule("RB3D", Curve, Some(3), Digits),
    rule("RB2D", Curve, Some(2), Digits),
    rule("R3D", Surface, Some(3), Digits),
    rule("R2D", Curve, Some(2), Digits),
    rule("T3D", Curve, Some(3), Digits),
    rule("T2D", Curve, Some(2), Digits),
    rule("B3", Curve, Some(3), BeamOrder),
    rule("B2", Curve, Some(2), BeamOrder),
    rule("MASS", Node, None, Fixed(1)),
    rule("ROTARYI", Node, None, Fixed(1)),
];

/// Result of peeling a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedType {
    pub topology: AbaqusTopology,
    /// Spatial dimension the family implies, if any.
    pub spatial_context: Option<usize>,
    pub node_count: usize,
    pub entry: &'static ElementTypeEntry,
}

pub fn decode(type_name: &str) -> Result<DecodedType, MeshImportError> {
    let unsupported = || MeshImportError::UnsupportedElementType(type_name.to_string());

    let rule = PREFIX_RULES
        .iter()
        .find(|rule| type_name.starts_with(rule.prefix))
        .ok_or_else(unsupported)?;

    let rest = &type_name[rule.prefix.len()..];
    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    let node_count = match rule.node_count {
        Fixed(count) => count,
        Digits => digits.parse::<usize>().map_err(|_| unsupported())?,
        FirstDigit => first_digit(digits).ok_or_else(unsupported)?,
        BeamOrder => match first_digit(digits) {
            Some(1) | Some(3) => 2,
            Some(2) => 3,
            _ => return Err(unsupported()),
        },
    };

    let entry = taxonomy::abaqus(rule.topology, node_count, type_name)?;

    Ok(DecodedType {
        topology: rule.topology,
        spatial_context: rule.spatial_context,
        node_count,
        entry,
    })
}

fn first_digit(digits: &str) -> Option<usize> {
    digits
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as usize)
}
