// src/builder/marker.rs

use indexmap::IndexSet;

use crate::structs_and_impls::{MarkerId, UNMARKED};

/// A marker as seen while parsing, before named groups get their final ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerToken {
    Unmarked,
    /// Integer marker taken verbatim from the file.
    Id(MarkerId),
    /// Slot of a group name in first-seen order.
    Name(usize),
}

/// Assigns marker ids for one parse. Named groups are numbered `1..=k` in
/// sorted name order once all names are known.
#[derive(Debug, Default)]
pub struct MarkerResolver {
    names: IndexSet<String>,
}

impl MarkerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(&mut self, name: Option<&str>) -> MarkerToken {
        match name {
            Some(name) if !name.is_empty() => {
                let (slot, _) = self.names.insert_full(name.to_string());
                MarkerToken::Name(slot)
            }
            _ => MarkerToken::Unmarked,
        }
    }

    pub fn integer(value: Option<MarkerId>) -> MarkerToken {
        match value {
            Some(id) if id != UNMARKED => MarkerToken::Id(id),
            _ => MarkerToken::Unmarked,
        }
    }

    pub fn finish(self) -> MarkerTable {
        let mut sorted: Vec<(usize, String)> = self.names.into_iter().enumerate().collect();
        sorted.sort_by(|(_, a), (_, b)| a.cmp(b));

        let mut slot_ids = vec![UNMARKED; sorted.len()];
        let mut names = Vec::with_capacity(sorted.len());
        for (rank, (slot, name)) in sorted.into_iter().enumerate() {
            slot_ids[slot] = rank as MarkerId + 1;
            names.push(name);
        }

        MarkerTable { slot_ids, names }
    }
}

/// Final name-to-id assignment of one parse.
#[derive(Debug, Clone, Default)]
pub struct MarkerTable {
    slot_ids: Vec<MarkerId>,
    names: Vec<String>,
}

impl MarkerTable {
    pub fn resolve(&self, token: MarkerToken) -> MarkerId {
        match token {
            MarkerToken::Unmarked => UNMARKED,
            MarkerToken::Id(id) => id,
            MarkerToken::Name(slot) => self.slot_ids.get(slot).copied().unwrap_or(UNMARKED),
        }
    }

    /// Group names sorted; the name at position `i` has marker id `i + 1`.
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}
