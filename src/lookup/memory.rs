//! In-memory point lookup table

use std::collections::HashMap;

use crate::core::chromosome::canonicalize;
use crate::core::types::{MappedPosition, MappingResult};
use crate::lookup::CoordinateLookup;

/// Lookup backed by an explicit table of (chromosome, position) answers.
///
/// A chromosome registered with no positions is "known", so queries on it
/// report [`MappingResult::NotFound`] rather than
/// [`MappingResult::UnknownChromosome`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLookup {
    table: HashMap<String, HashMap<u64, Vec<MappedPosition>>>,
}

impl MemoryLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chromosome without any mapped positions
    pub fn add_chromosome(&mut self, chromosome: &str) -> &mut Self {
        self.table.entry(canonicalize(chromosome)).or_default();
        self
    }

    /// Add a candidate for a 0-based source position; repeated calls for the
    /// same position make it ambiguous.
    pub fn add(&mut self, chromosome: &str, position: u64, hit: MappedPosition) -> &mut Self {
        self.table
            .entry(canonicalize(chromosome))
            .or_default()
            .entry(position)
            .or_default()
            .push(hit);
        self
    }
}

impl CoordinateLookup for MemoryLookup {
    fn lookup(&self, chromosome: &str, position: u64) -> MappingResult {
        let Some(positions) = self.table.get(chromosome) else {
            return MappingResult::UnknownChromosome;
        };
        match positions.get(&position).map(Vec::as_slice) {
            None | Some([]) => MappingResult::NotFound,
            Some([hit]) => MappingResult::Found(hit.clone()),
            Some(hits) => MappingResult::Ambiguous(hits.len()),
        }
    }
}
