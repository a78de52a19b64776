//! UCSC chain file backed lookup.
//!
//! A chain file is a sequence of chains, each a header line followed by
//! alignment block lines:
//!
//! ```text
//! chain score tName tSize tStrand tStart tEnd qName qSize qStrand qStart qEnd id
//! size dt dq
//! ...
//! size
//! ```
//!
//! Every aligned block becomes one segment keyed by the canonical target
//! chromosome. Segments are kept sorted by start so a point query is a binary
//! search plus a short backwards scan bounded by the longest segment.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::core::chromosome::canonicalize;
use crate::core::types::{MappedPosition, MappingResult, Strand};
use crate::lookup::CoordinateLookup;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Failed to read chain file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid chain header at line {line}: {msg}")]
    InvalidHeader { line: usize, msg: String },

    #[error("Invalid alignment block at line {line}: {msg}")]
    InvalidBlock { line: usize, msg: String },

    #[error("Alignment block at line {0} appears before any chain header")]
    BlockOutsideChain(usize),

    #[error("No chains found in chain file")]
    Empty,
}

/// One ungapped aligned block of a chain, in target coordinates
#[derive(Debug, Clone, Copy)]
struct Segment {
    target_start: u64,
    target_end: u64,
    query_start: u64,
    query_size: u64,
    query_strand: Strand,
    /// Index into `ChainIndex::query_names`
    query_name: usize,
}

impl Segment {
    fn lift(&self, position: u64) -> u64 {
        let q = self.query_start + (position - self.target_start);
        match self.query_strand {
            Strand::Plus => q,
            // Minus-strand query coordinates count from the end of the sequence
            Strand::Minus => self.query_size.saturating_sub(q + 1),
        }
    }
}

#[derive(Debug, Default)]
struct ContigSegments {
    segments: Vec<Segment>,
    longest: u64,
}

impl ContigSegments {
    fn covering(&self, position: u64) -> impl Iterator<Item = &Segment> {
        let end = self
            .segments
            .partition_point(|s| s.target_start <= position);
        self.segments[..end]
            .iter()
            .rev()
            .take_while(move |s| position - s.target_start < self.longest)
            .filter(move |s| position < s.target_end)
    }
}

/// Where the block lines of the current chain are placed
struct Cursor {
    key: String,
    target: u64,
    target_end: u64,
    query: u64,
    query_size: u64,
    query_strand: Strand,
    query_name: usize,
}

/// Point-lookup index built from a UCSC chain file.
#[derive(Debug, Default)]
pub struct ChainIndex {
    contigs: HashMap<String, ContigSegments>,
    query_names: Vec<String>,
    chain_count: usize,
}

impl ChainIndex {
    /// Load a chain file from disk; `.gz` files are decompressed on the fly.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Io` if the file cannot be read, or a parse error
    /// if the content is not a valid chain file.
    pub fn from_path(path: &Path) -> Result<Self, ChainError> {
        let file = File::open(path)?;
        let is_gz = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

        let index = if is_gz {
            Self::parse(BufReader::new(flate2::read::MultiGzDecoder::new(file)))?
        } else {
            Self::parse(BufReader::new(file))?
        };

        debug!(
            "Loaded {} chains over {} chromosomes from {}",
            index.chain_count,
            index.contigs.len(),
            path.display()
        );
        Ok(index)
    }

    /// Parse chain text from a reader.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::InvalidHeader`/`InvalidBlock` for malformed lines,
    /// `ChainError::BlockOutsideChain` for block lines before the first header,
    /// or `ChainError::Empty` if no chain is present.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ChainError> {
        let mut index = Self::default();
        let mut names: HashMap<String, usize> = HashMap::new();
        let mut cursor: Option<Cursor> = None;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with("chain") {
                let header = parse_header(line, line_num)?;
                let query_name = *names.entry(header.query_name.clone()).or_insert_with(|| {
                    index.query_names.push(header.query_name.clone());
                    index.query_names.len() - 1
                });
                index.chain_count += 1;
                cursor = Some(Cursor {
                    key: canonicalize(&header.target_name),
                    target: header.target_start,
                    target_end: header.target_end,
                    query: header.query_start,
                    query_size: header.query_size,
                    query_strand: header.query_strand,
                    query_name,
                });
                continue;
            }

            let Some(cur) = cursor.as_mut() else {
                return Err(ChainError::BlockOutsideChain(line_num));
            };
            let (size, target_gap, query_gap) = parse_block(line, line_num)?;

            let overflow = || ChainError::InvalidBlock {
                line: line_num,
                msg: "coordinates overflow".to_string(),
            };
            let block_end = cur.target.checked_add(size).ok_or_else(overflow)?;
            let query_end = cur.query.checked_add(size).ok_or_else(overflow)?;
            if block_end > cur.target_end {
                return Err(ChainError::InvalidBlock {
                    line: line_num,
                    msg: format!("block extends past chain end {}", cur.target_end),
                });
            }
            if size > 0 {
                index.push_segment(
                    &cur.key,
                    Segment {
                        target_start: cur.target,
                        target_end: block_end,
                        query_start: cur.query,
                        query_size: cur.query_size,
                        query_strand: cur.query_strand,
                        query_name: cur.query_name,
                    },
                );
            }
            cur.target = block_end.checked_add(target_gap).ok_or_else(overflow)?;
            cur.query = query_end.checked_add(query_gap).ok_or_else(overflow)?;
        }

        if index.chain_count == 0 {
            return Err(ChainError::Empty);
        }

        for contig in index.contigs.values_mut() {
            contig.segments.sort_by_key(|s| s.target_start);
        }
        Ok(index)
    }

    fn push_segment(&mut self, key: &str, segment: Segment) {
        let contig = self.contigs.entry(key.to_string()).or_default();
        contig.longest = contig
            .longest
            .max(segment.target_end - segment.target_start);
        contig.segments.push(segment);
    }

    /// Number of chains read
    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chain_count
    }

    /// Canonical names of the source chromosomes covered by the index
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }

    /// All candidate positions for a 0-based source position
    #[must_use]
    pub fn candidates(&self, chromosome: &str, position: u64) -> Vec<MappedPosition> {
        self.contigs
            .get(chromosome)
            .map(|contig| {
                contig
                    .covering(position)
                    .map(|s| {
                        MappedPosition::new(
                            self.query_names[s.query_name].clone(),
                            s.lift(position),
                            s.query_strand,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl CoordinateLookup for ChainIndex {
    fn lookup(&self, chromosome: &str, position: u64) -> MappingResult {
        if !self.contigs.contains_key(chromosome) {
            return MappingResult::UnknownChromosome;
        }
        let mut hits = self.candidates(chromosome, position);
        match hits.len() {
            0 => MappingResult::NotFound,
            1 => MappingResult::Found(hits.remove(0)),
            n => MappingResult::Ambiguous(n),
        }
    }
}

struct ChainHeader {
    target_name: String,
    target_start: u64,
    target_end: u64,
    query_name: String,
    query_size: u64,
    query_strand: Strand,
    query_start: u64,
}

fn parse_header(line: &str, line_num: usize) -> Result<ChainHeader, ChainError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 12 || parts[0] != "chain" {
        return Err(ChainError::InvalidHeader {
            line: line_num,
            msg: format!("expected 12+ fields, got {}", parts.len()),
        });
    }

    let number = |idx: usize, what: &str| -> Result<u64, ChainError> {
        parts[idx].parse::<u64>().map_err(|_| ChainError::InvalidHeader {
            line: line_num,
            msg: format!("invalid {what} '{}'", parts[idx]),
        })
    };
    let strand = |idx: usize| -> Result<Strand, ChainError> {
        Strand::parse(parts[idx]).ok_or_else(|| ChainError::InvalidHeader {
            line: line_num,
            msg: format!("invalid strand '{}'", parts[idx]),
        })
    };

    // Target coordinates are always given on the forward strand
    strand(4)?;
    let header = ChainHeader {
        target_name: parts[2].to_string(),
        target_start: number(5, "target start")?,
        target_end: number(6, "target end")?,
        query_name: parts[7].to_string(),
        query_size: number(8, "query size")?,
        query_strand: strand(9)?,
        query_start: number(10, "query start")?,
    };

    if header.target_start > header.target_end {
        return Err(ChainError::InvalidHeader {
            line: line_num,
            msg: format!(
                "target start {} after target end {}",
                header.target_start, header.target_end
            ),
        });
    }
    Ok(header)
}

fn parse_block(line: &str, line_num: usize) -> Result<(u64, u64, u64), ChainError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let number = |s: &str| -> Result<u64, ChainError> {
        s.parse::<u64>().map_err(|_| ChainError::InvalidBlock {
            line: line_num,
            msg: format!("invalid number '{s}'"),
        })
    };

    match parts.as_slice() {
        [size] => Ok((number(size)?, 0, 0)),
        [size, dt, dq] => Ok((number(size)?, number(dt)?, number(dq)?)),
        _ => Err(ChainError::InvalidBlock {
            line: line_num,
            msg: format!("expected 1 or 3 fields, got {}", parts.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_chain_data() -> &'static str {
        r"chain 1000 chr1 1000 + 0 1000 chr1 1100 + 0 1100 1
100	10	20
200	5	5
500

"
    }

    fn found(result: MappingResult) -> MappedPosition {
        match result {
            MappingResult::Found(hit) => hit,
            other => panic!("expected a single hit, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_chain_file() {
        let index = ChainIndex::parse(simple_chain_data().as_bytes()).unwrap();
        assert_eq!(index.chain_count(), 1);
        assert_eq!(index.chromosomes().collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn test_lift_position_in_first_block() {
        let index = ChainIndex::parse(simple_chain_data().as_bytes()).unwrap();
        let hit = found(index.lookup("1", 50));
        assert_eq!(hit.chromosome, "chr1");
        assert_eq!(hit.position, 50);
        assert_eq!(hit.strand, Strand::Plus);
    }

    #[test]
    fn test_lift_position_in_gap() {
        let index = ChainIndex::parse(simple_chain_data().as_bytes()).unwrap();
        // Target 100-109 is the gap after the first block
        assert_eq!(index.lookup("1", 105), MappingResult::NotFound);
    }

    #[test]
    fn test_lift_position_in_second_block() {
        let index = ChainIndex::parse(simple_chain_data().as_bytes()).unwrap();
        // Target: 0-99 (block1), 100-109 (gap), 110-309 (block2)
        // Query:  0-99 (block1), 100-119 (gap), 120-319 (block2)
        assert_eq!(found(index.lookup("1", 110)).position, 120);
        assert_eq!(found(index.lookup("1", 309)).position, 319);
    }

    #[test]
    fn test_unknown_chromosome_and_outside_chain() {
        let index = ChainIndex::parse(simple_chain_data().as_bytes()).unwrap();
        assert_eq!(index.lookup("2", 50), MappingResult::UnknownChromosome);
        assert_eq!(index.lookup("1", 5000), MappingResult::NotFound);
    }

    #[test]
    fn test_minus_strand_query() {
        let data = "chain 500 chr2 1000 + 100 200 chr5 1000 - 300 400 7\n100\n";
        let index = ChainIndex::parse(data.as_bytes()).unwrap();
        let hit = found(index.lookup("2", 100));
        // Query offset 300 on the minus strand is 1000 - 300 - 1 on the forward strand
        assert_eq!(hit.chromosome, "chr5");
        assert_eq!(hit.position, 699);
        assert_eq!(hit.strand, Strand::Minus);
    }

    #[test]
    fn test_overlapping_chains_are_ambiguous() {
        let data = r"chain 1000 chr1 1000 + 0 500 chr1 1000 + 0 500 1
500

chain 2000 chr1 1000 + 0 800 chr1_random 1000 + 0 800 2
800
";
        let index = ChainIndex::parse(data.as_bytes()).unwrap();
        assert_eq!(index.lookup("1", 100), MappingResult::Ambiguous(2));
        assert_eq!(found(index.lookup("1", 600)).chromosome, "chr1_random");
    }

    #[test]
    fn test_short_segment_after_long_one() {
        // A long early segment must still be found behind later short ones
        let data = r"chain 10 chr3 10000 + 0 5000 chr3 10000 + 0 5000 1
5000

chain 10 chr3 10000 + 4000 4010 chr7 10000 + 0 10 2
10
";
        let index = ChainIndex::parse(data.as_bytes()).unwrap();
        assert_eq!(index.lookup("3", 4005), MappingResult::Ambiguous(2));
        assert_eq!(found(index.lookup("3", 4500)).position, 4500);
    }

    #[test]
    fn test_target_names_are_canonicalized() {
        let data = "chain 1 chrX 100 + 0 10 chrX 100 + 0 10 1\n10\n";
        let index = ChainIndex::parse(data.as_bytes()).unwrap();
        assert!(matches!(index.lookup("X", 3), MappingResult::Found(_)));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            ChainIndex::parse("".as_bytes()),
            Err(ChainError::Empty)
        ));
        assert!(matches!(
            ChainIndex::parse("100\n".as_bytes()),
            Err(ChainError::BlockOutsideChain(1))
        ));
        assert!(matches!(
            ChainIndex::parse("chain 1 chr1 100 + 0 10\n".as_bytes()),
            Err(ChainError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            ChainIndex::parse("chain 1 chr1 100 + 0 10 chr1 100 * 0 10 1\n10\n".as_bytes()),
            Err(ChainError::InvalidHeader { .. })
        ));
        assert!(matches!(
            ChainIndex::parse("chain 1 chr1 100 + 0 10 chr1 100 + 0 10 1\n5 x 1\n".as_bytes()),
            Err(ChainError::InvalidBlock { line: 2, .. })
        ));
        assert!(matches!(
            ChainIndex::parse("chain 1 chr1 100 + 0 10 chr1 100 + 0 10 1\n50\n".as_bytes()),
            Err(ChainError::InvalidBlock { .. })
        ));
    }

    #[test]
    fn test_overflowing_block_rejected() {
        let max = u64::MAX;
        let start = max - 5;
        let chain = format!(
            "chain 1 chr1 {max} + {start} {max} chr1 {max} + 0 10 1\n3 {max} 0\n2\n"
        );
        assert!(matches!(
            ChainIndex::parse(chain.as_bytes()),
            Err(ChainError::InvalidBlock { line: 2, .. })
        ));

        let chain = format!("chain 1 chr1 100 + 0 10 chr1 {max} + {start} {max} 1\n10\n");
        assert!(matches!(
            ChainIndex::parse(chain.as_bytes()),
            Err(ChainError::InvalidBlock { line: 2, .. })
        ));
    }

    #[test]
    fn test_from_gzipped_path() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hg19ToHg38.over.chain.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(simple_chain_data().as_bytes()).unwrap();
        encoder.finish().unwrap();

        let index = ChainIndex::from_path(&path).unwrap();
        assert_eq!(found(index.lookup("1", 110)).position, 120);
    }
}
