//! Coordinate lookup services.
//!
//! A lookup answers "where does this 0-based position on this canonical
//! chromosome land in the target build?" with a closed [`MappingResult`]:
//! the chromosome may be unknown to the index, nothing may cover the position,
//! several candidates may cover it, or exactly one does.
//!
//! Implementations:
//!
//! - [`ChainIndex`]: UCSC chain files (`hg19ToHg38.over.chain.gz` and friends)
//! - [`MemoryLookup`]: explicit point table, for tests and embedding
//!
//! ## Example
//!
//! ```rust
//! use liftcols::lookup::{ChainIndex, CoordinateLookup};
//! use liftcols::core::types::MappingResult;
//!
//! let chain = "chain 1000 chr1 1000 + 0 100 chr1 2000 + 500 600 1\n100\n";
//! let index = ChainIndex::parse(chain.as_bytes()).unwrap();
//!
//! match index.lookup("1", 10) {
//!     MappingResult::Found(hit) => assert_eq!(hit.position, 510),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod chain;
pub mod locate;
pub mod memory;

pub use chain::{ChainError, ChainIndex};
pub use locate::ChainSpec;
pub use memory::MemoryLookup;

use crate::core::types::MappingResult;

/// Point lookup from one build to another.
///
/// `chromosome` is always in canonical form (see
/// [`canonicalize`](crate::core::chromosome::canonicalize)) and `position` is 0-based.
/// Positions in the answer are 0-based as well.
pub trait CoordinateLookup {
    fn lookup(&self, chromosome: &str, position: u64) -> MappingResult;
}

impl<T: CoordinateLookup + ?Sized> CoordinateLookup for &T {
    fn lookup(&self, chromosome: &str, position: u64) -> MappingResult {
        (**self).lookup(chromosome, position)
    }
}

impl<T: CoordinateLookup + ?Sized> CoordinateLookup for Box<T> {
    fn lookup(&self, chromosome: &str, position: u64) -> MappingResult {
        (**self).lookup(chromosome, position)
    }
}
