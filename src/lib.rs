//! # liftcols
//!
//! A library for converting genomic positions in delimited tables between
//! genome builds (e.g. hg19 to hg38) using UCSC chain files.
//!
//! Summary statistics, association results and variant lists are usually
//! plain text tables with a chromosome column and one or more position
//! columns. `liftcols` converts those columns in a single streaming pass and
//! leaves every other field untouched.
//!
//! ## Features
//!
//! - **Chain lookups**: Point lookups over gzipped or plain UCSC chain files
//! - **Chromosome normalization**: `chr1`, `1`, `23`/`X`, `M`/`MT` are matched consistently
//! - **Column selection**: By header name or 1-based index, negative from the end
//! - **Outcome classification**: Unmapped, ambiguous, unknown, foreign-contig and
//!   cross-chromosome results are counted and reported
//! - **Row policies**: Drop or keep failed rows, overwrite or append columns
//!
//! ## Example
//!
//! ```rust
//! use liftcols::{ChainIndex, ColumnRef, ConvertOptions, StreamDriver};
//!
//! let chain = "chain 1000 chr1 1000 + 0 1000 chr1 2000 + 100 1100 1\n1000\n";
//! let index = ChainIndex::parse(chain.as_bytes()).unwrap();
//!
//! let options = ConvertOptions {
//!     columns: vec![ColumnRef::parse("CHR"), ColumnRef::parse("BP")],
//!     suffix: Some("hg38".to_string()),
//!     ..ConvertOptions::default()
//! };
//! let driver = StreamDriver::new(index, options).unwrap();
//!
//! let mut out = Vec::new();
//! driver.run("CHR BP P\n1 50 0.01\n".as_bytes(), &mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "CHR\tBP_hg38\tP\tchain_direction\n1\t150\t0.01\t+\n"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Column references, chromosome tokens and coordinate types
//! - [`lookup`]: Coordinate lookup trait and chain file index
//! - [`convert`]: Classification, row rewriting, statistics and the stream driver
//! - [`parsing`]: Delimited line splitting
//! - [`utils`]: Startup validation
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod convert;
pub mod core;
pub mod lookup;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use convert::{ConvertError, ConvertOptions, RunStatistics, StreamDriver};
pub use core::column::{ColumnRef, Header};
pub use core::types::*;
pub use lookup::{ChainIndex, ChainSpec, CoordinateLookup, MemoryLookup};
pub use utils::validation::ConfigError;
