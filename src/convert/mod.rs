//! Row-by-row coordinate conversion.
//!
//! A conversion run reads a header line, resolves the chromosome and position
//! columns, then streams every body row through three stages:
//!
//! 1. [`classify`]: look each position up and decide its [`Outcome`]
//! 2. [`transform`]: decide whether the row is kept and rewrite its fields
//! 3. [`stats`]: count outcomes for the end-of-run report
//!
//! [`stream::StreamDriver`] ties the stages together over any `BufRead`/`Write` pair.
//!
//! ## Example
//!
//! ```rust
//! use liftcols::convert::{ConvertOptions, StreamDriver};
//! use liftcols::core::column::ColumnRef;
//! use liftcols::core::types::{MappedPosition, Strand};
//! use liftcols::lookup::MemoryLookup;
//!
//! let mut lookup = MemoryLookup::new();
//! lookup.add("1", 99, MappedPosition::new("chr1", 499, Strand::Plus));
//!
//! let options = ConvertOptions {
//!     columns: vec![ColumnRef::parse("chr"), ColumnRef::parse("pos")],
//!     ..ConvertOptions::default()
//! };
//! let driver = StreamDriver::new(lookup, options).unwrap();
//!
//! let mut out = Vec::new();
//! let stats = driver.run("chr pos\n1 100\n".as_bytes(), &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "chr\tpos\tchain_direction\n1\t500\t+\n");
//! assert_eq!(stats.written, 1);
//! ```

pub mod classify;
pub mod stats;
pub mod stream;
pub mod transform;

pub use classify::{Classifier, Converted, Outcome};
pub use stats::{RateWarning, RunStatistics};
pub use stream::{ConvertError, ConvertOptions, StreamDriver};
pub use transform::{Disposition, OutputMode, RowPolicy, Transformer};
