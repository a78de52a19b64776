//! Parsing of delimited text streams.
//!
//! Input is a header line followed by body rows, split either on runs of
//! whitespace (the default) or on an explicit separator such as `,` or a tab.
//!
//! ## Example
//!
//! ```rust
//! use liftcols::parsing::delimited::Delimiter;
//!
//! let whitespace = Delimiter::parse(None).unwrap();
//! assert_eq!(whitespace.split("chr1   12345  A"), vec!["chr1", "12345", "A"]);
//!
//! let csv = Delimiter::parse(Some(",")).unwrap();
//! assert_eq!(csv.split("chr1,,A"), vec!["chr1", "", "A"]);
//! ```

pub mod delimited;
