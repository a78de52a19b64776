//! Core data types for tabular coordinate conversion.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Header`], [`ColumnRef`]: Field names of the input stream and user column references
//! - [`ChromosomeToken`]: A chromosome label with its canonical lookup form
//! - [`CoordinateSystem`], [`Strand`]: Position numbering and orientation
//! - [`MappingResult`], [`OutcomeKind`]: Lookup answers and their classification
//!
//! ## Chromosome Naming
//!
//! Inputs and chain files use different naming conventions:
//!
//! | Source | Chromosome 1 | Mitochondrial | X |
//! |--------|--------------|---------------|---|
//! | UCSC   | chr1         | chrM          | chrX |
//! | NCBI   | 1            | MT            | X |
//! | PLINK  | 1            | 25            | 23 |
//!
//! All comparisons use the canonical form (`1`, `X`, `Y`, `MT`).
//!
//! [`Header`]: column::Header
//! [`ColumnRef`]: column::ColumnRef
//! [`ChromosomeToken`]: chromosome::ChromosomeToken
//! [`CoordinateSystem`]: types::CoordinateSystem
//! [`Strand`]: types::Strand
//! [`MappingResult`]: types::MappingResult
//! [`OutcomeKind`]: types::OutcomeKind

pub mod chromosome;
pub mod column;
pub mod types;
