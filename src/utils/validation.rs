//! Startup validation of the conversion configuration.
//!
//! Everything here runs before the chain index is loaded and before any body
//! row is read, so a bad flag combination never produces partial output.

use thiserror::Error;

use crate::core::column::{ColumnError, ColumnRef};

/// Minimum number of `--input-cols` entries: the chromosome column plus one position
pub const MIN_INPUT_COLUMNS: usize = 2;

/// Configuration errors, all fatal before any row is processed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Chain expects TARGET QUERY [INDEX] (2 or 3 values), got {0}")]
    InvalidChainSpec(usize),

    #[error("At least {MIN_INPUT_COLUMNS} input columns are required (chromosome, then positions), got {0}")]
    TooFewColumns(usize),

    #[error(
        "{0} position columns requested without --drop: independently converted positions \
         could land on different chromosomes of the same row"
    )]
    MultiplePositionsWithoutDrop(usize),

    #[error("Chromosome column {0} is also listed as a position column")]
    ChromosomeAsPosition(usize),

    #[error("Position column {0} is listed more than once")]
    DuplicatePosition(usize),

    #[error("Delimiter must not be empty")]
    EmptyDelimiter,

    #[error(transparent)]
    Column(#[from] ColumnError),
}

/// Check the `TARGET QUERY [INDEX]` chain tokens.
///
/// # Errors
///
/// Returns `ConfigError::InvalidChainSpec` unless there are exactly 2 or 3 tokens.
pub fn validate_chain_tokens(tokens: &[String]) -> Result<(), ConfigError> {
    match tokens.len() {
        2 | 3 => Ok(()),
        n => Err(ConfigError::InvalidChainSpec(n)),
    }
}

/// Check the requested column list against the mismatch policy.
///
/// More than one position column is only allowed when rows whose positions
/// land on another chromosome are dropped; otherwise two positions of one row
/// could be rewritten onto different chromosomes with a single chromosome field.
///
/// # Errors
///
/// Returns `ConfigError::TooFewColumns` or `ConfigError::MultiplePositionsWithoutDrop`.
pub fn validate_input_columns(count: usize, drop_mismatch: bool) -> Result<(), ConfigError> {
    if count < MIN_INPUT_COLUMNS {
        return Err(ConfigError::TooFewColumns(count));
    }
    let positions = count - 1;
    if positions > 1 && !drop_mismatch {
        return Err(ConfigError::MultiplePositionsWithoutDrop(positions));
    }
    Ok(())
}

/// Without a header only column indices can be resolved.
///
/// # Errors
///
/// Returns `ConfigError::Column(ColumnError::NameWithoutHeader)` for the first
/// column given by name when `has_header` is false.
pub fn validate_header_mode(columns: &[ColumnRef], has_header: bool) -> Result<(), ConfigError> {
    if has_header {
        return Ok(());
    }
    match columns.iter().find(|c| matches!(c, ColumnRef::ByName(_))) {
        Some(named) => Err(ColumnError::NameWithoutHeader(named.to_string()).into()),
        None => Ok(()),
    }
}

/// Check resolved 1-based indices (chromosome first, then positions).
///
/// # Errors
///
/// Returns `ConfigError::ChromosomeAsPosition` if the chromosome column is also a
/// position column, or `ConfigError::DuplicatePosition` for a repeated position.
pub fn validate_resolved_columns(resolved: &[usize]) -> Result<(), ConfigError> {
    let Some((chrom, positions)) = resolved.split_first() else {
        return Err(ConfigError::TooFewColumns(0));
    };
    for (i, pos) in positions.iter().enumerate() {
        if pos == chrom {
            return Err(ConfigError::ChromosomeAsPosition(*pos));
        }
        if positions[..i].contains(pos) {
            return Err(ConfigError::DuplicatePosition(*pos));
        }
    }
    Ok(())
}
