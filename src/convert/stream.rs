use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::convert::classify::{Classifier, Outcome};
use crate::convert::stats::{RunStatistics, MAX_FOREIGN_CHROMOSOMES};
use crate::convert::transform::{Disposition, Layout, RowPolicy, Transformer};
use crate::core::chromosome::ChromosomeToken;
use crate::core::column::{ColumnRef, Header};
use crate::core::types::CoordinateSystem;
use crate::lookup::CoordinateLookup;
use crate::parsing::delimited::Delimiter;
use crate::utils::validation::{
    validate_header_mode, validate_input_columns, validate_resolved_columns, ConfigError,
};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Malformed row at line {line}: {msg}")]
    MalformedRow { line: usize, msg: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a conversion run needs besides the lookup itself
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Chromosome column first, then the position columns
    pub columns: Vec<ColumnRef>,
    pub delimiter: Delimiter,
    /// False when the first line is already data
    pub has_header: bool,
    pub policy: RowPolicy,
    /// Appended to renamed position columns as `{name}_{suffix}`
    pub suffix: Option<String>,
    pub system: CoordinateSystem,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            delimiter: Delimiter::Whitespace,
            has_header: true,
            policy: RowPolicy::default(),
            suffix: None,
            system: CoordinateSystem::OneBased,
        }
    }
}

/// Per-run state once the header has been resolved
#[derive(Debug)]
struct Stream {
    transformer: Transformer,
    /// Number of fields every body row must have
    width: usize,
}

/// `AwaitingHeader` consumes the first line, `Streaming` every line after it;
/// the run is done when input is exhausted.
#[derive(Debug)]
enum State {
    AwaitingHeader,
    Streaming(Stream),
}

/// Single-pass driver: header first, then one row at a time in input order.
pub struct StreamDriver<L> {
    classifier: Classifier<L>,
    options: ConvertOptions,
}

impl<L: CoordinateLookup> StreamDriver<L> {
    /// Create a driver, rejecting invalid column/policy combinations up front.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooFewColumns`,
    /// `ConfigError::MultiplePositionsWithoutDrop`, or `ConfigError::Column` for a
    /// named column without a header.
    pub fn new(lookup: L, options: ConvertOptions) -> Result<Self, ConfigError> {
        validate_input_columns(options.columns.len(), options.policy.drop_mismatch)?;
        validate_header_mode(&options.columns, options.has_header)?;
        Ok(Self {
            classifier: Classifier::new(lookup, options.system),
            options,
        })
    }

    /// Convert `input` into `output`, returning the run's statistics.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::Config` if the requested columns cannot be
    /// resolved against the header, `ConvertError::MalformedRow` for a row whose
    /// shape or positions do not match the header, or `ConvertError::Io`.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<RunStatistics, ConvertError> {
        let mut stats = RunStatistics::new();
        let mut state = State::AwaitingHeader;

        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let line_num = i + 1;
            if self.options.delimiter.is_blank(&line) {
                continue;
            }
            let fields = self.options.delimiter.split(&line);

            state = match state {
                State::AwaitingHeader => {
                    let stream = self.begin(&fields, &mut output)?;
                    if !self.options.has_header {
                        self.convert_row(&stream, &fields, line_num, &mut stats, &mut output)?;
                    }
                    State::Streaming(stream)
                }
                State::Streaming(stream) => {
                    self.convert_row(&stream, &fields, line_num, &mut stats, &mut output)?;
                    State::Streaming(stream)
                }
            };
        }

        if matches!(state, State::AwaitingHeader) {
            warn!("Input is empty, nothing to convert");
        }
        output.flush()?;
        self.finish(&stats);
        Ok(stats)
    }

    /// Resolve columns against the first line and write the output header.
    fn begin<W: Write>(&self, fields: &[&str], output: &mut W) -> Result<Stream, ConvertError> {
        let header = if self.options.has_header {
            Header::new(fields.iter().map(ToString::to_string).collect())
        } else {
            Header::synthetic(fields.len())
        };

        let resolved = header
            .resolve_all(&self.options.columns)
            .map_err(ConfigError::from)?;
        validate_resolved_columns(&resolved)?;
        let layout = Layout::from_resolved(&resolved)
            .ok_or(ConfigError::TooFewColumns(resolved.len()))?;
        debug!(
            "Chromosome column {}, position columns {:?}",
            resolved[0],
            &resolved[1..]
        );

        let transformer = Transformer::new(layout, self.options.policy);
        if self.options.has_header {
            let names = transformer.output_header(&header, self.options.suffix.as_deref());
            writeln!(output, "{}", names.join(self.options.delimiter.output()))?;
        }

        Ok(Stream {
            transformer,
            width: header.len(),
        })
    }

    fn convert_row<W: Write>(
        &self,
        stream: &Stream,
        fields: &[&str],
        line_num: usize,
        stats: &mut RunStatistics,
        output: &mut W,
    ) -> Result<(), ConvertError> {
        if fields.len() != stream.width {
            return Err(ConvertError::MalformedRow {
                line: line_num,
                msg: format!("expected {} fields, found {}", stream.width, fields.len()),
            });
        }

        let layout = stream.transformer.layout();
        let chromosome = ChromosomeToken::new(fields[layout.chromosome]);

        // Every column is classified, even after one fails, so the counters see all of them
        let mut outcomes: Vec<Outcome> = Vec::with_capacity(layout.positions.len());
        for &col in &layout.positions {
            let raw = fields[col];
            let position: u64 = raw.trim().parse().map_err(|_| ConvertError::MalformedRow {
                line: line_num,
                msg: format!("non-numeric position '{raw}' in column {}", col + 1),
            })?;
            let outcome = self
                .classifier
                .classify(&chromosome, position)
                .map_err(|e| ConvertError::MalformedRow {
                    line: line_num,
                    msg: e.to_string(),
                })?;
            outcomes.push(outcome);
        }

        let mut row: Vec<String> = fields.iter().map(ToString::to_string).collect();
        let disposition = stream.transformer.apply(&mut row, &chromosome, &outcomes);
        stats.record(&outcomes, disposition);

        match disposition {
            Disposition::Keep => {
                writeln!(output, "{}", row.join(self.options.delimiter.output()))?;
            }
            Disposition::Skip(reason) => {
                trace!("Skipping line {line_num} ({reason:?})");
            }
        }
        Ok(())
    }

    /// End-of-run diagnostics
    fn finish(&self, stats: &RunStatistics) {
        for warning in stats.warnings() {
            warn!("{warning}");
        }

        if !stats.foreign_chromosomes.is_empty() {
            let names: Vec<&str> = stats
                .foreign_chromosomes
                .iter()
                .map(String::as_str)
                .collect();
            warn!(
                "Rows dropped because positions converted to non-chromosome contigs (up to {MAX_FOREIGN_CHROMOSOMES} shown): {}",
                names.join(", ")
            );
        }

        if stats.not_same_chromosome > 0 && !self.options.policy.drop_mismatch {
            warn!(
                "{} rows converted onto a different chromosome and had their chromosome column rewritten; \
                 if the input holds a single chromosome, filter the output or rerun with --drop",
                stats.not_same_chromosome
            );
        }

        info!(
            "Processed {} rows: {} written, {} skipped",
            stats.rows, stats.written, stats.skipped
        );
    }
}
