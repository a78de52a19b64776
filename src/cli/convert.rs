use std::io::{self, BufWriter};

use anyhow::Context;
use clap::Args;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::convert::stream::{ConvertError, ConvertOptions, StreamDriver};
use crate::convert::transform::{OutputMode, RowPolicy};
use crate::convert::RunStatistics;
use crate::core::column::ColumnRef;
use crate::core::types::{CoordinateSystem, OutcomeKind};
use crate::lookup::{ChainIndex, ChainSpec};
use crate::parsing::delimited::Delimiter;
use crate::utils::validation::{validate_header_mode, validate_input_columns};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input build, output build and optionally a chain file or a directory
    /// holding `{TARGET}To{QUERY}.over.chain[.gz]` (default: ~/.liftover)
    #[arg(short = 'c', long = "chain", num_args = 1.., required = true, value_name = "TARGET QUERY [INDEX]")]
    pub chain: Vec<String>,

    /// Chromosome column followed by position columns, by header name or
    /// 1-based index (negative counts from the end)
    #[arg(
        short = 'i',
        long = "input-cols",
        num_args = 1..,
        required = true,
        allow_negative_numbers = true,
        value_name = "COLUMN"
    )]
    pub input_cols: Vec<String>,

    /// Append converted positions as new columns instead of overwriting
    #[arg(short = 'l', long)]
    pub add_last: bool,

    /// Keep the original names of converted columns
    #[arg(short = 'n', long)]
    pub no_suffix: bool,

    /// Keep rows whose positions fail to convert, writing NA
    #[arg(short = 'k', long = "keep-unmapped")]
    pub keep_unmapped: bool,

    /// Drop rows whose positions convert onto another chromosome
    #[arg(long)]
    pub drop: bool,

    /// Positions are 0-based (default: 1-based)
    #[arg(short = 'z', long)]
    pub zero_based: bool,

    /// The first line is data, not a header; columns must be given by index
    #[arg(long)]
    pub no_header: bool,

    /// Field separator (default: any run of whitespace, output tab-separated)
    #[arg(short = 's', long)]
    pub sep: Option<String>,

    /// Write chromosomes with a `chr` prefix
    #[arg(long)]
    pub add_chr: bool,
}

impl ConvertArgs {
    /// Build the conversion options; fails on flag combinations that can never run.
    fn options(&self, spec: &ChainSpec) -> anyhow::Result<ConvertOptions> {
        let delimiter = Delimiter::parse(self.sep.as_deref())?;
        validate_input_columns(self.input_cols.len(), self.drop)?;
        let columns: Vec<ColumnRef> = self.input_cols.iter().map(|c| ColumnRef::parse(c)).collect();
        validate_header_mode(&columns, !self.no_header)?;

        Ok(ConvertOptions {
            columns,
            delimiter,
            has_header: !self.no_header,
            policy: RowPolicy {
                mode: if self.add_last {
                    OutputMode::Append
                } else {
                    OutputMode::InPlace
                },
                keep_unmapped: self.keep_unmapped,
                drop_mismatch: self.drop,
                add_chr: self.add_chr,
            },
            suffix: (!self.no_suffix).then(|| spec.query.clone()),
            system: if self.zero_based {
                CoordinateSystem::ZeroBased
            } else {
                CoordinateSystem::OneBased
            },
        })
    }
}

pub fn run(args: ConvertArgs, format: OutputFormat) -> anyhow::Result<()> {
    // Configuration is checked before the chain is loaded or any input is read
    let spec = ChainSpec::from_tokens(&args.chain)?;
    let options = args.options(&spec)?;

    let path = spec.resolve()?;
    info!("Converting {spec} with {}", path.display());
    let index = ChainIndex::from_path(&path)
        .with_context(|| format!("Failed to load chain file {}", path.display()))?;

    debug!(
        "Chain index: {} chains, {} chromosomes",
        index.chain_count(),
        index.chromosomes().count()
    );

    let driver = StreamDriver::new(index, options)?;
    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    let stats = match driver.run(stdin, stdout) {
        Ok(stats) => stats,
        // Downstream closed the pipe (e.g. `| head`); nothing left to report
        Err(ConvertError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Text => print_text_summary(&stats),
        OutputFormat::Json => print_json_summary(&spec, &stats)?,
        OutputFormat::Tsv => print_tsv_summary(&stats),
    }

    Ok(())
}

fn print_text_summary(stats: &RunStatistics) {
    for kind in OutcomeKind::ALL {
        eprintln!("{} count: {}", kind.label().replace('_', " "), stats.count(kind));
    }
    eprintln!(
        "rows: {}, written: {}, skipped: {}",
        stats.rows, stats.written, stats.skipped
    );
}

fn print_json_summary(spec: &ChainSpec, stats: &RunStatistics) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "target": spec.target,
        "query": spec.query,
        "statistics": stats,
        "warnings": stats
            .warnings()
            .iter()
            .map(|w| serde_json::json!({
                "kind": w.kind.label(),
                "count": w.count,
                "rate": w.rate,
            }))
            .collect::<Vec<_>>(),
    });
    eprintln!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(stats: &RunStatistics) {
    eprintln!("kind\tcount");
    for kind in OutcomeKind::ALL {
        eprintln!("{}\t{}", kind.label(), stats.count(kind));
    }
    eprintln!("rows\t{}", stats.rows);
    eprintln!("written\t{}", stats.written);
    eprintln!("skipped\t{}", stats.skipped);
}
