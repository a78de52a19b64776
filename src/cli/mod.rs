//! Command-line interface for liftcols.
//!
//! Reads a delimited table on stdin, converts the requested position columns
//! from one genome build to another and writes the table to stdout. The run
//! summary and warnings go to stderr.
//!
//! ## Usage
//!
//! ```text
//! # Convert a GWAS summary table from hg19 to hg38 (chain in ~/.liftover)
//! liftcols -c hg19 hg38 -i CHR BP < gwas.txt > gwas.hg38.txt
//!
//! # Explicit chain file, comma separated, keep rows that fail as NA
//! liftcols -c hg19 hg38 ./hg19ToHg38.over.chain.gz -i 1 2 -s , -k < in.csv
//!
//! # BED-like input: 0-based, no header, start and end columns appended
//! liftcols -c hg19 hg38 -i 1 2 3 --drop -z --no-header -l < regions.bed
//!
//! # Summary as JSON
//! liftcols -c hg19 hg38 -i chr pos -f json < in.txt > out.txt 2> summary.json
//! ```

use clap::Parser;

pub mod convert;

#[derive(Parser)]
#[command(name = "liftcols")]
#[command(version)]
#[command(about = "Convert genomic positions in delimited tables between genome builds")]
#[command(
    long_about = "liftcols converts the position columns of a delimited table from one genome build to another using a UCSC chain file.\n\nThe table is read from stdin and written to stdout with:\n- Converted positions, in place or appended as new columns\n- A trailing chain_direction column holding the strand of the conversion\n- Rows that fail to convert dropped, or kept with NA values\n\nA summary of unmapped, ambiguous and cross-chromosome positions is printed to stderr."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: convert::ConvertArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Summary format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
