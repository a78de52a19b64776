use crate::convert::classify::Outcome;
use crate::core::chromosome::{with_chr_prefix, ChromosomeToken};
use crate::core::column::Header;

/// Value written for coordinates that could not be converted
pub const NA: &str = "NA";

/// Name of the appended column holding the strand of the first converted position
pub const STRAND_COLUMN: &str = "chain_direction";

/// Where converted positions are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Overwrite the original position fields
    #[default]
    InPlace,
    /// Keep the original fields and append the converted positions
    Append,
}

/// Row keep/drop and formatting policy
#[derive(Debug, Clone, Copy, Default)]
pub struct RowPolicy {
    pub mode: OutputMode,
    /// Keep rows with unmapped, ambiguous or unknown-chromosome coordinates (written as `NA`)
    pub keep_unmapped: bool,
    /// Drop rows whose position converted onto a different chromosome
    pub drop_mismatch: bool,
    /// Write the chromosome column with a `chr` prefix
    pub add_chr: bool,
}

/// Resolved 0-based field indices of the converted columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub chromosome: usize,
    pub positions: Vec<usize>,
}

impl Layout {
    /// Build from 1-based resolved indices, chromosome first.
    ///
    /// Returns `None` if fewer than two indices are given or any index is zero.
    #[must_use]
    pub fn from_resolved(resolved: &[usize]) -> Option<Self> {
        if resolved.len() < 2 || resolved.contains(&0) {
            return None;
        }
        Some(Self {
            chromosome: resolved[0] - 1,
            positions: resolved[1..].iter().map(|i| i - 1).collect(),
        })
    }
}

/// Why a row was left out of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ForeignChromosome,
    CrossChromosomeMismatch,
    /// Unmapped, ambiguous or unknown chromosome
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Skip(SkipReason),
}

/// Applies the outcomes of a row's conversions to its fields.
#[derive(Debug, Clone)]
pub struct Transformer {
    layout: Layout,
    policy: RowPolicy,
}

impl Transformer {
    pub fn new(layout: Layout, policy: RowPolicy) -> Self {
        Self { layout, policy }
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn policy(&self) -> &RowPolicy {
        &self.policy
    }

    /// Output header: converted position columns renamed (in place) or added
    /// (append mode), followed by the strand column.
    #[must_use]
    pub fn output_header(&self, header: &Header, suffix: Option<&str>) -> Vec<String> {
        let mut names = header.names().to_vec();
        let renamed: Vec<String> = self
            .layout
            .positions
            .iter()
            .map(|&i| match suffix {
                Some(build) => format!("{}_{build}", names[i]),
                None => names[i].clone(),
            })
            .collect();

        match self.policy.mode {
            OutputMode::InPlace => {
                for (&i, name) in self.layout.positions.iter().zip(renamed) {
                    names[i] = name;
                }
            }
            OutputMode::Append => names.extend(renamed),
        }
        names.push(STRAND_COLUMN.to_string());
        names
    }

    /// Decide whether a row is kept.
    ///
    /// Precedence: a foreign chromosome always drops the row, then a
    /// cross-chromosome mismatch when dropping those is enabled, then any
    /// missing coordinate unless unmapped rows are kept.
    #[must_use]
    pub fn disposition(&self, outcomes: &[Outcome]) -> Disposition {
        let any = |f: fn(&Outcome) -> bool| outcomes.iter().any(f);

        if any(|o| matches!(o, Outcome::ForeignChromosome(_))) {
            Disposition::Skip(SkipReason::ForeignChromosome)
        } else if self.policy.drop_mismatch
            && any(|o| matches!(o, Outcome::CrossChromosomeMismatch(_)))
        {
            Disposition::Skip(SkipReason::CrossChromosomeMismatch)
        } else if !self.policy.keep_unmapped && any(|o| o.kind().is_missing()) {
            Disposition::Skip(SkipReason::Missing)
        } else {
            Disposition::Keep
        }
    }

    /// Write the outcomes into `fields` unless the row is skipped.
    ///
    /// `outcomes` is aligned with the layout's position columns.
    pub fn apply(
        &self,
        fields: &mut Vec<String>,
        chromosome: &ChromosomeToken,
        outcomes: &[Outcome],
    ) -> Disposition {
        debug_assert_eq!(outcomes.len(), self.layout.positions.len());

        let disposition = self.disposition(outcomes);
        if disposition != Disposition::Keep {
            return disposition;
        }

        for (&col, outcome) in self.layout.positions.iter().zip(outcomes) {
            let value = outcome
                .converted()
                .map_or_else(|| NA.to_string(), |c| c.position.to_string());
            match self.policy.mode {
                OutputMode::InPlace => fields[col] = value,
                OutputMode::Append => fields.push(value),
            }
        }

        let moved_to = outcomes.iter().find_map(|o| match o {
            Outcome::CrossChromosomeMismatch(c) => Some(c.chromosome.as_str()),
            _ => None,
        });
        let chrom_field = &mut fields[self.layout.chromosome];
        match (moved_to, self.policy.add_chr) {
            (Some(new), true) => *chrom_field = with_chr_prefix(new),
            (Some(new), false) => *chrom_field = chromosome.restyle(new),
            (None, true) => *chrom_field = with_chr_prefix(&chromosome.canonical),
            (None, false) => {}
        }

        let strand = outcomes
            .first()
            .and_then(Outcome::converted)
            .map_or_else(|| NA.to_string(), |c| c.strand.to_string());
        fields.push(strand);

        Disposition::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::classify::Converted;
    use crate::core::types::Strand;

    fn mapped(chromosome: &str, position: u64) -> Outcome {
        Outcome::Mapped(Converted {
            chromosome: chromosome.to_string(),
            position,
            strand: Strand::Plus,
        })
    }

    fn moved(chromosome: &str, position: u64) -> Outcome {
        Outcome::CrossChromosomeMismatch(Converted {
            chromosome: chromosome.to_string(),
            position,
            strand: Strand::Minus,
        })
    }

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn transformer(positions: &[usize], policy: RowPolicy) -> Transformer {
        let mut resolved = vec![1];
        resolved.extend_from_slice(positions);
        Transformer::new(Layout::from_resolved(&resolved).unwrap(), policy)
    }

    #[test]
    fn test_layout_from_resolved() {
        let layout = Layout::from_resolved(&[2, 3, 5]).unwrap();
        assert_eq!(layout.chromosome, 1);
        assert_eq!(layout.positions, vec![2, 4]);
        assert!(Layout::from_resolved(&[1]).is_none());
        assert!(Layout::from_resolved(&[0, 1]).is_none());
    }

    #[test]
    fn test_output_header_in_place() {
        let t = transformer(&[2], RowPolicy::default());
        let header = Header::new(fields(&["chr", "pos", "p"]));
        assert_eq!(
            t.output_header(&header, Some("hg38")),
            fields(&["chr", "pos_hg38", "p", STRAND_COLUMN])
        );
        assert_eq!(
            t.output_header(&header, None),
            fields(&["chr", "pos", "p", STRAND_COLUMN])
        );
    }

    #[test]
    fn test_output_header_append() {
        let policy = RowPolicy {
            mode: OutputMode::Append,
            drop_mismatch: true,
            ..RowPolicy::default()
        };
        let t = transformer(&[2, 3], policy);
        let header = Header::new(fields(&["chr", "start", "end"]));
        assert_eq!(
            t.output_header(&header, Some("hg38")),
            fields(&["chr", "start", "end", "start_hg38", "end_hg38", STRAND_COLUMN])
        );
    }

    #[test]
    fn test_in_place_write() {
        let t = transformer(&[2], RowPolicy::default());
        let mut row = fields(&["1", "100"]);
        let d = t.apply(&mut row, &ChromosomeToken::new("1"), &[mapped("1", 500)]);
        assert_eq!(d, Disposition::Keep);
        assert_eq!(row, fields(&["1", "500", "+"]));
    }

    #[test]
    fn test_append_write() {
        let policy = RowPolicy {
            mode: OutputMode::Append,
            ..RowPolicy::default()
        };
        let t = transformer(&[2], policy);
        let mut row = fields(&["1", "100", "A"]);
        t.apply(&mut row, &ChromosomeToken::new("1"), &[mapped("1", 500)]);
        assert_eq!(row, fields(&["1", "100", "A", "500", "+"]));
    }

    #[test]
    fn test_missing_dropped_unless_kept() {
        let t = transformer(&[2], RowPolicy::default());
        for outcome in [Outcome::Unmapped, Outcome::Ambiguous(3), Outcome::KeyError] {
            let mut row = fields(&["1", "100"]);
            let d = t.apply(&mut row, &ChromosomeToken::new("1"), &[outcome]);
            assert_eq!(d, Disposition::Skip(SkipReason::Missing));
            assert_eq!(row, fields(&["1", "100"]));
        }

        let keep = transformer(
            &[2],
            RowPolicy {
                keep_unmapped: true,
                ..RowPolicy::default()
            },
        );
        let mut row = fields(&["1", "100"]);
        let d = keep.apply(&mut row, &ChromosomeToken::new("1"), &[Outcome::Unmapped]);
        assert_eq!(d, Disposition::Keep);
        assert_eq!(row, fields(&["1", NA, NA]));
    }

    #[test]
    fn test_foreign_chromosome_always_dropped() {
        let t = transformer(
            &[2],
            RowPolicy {
                keep_unmapped: true,
                ..RowPolicy::default()
            },
        );
        let outcome = Outcome::ForeignChromosome("chr1_random".to_string());
        assert_eq!(
            t.disposition(&[outcome]),
            Disposition::Skip(SkipReason::ForeignChromosome)
        );
    }

    #[test]
    fn test_mismatch_rewrites_chromosome() {
        let t = transformer(&[2], RowPolicy::default());
        let mut row = fields(&["1", "100"]);
        let d = t.apply(&mut row, &ChromosomeToken::new("1"), &[moved("2", 500)]);
        assert_eq!(d, Disposition::Keep);
        assert_eq!(row, fields(&["2", "500", "-"]));

        let mut row = fields(&["chr1", "100"]);
        t.apply(&mut row, &ChromosomeToken::new("chr1"), &[moved("2", 500)]);
        assert_eq!(row[0], "chr2");
    }

    #[test]
    fn test_mismatch_dropped_when_requested() {
        let t = transformer(
            &[2],
            RowPolicy {
                drop_mismatch: true,
                ..RowPolicy::default()
            },
        );
        assert_eq!(
            t.disposition(&[moved("2", 500)]),
            Disposition::Skip(SkipReason::CrossChromosomeMismatch)
        );
    }

    #[test]
    fn test_skip_precedence() {
        let t = transformer(
            &[2, 3, 4],
            RowPolicy {
                drop_mismatch: true,
                ..RowPolicy::default()
            },
        );
        let foreign = Outcome::ForeignChromosome("chrUn_x".to_string());
        assert_eq!(
            t.disposition(&[Outcome::Unmapped, moved("2", 1), foreign]),
            Disposition::Skip(SkipReason::ForeignChromosome)
        );
        assert_eq!(
            t.disposition(&[Outcome::Unmapped, moved("2", 1), mapped("1", 1)]),
            Disposition::Skip(SkipReason::CrossChromosomeMismatch)
        );
        assert_eq!(
            t.disposition(&[Outcome::Unmapped, mapped("1", 1), mapped("1", 2)]),
            Disposition::Skip(SkipReason::Missing)
        );
    }

    #[test]
    fn test_add_chr() {
        let t = transformer(
            &[2],
            RowPolicy {
                add_chr: true,
                ..RowPolicy::default()
            },
        );
        let mut row = fields(&["23", "100"]);
        t.apply(&mut row, &ChromosomeToken::new("23"), &[mapped("X", 7)]);
        assert_eq!(row, fields(&["chrX", "7", "+"]));

        let mut row = fields(&["1", "100"]);
        t.apply(&mut row, &ChromosomeToken::new("1"), &[moved("5", 9)]);
        assert_eq!(row, fields(&["chr5", "9", "-"]));
    }

    #[test]
    fn test_strand_from_primary_coordinate() {
        let t = transformer(
            &[2, 3],
            RowPolicy {
                keep_unmapped: true,
                drop_mismatch: true,
                ..RowPolicy::default()
            },
        );
        let mut row = fields(&["1", "10", "20"]);
        t.apply(
            &mut row,
            &ChromosomeToken::new("1"),
            &[Outcome::Unmapped, mapped("1", 25)],
        );
        assert_eq!(row, fields(&["1", NA, "25", NA]));
    }
}
