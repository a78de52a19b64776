use crate::utils::validation::ConfigError;

/// Field separator of the input stream.
///
/// Whitespace-delimited input is split on runs of any whitespace and written
/// back tab-separated; an explicit separator is used for both directions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Whitespace,
    Exact(String),
}

impl Delimiter {
    /// Parse a `--sep` value. `\t` and `tab` name the tab character.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyDelimiter` for an empty separator.
    pub fn parse(sep: Option<&str>) -> Result<Self, ConfigError> {
        match sep {
            None => Ok(Self::Whitespace),
            Some("") => Err(ConfigError::EmptyDelimiter),
            Some("\\t" | "tab") => Ok(Self::Exact("\t".to_string())),
            Some(s) => Ok(Self::Exact(s.to_string())),
        }
    }

    /// Split one line into fields. Line terminators are removed first.
    #[must_use]
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let line = line.trim_end_matches(['\n', '\r']);
        match self {
            Self::Whitespace => line.split_whitespace().collect(),
            Self::Exact(sep) => line.split(sep.as_str()).collect(),
        }
    }

    /// True for lines that carry no fields at all.
    ///
    /// With an exact separator only an empty line qualifies; a line of bare
    /// separators still has (empty) fields.
    #[must_use]
    pub fn is_blank(&self, line: &str) -> bool {
        match self {
            Self::Whitespace => line.trim().is_empty(),
            Self::Exact(_) => line.trim_end_matches(['\n', '\r']).is_empty(),
        }
    }

    /// Separator used when writing rows
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::Whitespace => "\t",
            Self::Exact(sep) => sep,
        }
    }
}
