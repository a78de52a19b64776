use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColumnError {
    #[error("Column '{0}' not found in header")]
    NameNotFound(String),

    #[error("Column '{0}' is not numeric; only column indices are allowed without a header")]
    NameWithoutHeader(String),

    #[error("Column {index} resolves to position {resolved}, outside a header of {len} fields")]
    OutOfRange { index: i64, resolved: i64, len: usize },
}

/// A user-supplied column reference: a field name or an index.
///
/// Positive indices are 1-based; negative indices count from the end, so `-1`
/// is the last field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    ByName(String),
    ByIndex(i64),
}

impl ColumnRef {
    /// Interpret a command-line token. Anything that parses as an integer is an index.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<i64>() {
            Ok(idx) => Self::ByIndex(idx),
            Err(_) => Self::ByName(s.to_string()),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "{name}"),
            Self::ByIndex(idx) => write!(f, "{idx}"),
        }
    }
}

/// Field names of a delimited stream, read once from its first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    /// False when the names were synthesized as `1..N`
    named: bool,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        Self { names, named: true }
    }

    /// Ordinal header `1..=len` for streams without a header line
    #[must_use]
    pub fn synthetic(len: usize) -> Self {
        Self {
            names: (1..=len).map(|i| i.to_string()).collect(),
            named: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        self.named
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the field at a 1-based index
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Resolve a column reference to a 1-based field index.
    ///
    /// # Errors
    ///
    /// Returns `ColumnError::NameNotFound` for an unknown name,
    /// `ColumnError::NameWithoutHeader` for any name when the header is
    /// synthetic, or `ColumnError::OutOfRange` if an index falls outside the header.
    pub fn resolve(&self, column: &ColumnRef) -> Result<usize, ColumnError> {
        match column {
            ColumnRef::ByIndex(idx) => {
                #[allow(clippy::cast_possible_wrap)] // header lengths are far below i64::MAX
                let len = self.names.len() as i64;
                let resolved = if *idx < 0 { len + idx + 1 } else { *idx };
                if resolved < 1 || resolved > len {
                    return Err(ColumnError::OutOfRange {
                        index: *idx,
                        resolved,
                        len: self.names.len(),
                    });
                }
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)] // checked above
                Ok(resolved as usize)
            }
            ColumnRef::ByName(name) => {
                if !self.named {
                    return Err(ColumnError::NameWithoutHeader(name.clone()));
                }
                self.names
                    .iter()
                    .position(|n| n == name)
                    .map(|i| i + 1)
                    .ok_or_else(|| ColumnError::NameNotFound(name.clone()))
            }
        }
    }

    /// Resolve every reference, failing on the first that cannot be resolved.
    ///
    /// # Errors
    ///
    /// Returns the first `ColumnError` encountered.
    pub fn resolve_all(&self, columns: &[ColumnRef]) -> Result<Vec<usize>, ColumnError> {
        columns.iter().map(|c| self.resolve(c)).collect()
    }
}
