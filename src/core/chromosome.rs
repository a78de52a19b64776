/// A chromosome label as read from an input row, together with its canonical form.
///
/// The canonical form (no `chr` prefix, no leading zeros, uppercase `X`/`Y`/`MT`)
/// is what lookups and equality checks use. The raw token is kept so that a
/// rewritten chromosome can be written back in the same style as the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeToken {
    pub raw: String,
    pub canonical: String,
}

impl ChromosomeToken {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let canonical = canonicalize(&raw);
        Self { raw, canonical }
    }

    /// True if the raw token carried a `chr` prefix (any case)
    #[must_use]
    pub fn has_chr_prefix(&self) -> bool {
        strip_chr_prefix(self.raw.trim()).is_some()
    }

    /// Whether the canonical form is one of the accepted chromosome names
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_chromosome(&self.canonical)
    }

    /// Render another canonical chromosome in the prefix style of this token.
    #[must_use]
    pub fn restyle(&self, canonical: &str) -> String {
        if self.has_chr_prefix() {
            with_chr_prefix(canonical)
        } else {
            canonical.to_string()
        }
    }
}

impl std::fmt::Display for ChromosomeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn strip_chr_prefix(s: &str) -> Option<&str> {
    if s.len() >= 3 && s.is_char_boundary(3) && s[..3].eq_ignore_ascii_case("chr") {
        Some(&s[3..])
    } else {
        None
    }
}

/// Canonicalize a chromosome token for lookups and comparisons.
///
/// | Input | Canonical |
/// |-------|-----------|
/// | `chr1`, `01`, `1` | `1` |
/// | `chrX`, `x`, `23` | `X` |
/// | `chrY`, `y`, `24` | `Y` |
/// | `chrM`, `mt`, `25` | `MT` |
///
/// Tokens that are not chromosome names (contigs, scaffolds) keep their text
/// after the prefix is removed, so they fail [`is_valid_chromosome`].
///
/// # Examples
///
/// ```
/// use liftcols::core::chromosome::canonicalize;
///
/// assert_eq!(canonicalize("chr01"), "1");
/// assert_eq!(canonicalize("ChrX"), "X");
/// assert_eq!(canonicalize("m"), "MT");
/// assert_eq!(canonicalize("chr1_gl000191_random"), "1_gl000191_random");
/// ```
#[must_use]
pub fn canonicalize(token: &str) -> String {
    let token = token.trim();
    let bare = strip_chr_prefix(token).unwrap_or(token);

    if !bare.is_empty() && bare.bytes().all(|b| b.is_ascii_digit()) {
        let digits = bare.trim_start_matches('0');
        return match digits {
            "" => "0".to_string(),
            "23" => "X".to_string(),
            "24" => "Y".to_string(),
            "25" => "MT".to_string(),
            other => other.to_string(),
        };
    }

    match bare.to_ascii_lowercase().as_str() {
        "x" => "X".to_string(),
        "y" => "Y".to_string(),
        "m" | "mt" => "MT".to_string(),
        _ => bare.to_string(),
    }
}

/// Check a token against the accepted chromosome grammar: an optional `chr`
/// prefix followed by `1`-`22`, `X`, `Y` or `MT` (case-insensitive).
///
/// Used to reject contig and scaffold names returned by a chain lookup.
#[must_use]
pub fn is_valid_chromosome(token: &str) -> bool {
    let token = token.trim();
    let bare = strip_chr_prefix(token).unwrap_or(token);

    if let Ok(n) = bare.parse::<u8>() {
        // Leading zeros and sign characters are not part of the grammar
        return (1..=22).contains(&n) && !bare.starts_with('0') && !bare.starts_with('+');
    }

    matches!(bare.to_ascii_uppercase().as_str(), "X" | "Y" | "MT")
}

/// `chr`-prefixed display form of a canonical chromosome
#[must_use]
pub fn with_chr_prefix(canonical: &str) -> String {
    format!("chr{canonical}")
}
