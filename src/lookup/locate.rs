//! Find the chain file for a build pair.
//!
//! Chain files follow the UCSC naming scheme `{from}To{To}.over.chain.gz`,
//! e.g. `hg19ToHg38.over.chain.gz`, and are looked up in a cache directory
//! (`~/.liftover` unless given). They can be downloaded from
//! <https://hgdownload.soe.ucsc.edu/downloads.html>.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::utils::validation::{validate_chain_tokens, ConfigError};

/// Default cache directory, relative to the home directory
pub const DEFAULT_CACHE_DIR: &str = ".liftover";

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("No chain file for {target} -> {query}; looked for: {}", display_paths(.searched))]
    NotFound {
        target: String,
        query: String,
        searched: Vec<PathBuf>,
    },

    #[error("Cannot determine the home directory for the default chain cache; pass a chain path explicitly")]
    NoHome,
}

/// The build pair to convert between, plus an optional chain file or cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    /// Build the input coordinates are in (e.g. `hg19`)
    pub target: String,
    /// Build to convert to (e.g. `hg38`)
    pub query: String,
    /// Chain file, or directory holding chain files
    pub index: Option<PathBuf>,
}

impl ChainSpec {
    /// Build from the `TARGET QUERY [INDEX]` tokens given on the command line.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidChainSpec` unless there are 2 or 3 tokens.
    pub fn from_tokens(tokens: &[String]) -> Result<Self, ConfigError> {
        validate_chain_tokens(tokens)?;
        Ok(Self {
            target: tokens[0].clone(),
            query: tokens[1].clone(),
            index: tokens.get(2).map(PathBuf::from),
        })
    }

    /// UCSC file name for this build pair, without compression suffix
    #[must_use]
    pub fn file_name(&self) -> String {
        let mut chars = self.query.chars();
        let query = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{}To{query}.over.chain", self.target)
    }

    /// Resolve the chain file to load.
    ///
    /// An explicit file path is used as is. A directory (explicit or the default
    /// cache) is searched for the gzipped and then the plain chain file.
    ///
    /// # Errors
    ///
    /// Returns `LocateError::NotFound` if no candidate exists, or
    /// `LocateError::NoHome` if the default cache directory cannot be determined.
    pub fn resolve(&self) -> Result<PathBuf, LocateError> {
        let dir = match &self.index {
            Some(path) if path.is_file() => return Ok(path.clone()),
            Some(path) if path.is_dir() => path.clone(),
            Some(path) => {
                return Err(LocateError::NotFound {
                    target: self.target.clone(),
                    query: self.query.clone(),
                    searched: vec![path.clone()],
                })
            }
            None => default_cache_dir().ok_or(LocateError::NoHome)?,
        };
        self.find_in(&dir)
    }

    fn find_in(&self, dir: &Path) -> Result<PathBuf, LocateError> {
        let plain = dir.join(self.file_name());
        let gz = dir.join(format!("{}.gz", self.file_name()));
        let searched = vec![gz, plain];

        if let Some(found) = searched.iter().find(|p| p.is_file()) {
            return Ok(found.clone());
        }
        Err(LocateError::NotFound {
            target: self.target.clone(),
            query: self.query.clone(),
            searched,
        })
    }
}

impl std::fmt::Display for ChainSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.target, self.query)
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn default_cache_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(|home| PathBuf::from(home).join(DEFAULT_CACHE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_from_tokens() {
        let spec = ChainSpec::from_tokens(&tokens(&["hg19", "hg38"])).unwrap();
        assert_eq!(spec.target, "hg19");
        assert_eq!(spec.query, "hg38");
        assert!(spec.index.is_none());

        let spec = ChainSpec::from_tokens(&tokens(&["hg38", "hg19", "/data/chains"])).unwrap();
        assert_eq!(spec.index, Some(PathBuf::from("/data/chains")));

        assert_eq!(
            ChainSpec::from_tokens(&tokens(&["hg19"])),
            Err(ConfigError::InvalidChainSpec(1))
        );
        assert_eq!(
            ChainSpec::from_tokens(&tokens(&["a", "b", "c", "d"])),
            Err(ConfigError::InvalidChainSpec(4))
        );
    }

    #[test]
    fn test_file_name() {
        let spec = ChainSpec::from_tokens(&tokens(&["hg19", "hg38"])).unwrap();
        assert_eq!(spec.file_name(), "hg19ToHg38.over.chain");
        let spec = ChainSpec::from_tokens(&tokens(&["hg38", "chm13v2"])).unwrap();
        assert_eq!(spec.file_name(), "hg38ToChm13v2.over.chain");
    }

    #[test]
    fn test_resolve_in_directory_prefers_gz() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_string_lossy().to_string();
        let spec = ChainSpec::from_tokens(&tokens(&["hg19", "hg38", dir_str.as_str()])).unwrap();

        assert!(matches!(spec.resolve(), Err(LocateError::NotFound { .. })));

        std::fs::write(dir.path().join("hg19ToHg38.over.chain"), "").unwrap();
        assert_eq!(
            spec.resolve().unwrap(),
            dir.path().join("hg19ToHg38.over.chain")
        );

        std::fs::write(dir.path().join("hg19ToHg38.over.chain.gz"), "").unwrap();
        assert_eq!(
            spec.resolve().unwrap(),
            dir.path().join("hg19ToHg38.over.chain.gz")
        );
    }

    #[test]
    fn test_resolve_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.chain");
        std::fs::write(&file, "").unwrap();
        let file_str = file.to_string_lossy().to_string();
        let spec = ChainSpec::from_tokens(&tokens(&["hg19", "hg38", file_str.as_str()])).unwrap();
        assert_eq!(spec.resolve().unwrap(), file);

        let missing = ChainSpec::from_tokens(&tokens(&["hg19", "hg38", "/no/such/chain"])).unwrap();
        assert!(matches!(missing.resolve(), Err(LocateError::NotFound { .. })));
    }
}
