//! TOML policy files.
//!
//! A policy file either starts from a named preset and overrides some of
//! its UBI parameters:
//!
//! ```toml
//! preset = "2023-24"
//! name = "2023-24 @ $650/week"
//! weekly_ubi = 650
//! clawback_threshold = 104776
//! ```
//!
//! or spells out a complete policy, with brackets inline or in a CSV file
//! resolved relative to the policy file:
//!
//! ```toml
//! name = "flat"
//! weekly_ubi = 400
//! clawback_rate = 0.26
//! clawback_threshold = 80000
//! brackets_csv = "brackets.csv"
//! ```
//!
//! Inline brackets use the [`TaxBracket`] field names:
//!
//! ```toml
//! [[brackets]]
//! min_income = 0
//! max_income = 20000
//! base_tax = 0
//! tax_rate = 0
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use ubi_core::{ConfigError, PolicyConfig, Preset, TaxBracket};

use crate::loader::{TaxBracketLoader, TaxBracketLoaderError};

#[derive(Debug, Error)]
pub enum PolicyFileError {
    #[error("cannot read policy file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}: required when no preset is given")]
    MissingField(&'static str),

    #[error("brackets: give either inline [[brackets]] or brackets_csv, not both")]
    ConflictingBrackets,

    #[error("brackets_csv '{path}': {source}")]
    Brackets {
        path: PathBuf,
        #[source]
        source: TaxBracketLoaderError,
    },

    #[error("invalid policy: {0}")]
    Config(#[from] ConfigError),
}

/// Raw contents of a policy file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    pub name: Option<String>,
    pub preset: Option<Preset>,
    pub weekly_ubi: Option<Decimal>,
    pub clawback_rate: Option<Decimal>,
    pub clawback_threshold: Option<Decimal>,
    pub brackets_csv: Option<PathBuf>,
    #[serde(default)]
    pub brackets: Vec<TaxBracket>,
}

impl FromStr for PolicyFile {
    type Err = PolicyFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl PolicyFile {
    /// Fills gaps from the preset, loads any bracket CSV relative to
    /// `base_dir`, and validates the result.
    ///
    /// # Errors
    ///
    /// * [`PolicyFileError::MissingField`] - no preset and a parameter is absent
    /// * [`PolicyFileError::ConflictingBrackets`] - both bracket sources given
    /// * [`PolicyFileError::Brackets`] - the bracket CSV cannot be read
    /// * [`PolicyFileError::Config`] - the assembled policy is invalid
    pub fn resolve(
        self,
        base_dir: &Path,
    ) -> Result<PolicyConfig, PolicyFileError> {
        let preset = self.preset;

        let tax_brackets = match (self.brackets.is_empty(), &self.brackets_csv) {
            (false, Some(_)) => return Err(PolicyFileError::ConflictingBrackets),
            (false, None) => self.brackets,
            (true, Some(relative)) => {
                let path = base_dir.join(relative);
                TaxBracketLoader::load_file(&path)
                    .map_err(|source| PolicyFileError::Brackets { path, source })?
            }
            (true, None) => preset
                .map(|_| ubi_core::policy::resident_tax_brackets())
                .ok_or(PolicyFileError::MissingField("brackets"))?,
        };

        let weekly_ubi = self
            .weekly_ubi
            .or(preset.map(|p| p.weekly_ubi()))
            .ok_or(PolicyFileError::MissingField("weekly_ubi"))?;
        let clawback_rate = self
            .clawback_rate
            .or(preset.map(|p| p.clawback_rate()))
            .ok_or(PolicyFileError::MissingField("clawback_rate"))?;
        let clawback_threshold = self
            .clawback_threshold
            .or(preset.map(|p| p.clawback_threshold()))
            .ok_or(PolicyFileError::MissingField("clawback_threshold"))?;

        let name = self
            .name
            .or(preset.map(|p| p.to_string()))
            .unwrap_or_else(|| "custom".to_string());

        Ok(PolicyConfig::new(
            name,
            tax_brackets,
            weekly_ubi,
            clawback_rate,
            clawback_threshold,
        )?)
    }
}

/// Reads, parses and validates the policy file at `path`.
pub fn load_policy(path: &Path) -> Result<PolicyConfig, PolicyFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| PolicyFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: PolicyFile = text.parse()?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let config = file.resolve(base_dir)?;
    info!(
        policy = config.name(),
        path = %path.display(),
        consistent = config.is_consistent(),
        "loaded policy file"
    );
    Ok(config)
}
