use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the corpus is held during clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    /// Borrowed row-major buffer, Euclidean only.
    #[serde(alias = "nonsparse")]
    #[value(alias = "nonsparse")]
    Dense,
    /// Owned per-row non-zero entries.
    Sparse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Euclidean,
    Cosine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[serde(alias = "f32")]
    #[value(alias = "f32")]
    Single,
    #[serde(alias = "f64")]
    #[value(alias = "f64")]
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One cluster id per line.
    Lines,
    Json,
}

impl FromStr for CorpusKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dense" | "nonsparse" => Ok(CorpusKind::Dense),
            "sparse" => Ok(CorpusKind::Sparse),
            other => Err(Error::InvalidConfiguration(format!(
                "Unknown corpus kind '{}', expected 'dense' (or 'nonsparse') or 'sparse'",
                other
            ))),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "euclidean" => Ok(Metric::Euclidean),
            "cosine" => Ok(Metric::Cosine),
            other => Err(Error::InvalidConfiguration(format!(
                "Unknown distance metric '{}', expected 'euclidean' or 'cosine'",
                other
            ))),
        }
    }
}

impl FromStr for Precision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" | "f32" => Ok(Precision::Single),
            "double" | "f64" => Ok(Precision::Double),
            other => Err(Error::InvalidConfiguration(format!(
                "Unknown precision '{}', expected 'single' or 'double'",
                other
            ))),
        }
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CorpusKind::Dense => write!(f, "dense"),
            CorpusKind::Sparse => write!(f, "sparse"),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Metric::Euclidean => write!(f, "euclidean"),
            Metric::Cosine => write!(f, "cosine"),
        }
    }
}

/// Rejects representation/metric pairings that have no implementation.
pub fn check_pairing(corpus: CorpusKind, metric: Metric) -> Result<()> {
    match (corpus, metric) {
        (CorpusKind::Dense, Metric::Euclidean)
        | (CorpusKind::Sparse, Metric::Euclidean)
        | (CorpusKind::Sparse, Metric::Cosine) => Ok(()),
        (corpus, metric) => Err(Error::InvalidConfiguration(format!(
            "Unsupported combination {}, {}: only euclidean distance is supported for {} corpora",
            corpus, metric, corpus
        ))),
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Written to stdout when unset.
    pub path: Option<String>,
    /// Adds the seed-time noise flag next to each label.
    pub include_noise: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::Lines,
            path: None,
            include_noise: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DbscanConfig {
    pub eps: f64,
    pub min_pts: usize,
    pub corpus: CorpusKind,
    pub metric: Metric,
    pub precision: Precision,
    pub progress: bool,
    pub output: OutputConfig,
}

impl Default for DbscanConfig {
    fn default() -> Self {
        DbscanConfig {
            eps: 0.3,
            min_pts: 10,
            corpus: CorpusKind::Dense,
            metric: Metric::Euclidean,
            precision: Precision::Double,
            progress: false,
            output: OutputConfig::default(),
        }
    }
}

impl DbscanConfig {
    pub fn from_toml(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&config_str)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: DbscanConfig = toml::from_str(config_str)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.eps > 0.0) || !self.eps.is_finite() {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: format!("must be a finite value > 0, got {}", self.eps),
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be > 0".into(),
            });
        }
        check_pairing(self.corpus, self.metric)
    }
}
