//! Generator configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::DEFAULT_PREFIX;
use crate::digest::{DigestEngine, Keccak256Engine, Sha256Engine};

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Keccak256,
}

impl DigestAlgorithm {
    pub fn engine(self) -> Box<dyn DigestEngine> {
        match self {
            DigestAlgorithm::Sha256 => Box::new(Sha256Engine),
            DigestAlgorithm::Keccak256 => Box::new(Keccak256Engine),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Keccak256 => "keccak256",
        }
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "keccak256" | "keccak-256" => Ok(DigestAlgorithm::Keccak256),
            other => Err(format!("unknown digest algorithm: {}", other)),
        }
    }
}

/// Configuration for a builtins generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Identifier prefix byte
    #[serde(default = "default_prefix")]
    pub prefix: u8,
    /// Digest algorithm applied to certificate DER
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    /// Generated Rust module
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Raw `32 * N` byte table, if wanted
    #[serde(default)]
    pub binary_output: Option<PathBuf>,
    /// Cache document written after a fresh build, if wanted
    #[serde(default)]
    pub cache_output: Option<PathBuf>,
}

fn default_prefix() -> u8 {
    DEFAULT_PREFIX
}

fn default_output() -> PathBuf {
    PathBuf::from("builtins.rs")
}

impl GeneratorConfig {
    pub fn with_prefix(mut self, prefix: u8) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        crate::atomic::write_atomic(path, content.as_bytes())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            algorithm: DigestAlgorithm::default(),
            output: default_output(),
            binary_output: None,
            cache_output: None,
        }
    }
}
