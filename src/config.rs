// ⚙️ Configuration - TOML file with defaults for every field
//
// CLI flags are applied on top by the binary; the library only reads files.

use crate::error::ConfigError;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

// ============================================================================
// SECTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// SIS extract (pipe-delimited)
    pub patron_file: PathBuf,

    /// `code,label` department reference file
    pub departments_file: PathBuf,

    /// One non-distance ZIP code per line
    pub zip_codes_file: PathBuf,

    /// Directory receiving the numbered chunk files
    pub output_dir: PathBuf,

    /// Chunk files are named `{n}-{output_basename}`
    pub output_basename: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            patron_file: PathBuf::from("tmp/testdata.csv"),
            departments_file: PathBuf::from("tmp/departments.csv"),
            zip_codes_file: PathBuf::from("tmp/non-distance-zipcodes.txt"),
            output_dir: PathBuf::from("tmp"),
            output_basename: "username.xml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Patrons per output file
    pub chunk_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

// ============================================================================
// ROOT CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatronLoadConfig {
    pub paths: PathsConfig,
    pub rules: RuleSet,
    pub output: OutputConfig,
}

impl PatronLoadConfig {
    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values no run could succeed with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "output.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.rules.campus_phone_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "rules.campus_phone_prefix must not be empty".to_string(),
            ));
        }
        if self.rules.campus_email_domain.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "rules.campus_email_domain must not be empty".to_string(),
            ));
        }
        if self.paths.output_basename.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "paths.output_basename must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AltPhonePolicy;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = PatronLoadConfig::default();
        assert_eq!(config.output.chunk_size, 10_000);
        assert_eq!(config.paths.output_basename, "username.xml");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\nchunk_size = 500\n\n[rules]\nalt_phone_policy = \"keep-all\""
        )
        .unwrap();

        let config = PatronLoadConfig::from_file(file.path()).unwrap();
        assert_eq!(config.output.chunk_size, 500);
        assert_eq!(config.rules.alt_phone_policy, AltPhonePolicy::KeepAll);
        assert_eq!(config.rules.campus_phone_prefix, "503-725-");
        assert_eq!(config.paths.patron_file, PathBuf::from("tmp/testdata.csv"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = PatronLoadConfig::default();
        config.output.chunk_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PatronLoadConfig::from_file("/nonexistent/patron-load.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output\nchunk_size = ").unwrap();
        let err = PatronLoadConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
