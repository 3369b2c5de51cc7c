use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::debug;
use serde::Deserialize;

use crate::Cli;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Data file with one record per line
    pub data_path: PathBuf,

    /// Template the welcome emails are rendered from
    pub template_path: PathBuf,

    /// Directory the generated files are written to
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            template_path: PathBuf::from("template.txt"),
            output_dir: PathBuf::from("salida"),
        }
    }
}

impl Config {
    pub fn load_from(config_path: &Path) -> anyhow::Result<Config> {
        debug!("Loading Config from: {config_path:?}");
        let file_contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read contents of {config_path:?}"))?;
        let result = serde_json::from_str(&file_contents)
            .with_context(|| format!("Failed to parse contents of {config_path:?}"))?;
        Ok(result)
    }

    /// Resolves the effective configuration for a run. The config file is
    /// only read when one was requested; command line flags win over it.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Config> {
        let mut config = match cli.get_config_path() {
            Some(path) => Config::load_from(&path)?,
            None => Config::default(),
        };
        if let Some(data) = &cli.data {
            config.data_path = data.clone();
        }
        if let Some(template) = &cli.template {
            config.template_path = template.clone();
        }
        if let Some(output_dir) = &cli.output_dir {
            config.output_dir = output_dir.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.data_path, PathBuf::from("data.csv"));
        assert_eq!(config.template_path, PathBuf::from("template.txt"));
        assert_eq!(config.output_dir, PathBuf::from("salida"));
    }

    #[test]
    fn load_partial_file_keeps_defaults() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_path": "otros.csv"}}"#).unwrap();

        // Act
        let config = Config::load_from(file.path()).unwrap();

        // Assert
        assert_eq!(config.data_path, PathBuf::from("otros.csv"));
        assert_eq!(config.template_path, PathBuf::from("template.txt"));
    }

    #[test]
    fn cli_flags_override_config() {
        // Arrange
        let cli = Cli {
            data: Some(PathBuf::from("especial.csv")),
            ..Cli::default()
        };

        // Act
        let config = Config::resolve(&cli).unwrap();

        // Assert
        assert_eq!(config.data_path, PathBuf::from("especial.csv"));
        assert_eq!(config.output_dir, PathBuf::from("salida"));
    }

    #[test]
    fn load_missing_file_fails() {
        let actual = Config::load_from(Path::new("no-existe.json"));
        assert!(actual.is_err());
    }
}
