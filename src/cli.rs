use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(
    author,
    version,
    about,
    long_about = "Genera un correo de bienvenida por cada registro válido de un archivo CSV."
)]
pub struct Cli {
    /// Specify config file to use
    ///
    /// A JSON file providing the data, template and output paths.
    /// Flags given on the command line override its values.
    #[arg(long = "config", short, value_name = "PATH")]
    pub config_filename: Option<String>,

    /// Data file with one comma-separated record per line
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Template file with %%N%% placeholder tokens
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Directory the generated files are written to
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Set logging level to use
    #[arg(long, short, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn get_config_path(&self) -> Option<PathBuf> {
        self.config_filename.as_ref().map(PathBuf::from)
    }
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
