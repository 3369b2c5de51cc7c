mod cli;
mod config;
pub mod logging;
mod processor;
mod record;
mod report;
mod template;

pub use cli::Cli;
pub use config::Config;
pub use processor::RecordProcessor;
pub use record::{Field, InvalidRecord, Record};
pub use report::{Console, ReportSink};
pub use template::{render, Rendered};

use log::debug;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::resolve(&cli)?;
    debug!("Running with {config:?}");

    let mut console = Console;
    let mut processor =
        RecordProcessor::new(config.template_path, config.output_dir, &mut console);
    processor.run(&config.data_path)?;

    Ok(())
}
