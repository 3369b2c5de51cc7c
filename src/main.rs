use clap::Parser;
use correo_bienvenida::{logging::init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.into())?;
    run(cli)?;
    Ok(())
}
