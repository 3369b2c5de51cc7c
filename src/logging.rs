use anyhow::Context;
use log::LevelFilter;
use log4rs::Handle;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

/// Initializes logging to stderr at the requested level.
///
/// Tracing goes to stderr so it never mixes with the success notices the
/// tool prints on stdout. The returned handle allows changing the level
/// at runtime, though this one-shot tool has no occasion to.
pub fn init_logging(level: LevelFilter) -> anyhow::Result<Handle> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        // Pattern: https://docs.rs/log4rs/*/log4rs/encode/pattern/index.html
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}\n",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .context("Failed to configure logging")?;

    let handle = log4rs::init_config(config).context("Failed to init_config")?;

    Ok(handle)
}
