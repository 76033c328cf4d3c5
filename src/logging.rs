use crate::config::LogConfig;
use anyhow::Result;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// File logging through log4rs when a file is configured, stderr otherwise.
pub fn init(log_config: &LogConfig, level: LevelFilter) -> Result<()> {
    match &log_config.file {
        Some(path) => {
            let logfile = FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new("{d} - {l} - {m}\n")))
                .build(path)?;

            let config = Config::builder()
                .appender(Appender::builder().build("logfile", Box::new(logfile)))
                .build(Root::builder().appender("logfile").build(level))?;

            log4rs::init_config(config)?;
        }
        None => {
            pretty_env_logger::formatted_builder()
                .filter_level(level)
                .try_init()?;
        }
    }
    Ok(())
}
