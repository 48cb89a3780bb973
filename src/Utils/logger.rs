use crate::ReactionNetwork::network_error::NetworkError;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// Terminal logger at `level`, plus a debug-level file log when `log_file` is given.
/// Fails if a global logger is already installed.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> Result<(), NetworkError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::info;
    use tempfile::NamedTempFile;

    #[test]
    fn test_second_init_fails() {
        let file = NamedTempFile::new().unwrap();
        let first = init_logger(LevelFilter::Warn, file.path().to_str());
        info!("logger test");
        // whichever test installs the global logger first wins
        let second = init_logger(LevelFilter::Warn, None);
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(NetworkError::Logger(_))));
    }
}
