use log::LevelFilter;

/// Level for the `-v` count, unless `-q` asks for errors only
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Set up the global logger; `RUST_LOG` takes precedence when set
pub fn init_logger(verbosity: u8, quiet: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbosity, quiet))
        .format_timestamp(None)
        .format_target(verbosity >= 2);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A second initialization (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0, false), LevelFilter::Warn);
        assert_eq!(level_for(1, false), LevelFilter::Info);
        assert_eq!(level_for(2, false), LevelFilter::Debug);
        assert_eq!(level_for(7, false), LevelFilter::Trace);
        assert_eq!(level_for(3, true), LevelFilter::Error);
    }
}
