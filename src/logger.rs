use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to the most detailed level that gets printed.
///
/// | Level | Flag needed |
/// |-------|-------------|
/// | Warn  | always      |
/// | Info  | always      |
/// | Debug | `-v`        |
/// | Trace | `-vv`       |
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global stderr subscriber.
///
/// `RUST_LOG`, when set, wins over the verbosity flag. Calling this twice
/// keeps the first subscriber.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_for(verbosity).into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_detail() {
        assert_eq!(level_for(0), LevelFilter::INFO);
        assert_eq!(level_for(1), LevelFilter::DEBUG);
        assert_eq!(level_for(2), LevelFilter::TRACE);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }
}
