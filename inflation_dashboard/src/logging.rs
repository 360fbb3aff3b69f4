//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Level for a `-v` count: 0 is info, 1 debug, more is trace
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the verbosity flag. Logs go to stderr so stdout only
/// carries command output. Calling this twice leaves the first subscriber in
/// place.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_for(verbosity)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
