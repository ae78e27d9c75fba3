//! Terminal logging for the `periodical` binary.
//!
//! Log lines go to stderr so stdout stays free for the compiler's own
//! output at the highest verbosity.

use simplelog::{ColorChoice, Config, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Install the global logger at the level selected by the `-v` count.
pub fn initialize(verbosity: u8) {
    let level = periodical_logging::level_for_verbosity(verbosity);
    // A logger may already be installed when embedded in another harness.
    let _ = TermLogger::init(level, build_config(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .add_filter_allow_str("periodical")
        .build()
}
