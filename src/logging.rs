use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV_VAR: &str = "QUIZSCORE_LOG";

// Flags win over config; both unset means `warn`.
pub fn default_level(verbose: u8, quiet: bool, configured: Option<&str>) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => configured.unwrap_or("warn").to_ascii_lowercase(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

pub fn init(verbose: u8, quiet: bool, configured: Option<&str>) {
    let level = default_level(verbose, quiet, configured);
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&level));

    // A second init in the same process (tests) is not an error.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
