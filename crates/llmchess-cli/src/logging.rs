//! Log output goes to stderr; stdout belongs to the console observer.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "llmchess=info";

pub fn init(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        1 => EnvFilter::new("llmchess=debug"),
        _ => EnvFilter::new("llmchess=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
