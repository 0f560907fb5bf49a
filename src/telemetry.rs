use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";
pub const DEBUG_FILTER: &str = "info,liq_sync=debug";

// `--debug` wins over RUST_LOG
pub fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .compact()
        .init();
}
