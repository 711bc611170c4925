use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    // Default to "info" when RUST_LOG is not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
