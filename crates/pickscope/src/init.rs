//! Logging setup for pickscope-rs.

/// Installs `env_logger` as the global logger.
///
/// Honors `RUST_LOG`. Calling it again, or after another logger has been
/// installed, does nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Installs `env_logger` with an explicit filter such as `"pickscope=debug"`.
///
/// `RUST_LOG` is ignored in this case.
pub fn init_logging_with_filter(filter: &str) {
    let _ = env_logger::Builder::new().parse_filters(filter).try_init();
}
