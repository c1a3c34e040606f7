/// Logger initialization for the terminal binary.
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "spinlab_core=trace"). Without it `RUST_LOG` is consulted, and failing
/// that only warnings and errors are shown: anything written to stderr lands
/// on top of the frame while the alternate screen is active.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
