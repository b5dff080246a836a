use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr so stdout only carries the import status lines.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "info,gitlab_import_seeder=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
