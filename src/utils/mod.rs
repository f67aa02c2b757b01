pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "form_core=info";

/// Initializes the global tracing subscriber, writing to stderr so scripted
/// CLI output on stdout stays clean. `RUST_LOG` directives are honoured on
/// top of the crate default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::from_default_env();
        let filter = match DEFAULT_DIRECTIVE.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        };

        // Another subscriber may already be installed by an embedding app.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
