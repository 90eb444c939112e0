use std::env;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` directives win when set; otherwise `default_level` applies to
/// everything.
pub fn init_tracing(default_level: &str) {
    let filter = build_filter(env::var("RUST_LOG").ok().as_deref(), default_level);

    fmt().with_env_filter(filter).with_target(true).init();
}

fn build_filter(rust_log: Option<&str>, default_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}
