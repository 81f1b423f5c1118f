//! Tracing setup.
//!
//! Logs go to stderr so they never interleave with the manifest save message
//! on stdout. `RUST_LOG` wins over `-v`.
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: u8) {
    let default = match verbose {
        0 => "hw_manifest=warn",
        1 => "hw_manifest=info",
        2 => "hw_manifest=debug",
        _ => "hw_manifest=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
