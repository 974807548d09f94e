use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: `RUST_LOG` wins over `log_level`, events
/// are emitted as flattened JSON tagged with the tool name.
pub fn init_tracing(service_name: &str, log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init();

    match initialized {
        Ok(()) => tracing::debug!(service = service_name, "tracing initialized"),
        Err(e) => eprintln!(
            "Tracing for '{}' was already initialized: {}",
            service_name, e
        ),
    }
}
