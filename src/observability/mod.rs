use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize structured logging.
///
/// `RUST_LOG` overrides the configured level. The JSON formatter is
/// meant for log shipping in production; the plain formatter for
/// development.
pub fn init_logging(
    service_name: &str,
    log_level: &str,
    enable_json_logging: bool,
) -> Result<(), ObservabilityError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}={},tower_http=info",
            service_name.replace('-', "_"),
            log_level
        )
        .into()
    });

    if enable_json_logging {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_target(false)
            .boxed();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    }

    Ok(())
}
