use color_eyre::eyre::WrapErr;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Layer as _, Registry};

/// Install the global tracing subscriber.
///
/// # Environment Variables
///
/// - `RUST_LOG`: log filter (defaults to `info,{crate_name}=debug,tower_http=debug`)
/// - `JSON_LOGS`: if set, outputs JSON logs for log shippers instead of plain text
pub fn setup_tracing(crate_name: &str) -> color_eyre::Result<()> {
    let rust_log = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("info,{crate_name}=debug,tower_http=debug"));

    let env_filter = EnvFilter::builder()
        .parse(&rust_log)
        .wrap_err_with(|| format!("Couldn't create env filter from {rust_log}"))?;

    let stdout_layer = if std::env::var("JSON_LOGS").is_ok() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    Registry::default()
        .with(stdout_layer)
        .with(env_filter)
        .try_init()?;

    Ok(())
}
