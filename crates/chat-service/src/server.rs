use std::net::SocketAddr;

use color_eyre::eyre::WrapErr;
use tokio::net::TcpListener;

/// Bind and serve the router until the process is stopped.
pub async fn run_server(routes: axum::Router, port: u16) -> color_eyre::Result<()> {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http();
    let app = routes.layer(trace_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on port {}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err("Failed to open port")?;

    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to run server")
}
