mod config;
mod db;
mod domain;
mod routes;
mod server;
mod setup;
mod state;

use color_eyre::Result;
use tracing::info;

use crate::config::{AppSettings, DbSettings};
use crate::state::{AppState, PageLimits};

fn main() -> Result<()> {
    color_eyre::install()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> Result<()> {
    setup::setup_tracing("chat_service")?;

    let db_settings = DbSettings::from_env()?;
    let app_settings = AppSettings::from_env()?;

    // refuses to serve traffic unless the schema is current
    let pool = db::setup(&db_settings).await?;

    let state = AppState {
        db: pool,
        limits: PageLimits {
            max_chats: app_settings.max_chats_count,
            max_messages: app_settings.max_messages_count,
        },
    };

    info!("Chat service ready");
    server::run_server(routes::router(state), app_settings.server_port).await
}
