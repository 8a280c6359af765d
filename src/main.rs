use std::sync::Arc;

use anyhow::Context;
use price_demo::config::Config;
use price_demo::state::AppContext;
use price_demo::web::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    // Both artifacts must load before we bind anything.
    let ctx = AppContext::load(&config).context("loading startup artifacts")?;
    let app = create_router(Arc::new(ctx));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
