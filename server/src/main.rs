use std::sync::Arc;

use log::LevelFilter;
use mixer::Dispatcher;
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};

use server::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(config.log_level);

    if config.token.is_none() {
        log::warn!("VOLUME_TOKEN is not set, the volume API is open to anyone who can reach it");
    }

    let pactl = config.pactl();
    log::info!(
        "Controlling sink {} via {} (timeout {}ms)",
        pactl.sink(),
        pactl.program(),
        pactl.timeout().as_millis()
    );

    let addr = config.socket_addr();
    let dispatcher = Dispatcher::new(Arc::new(pactl));
    let routes = server::routes(Arc::new(config), dispatcher);

    let (addr, serving) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, async {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("Shutting down");
    })?;

    log::info!("Listening on http://{}", addr);
    serving.await;

    Ok(())
}

fn init_logging(level: LevelFilter) {
    if TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        let _ = SimpleLogger::init(level, Config::default());
    }
}
