use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use regexp_handler::config::{self, AppState, Config};
use regexp_handler::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Invalid patterns abort startup before anything is served
    let table = cfg.build_router()?;
    if table.is_empty() {
        logger::log_warning("No routes configured; every request will get 404");
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, &config_path, table))
}

async fn async_main(
    cfg: Config,
    config_path: &str,
    table: regexp_handler::RegexpHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr, cfg.server.backlog)?;

    logger::log_server_start(&addr, &cfg, table.len());
    let state = Arc::new(AppState::new(cfg, config_path, table));
    server::start_signal_handler(Arc::clone(&state))?;

    server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0))).await;
    Ok(())
}
