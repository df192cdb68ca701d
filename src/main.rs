use anyhow::Context;
use pokepatcher_lib::services::compiler;
use pokepatcher_lib::services::config::{ConfigService, ENV_GAME_DIR};
use pokepatcher_lib::package_datapacks;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Try to load .env, ignore if missing
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let game_dir = std::env::var_os(ENV_GAME_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config_service = ConfigService::load(&game_dir)
        .with_context(|| format!("Failed to load settings under {}", game_dir.display()))?;
    if let Err(e) = config_service.ensure_settings_file() {
        log::warn!("{e}");
    }
    let config = config_service.get_settings();
    let compiler = compiler::select(&config);

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel.clone();
    ctrlc::set_handler(move || {
        log::warn!("Interrupt received; finishing packs already in progress");
        cancel_clone.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let summary = package_datapacks(&config, compiler.as_ref(), &cancel)
        .context("Datapack packaging aborted")?;

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
