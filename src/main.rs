//! Voxsculpt headless editor
//!
//! Restores the saved grid, serves remote commands and keeps the
//! long-press and save timers running until Ctrl-C.
//!
//! Usage: voxsculpt [--config <file.json>] [--save-dir <dir>]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use voxsculpt::core::config::EditorConfig;
use voxsculpt::editor::Editor;
use voxsculpt::persist::FileStore;
use voxsculpt::remote::EditorCommandHandler;

/// Timer resolution of the tick loop
const TICK_INTERVAL: Duration = Duration::from_millis(16);

fn main() {
    voxsculpt::core::logging::init();

    let args: Vec<String> = std::env::args().collect();

    let config = match parse_path_arg(&args, "--config") {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            match EditorConfig::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Invalid config {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => EditorConfig::default(),
    };
    let save_dir = parse_path_arg(&args, "--save-dir").unwrap_or_else(|| PathBuf::from("saves"));

    let store = match FileStore::open(&save_dir) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot open save directory {}: {}", save_dir.display(), e);
            std::process::exit(1);
        }
    };
    let port = config.remote_port;
    let editor = match Editor::open(config, Box::new(store)) {
        Ok(editor) => Arc::new(Mutex::new(editor)),
        Err(e) => {
            log::error!("Failed to open editor: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = Arc::new(AtomicBool::new(false));

    // Command server in background thread with tokio runtime
    let server_editor = editor.clone();
    let server_shutdown = shutdown.clone();
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create tokio runtime: {}", e);
                server_shutdown.store(true, Ordering::SeqCst);
                return;
            }
        };
        rt.block_on(async {
            let handler = Arc::new(tokio::sync::Mutex::new(EditorCommandHandler::new(server_editor)));
            let _server = voxsculpt_remote::CommandServer::start(handler, port);
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
            }
            log::info!("Shutdown requested");
            server_shutdown.store(true, Ordering::SeqCst);
        });
    });

    while !shutdown.load(Ordering::SeqCst) {
        std::thread::sleep(TICK_INTERVAL);
        match editor.lock() {
            Ok(mut editor) => {
                if let Some(commit) = editor.tick(Instant::now()) {
                    log::debug!("Long-press committed {:?}", commit);
                }
            }
            Err(_) => {
                log::error!("Editor state poisoned, stopping");
                break;
            }
        }
    }

    // Teardown: write whatever the debounce still holds
    let flushed = editor.lock().map(|mut editor| editor.flush());
    match flushed {
        Ok(Ok(())) => log::info!("Snapshot flushed to {}", save_dir.display()),
        Ok(Err(e)) => log::error!("Final save failed: {}", e),
        Err(_) => log::error!("Editor state poisoned, final save skipped"),
    }
}

/// Value following `flag` on the command line
fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}
