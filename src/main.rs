/*****************************************************************************************
 *
 *  word-dict – Word/Definition Store in Rust
 *  -----------------------------------------
 *
 *  Interactive CLI over an in-memory dictionary + HTTP API over a
 *  snapshot-backed word database.
 *
 *****************************************************************************************/

mod app;
mod cli;
mod config;
mod errors;
mod persistence;
mod routes;
mod services;
mod state;

use std::error::Error;
use std::future::Future;
use std::path::PathBuf;

use axum::serve;
use tokio::net::TcpListener;
use tokio::task;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::persistence::{autosave_loop, cleanup_loop, load_snapshot, save_snapshot};
use crate::state::app::AppState;
use crate::state::dictionary::SharedDictionary;
use crate::state::word_db::{new_db, WordDb};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    //
    // ────────────────────────────────────────────────────────
    //  Locate and load config.json
    // ────────────────────────────────────────────────────────
    //
    let config_path = find_config();
    let cfg = match &config_path {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging (stderr, stdout belongs to the CLI)
    // ────────────────────────────────────────────────────────
    //
    let level = match cfg.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match &config_path {
        Some(path) => tracing::info!("Loaded config.json from {}", path.display()),
        None => tracing::warn!("config.json not found, using built-in defaults"),
    }

    tracing::info!("Starting word-dict…");
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Create word database and load snapshot
    // ────────────────────────────────────────────────────────
    //
    let db = new_db();
    if let Err(e) = load_snapshot(&cfg.snapshot_path, &db, cfg.retention_seconds).await {
        tracing::warn!("Ignoring snapshot {}: {e}", cfg.snapshot_path);
    }

    //
    // ────────────────────────────────────────────────────────
    //  Start autosave loop
    // ────────────────────────────────────────────────────────
    //
    {
        let db_clone = db.clone();
        let path = cfg.snapshot_path.clone();
        let interval = cfg.snapshot_interval;

        task::spawn(async move {
            autosave_loop(path, db_clone, interval).await;
        });
    }

    //
    // ────────────────────────────────────────────────────────
    //  Start cleanup loop (optional)
    // ────────────────────────────────────────────────────────
    //
    if let (Some(retention), Some(clean_interval)) = (cfg.retention_seconds, cfg.cleanup_interval)
    {
        let db_clone = db.clone();
        tracing::info!(
            "Starting cleanup loop: retention={}s, interval={}s",
            retention,
            clean_interval
        );

        task::spawn(async move {
            cleanup_loop(db_clone, retention, clean_interval).await;
        });
    }

    //
    // ────────────────────────────────────────────────────────
    //  Start the CLI on its own thread
    // ────────────────────────────────────────────────────────
    //
    let dictionary = SharedDictionary::new();
    {
        let dictionary = dictionary.clone();
        std::thread::Builder::new()
            .name("cli".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                if let Err(e) = cli::run(&dictionary, stdin.lock(), stdout.lock()) {
                    tracing::error!("CLI stopped: {e}");
                }
            })?;
    }

    //
    // ────────────────────────────────────────────────────────
    //  Build Axum app and start listening
    // ────────────────────────────────────────────────────────
    //
    let app = app::build_app(AppState::new(db.clone(), dictionary), cfg.clone());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown(db, cfg.snapshot_path.clone()))
        .await?;

    Ok(())
}

/// Look for config.json next to the executable, then one level up, then in
/// the working directory.
fn find_config() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
    {
        candidates.push(exe_dir.join("config.json"));
        candidates.push(exe_dir.join("..").join("config.json"));
    }
    candidates.push(PathBuf::from("config.json"));

    candidates.into_iter().find(|p| p.exists())
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown(db: WordDb, path: String) {
    shutdown_on(tokio::signal::ctrl_c(), db, path).await;
}

/// Wait for `signal`, then write the final snapshot. If the signal cannot be
/// installed this never resolves, so the server keeps running until killed.
async fn shutdown_on<F>(signal: F, db: WordDb, path: String)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::warn!("CTRL+C received — saving snapshot…");
    match save_snapshot(&path, &db).await {
        Ok(()) => tracing::info!("Snapshot saved. Goodbye."),
        Err(e) => tracing::error!("Final snapshot failed: {e}"),
    }
}
