mod app;
mod cache;
mod config;
mod events;
mod spotify;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use moodlist::mood::{KnnModel, MoodEngine, ReferenceDataset};

use crate::{app::App, cache::TokenCache, config::Config};

const LOG_PATH: &str = "/tmp/moodlist.log";

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("moodlist=info"));
    // Write logs to file so they don't corrupt the TUI
    if let Ok(file) = std::fs::File::create(LOG_PATH) {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    // ── Load config, dataset and model (shared, read-only) ───────────────────
    let config = Config::load()?;

    let dataset = ReferenceDataset::load(&config.dataset_path)
        .with_context(|| format!("Failed to load reference dataset {}", config.dataset_path.display()))?;
    let model = KnnModel::load(&config.model_path).with_context(|| {
        format!(
            "Failed to load model {} (run `train-model` first)",
            config.model_path.display()
        )
    })?;
    let engine = MoodEngine::new(dataset, model);

    // ── Token cache (optional, app works without it) ─────────────────────────
    let cache = Arc::new(TokenCache::new(&config.redis_url, &config.profile)?);
    if cache.ping().await {
        tracing::info!("Redis connected at {}", config.redis_url);
    } else {
        tracing::warn!("Redis not reachable, token caching disabled");
    }

    // ── Terminal setup ────────────────────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // ── Panic hook to restore terminal on crash ──────────────────────────────
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        disable_raw_mode().ok();
        execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen).ok();
        original_hook(panic_info);
    }));

    // ── Run the app ──────────────────────────────────────────────────────────
    let result = {
        let mut app = App::new(config, cache, engine);
        app.run(&mut terminal).await
    };

    // ── Restore terminal ─────────────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!("App error: {e:?}");
        eprintln!("\n\x1b[31mmoodlist crashed:\x1b[0m {e}");
        eprintln!("Check {LOG_PATH} for details");
    }

    Ok(())
}
