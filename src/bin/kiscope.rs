// Terminal UI binary for kiscope
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use kiscope::{
    app::{App, AppSettings, InputMode},
    config::{load, Config},
    dragonball_api::HttpCharacterApi,
    gemini::{GeminiClient, TextGenerator},
    speech::ProcessSpeaker,
    types::AppEvent,
    ui,
    worker::{run_worker, Request, Services},
};

/// Generation is slow; never give it less than this.
const MIN_GENERATION_TIMEOUT_MS: u64 = 30_000;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    init_logging(&cfg)?;
    cfg.log_summary();

    // worker + channels
    let (ev_tx, ev_rx) = unbounded_channel::<AppEvent>();
    let (req_tx, req_rx) = unbounded_channel::<Request>();
    let services = build_services(&cfg);
    let worker_task = tokio::spawn(run_worker(services, req_rx, ev_tx.clone()));

    // SIGINT outside raw mode (e.g. during startup) still quits cleanly
    let quit_tx = ev_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = quit_tx.send(AppEvent::Quit);
        }
    });

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(AppSettings::from_config(&cfg), req_tx);
    // Detail routes go through the list so Esc has somewhere to return to
    app.navigate(kiscope::router::Route::List);
    if cfg.start_route != kiscope::router::Route::List {
        log::info!("Starting at route {}", cfg.start_route.path());
        app.navigate(cfg.start_route);
    }

    let result = run_loop(&mut app, &mut terminal, ev_rx).await;

    // cleanup: unmount cancels speech and any in-flight requests
    if !app.quit_flag() {
        app.quit();
    }
    drop(app);
    worker_task.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::info!("kiscope exited");
    result
}

fn init_logging(cfg: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)
        .with_context(|| format!("Failed to open log file {}", cfg.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn build_services(cfg: &Config) -> Services {
    let generator = GeminiClient::from_key(
        cfg.gemini_api_key.as_deref(),
        &cfg.gemini_api_url,
        &cfg.gemini_model,
        cfg.http_timeout_ms.max(MIN_GENERATION_TIMEOUT_MS),
    )
    .map(|g| Arc::new(g) as Arc<dyn TextGenerator>);

    Services {
        api: Arc::new(HttpCharacterApi::new(cfg.api_url.clone(), cfg.http_timeout_ms)),
        generator,
        speaker: Arc::new(ProcessSpeaker::new(cfg.speech_command.clone())),
    }
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k);
                }
            }
        }

        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }

        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, k: KeyEvent) {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys
    match (k.code, ctrl) {
        (KeyCode::Char('c'), true) => {
            app.quit();
            return;
        }
        (KeyCode::Char('d'), true) => {
            app.toggle_debug_panel();
            return;
        }
        _ => {}
    }

    if app.input_mode() == InputMode::Search {
        match k.code {
            KeyCode::Char('u') if ctrl => app.search_clear(),
            KeyCode::Char(c) => app.search_add_char(c),
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Enter => app.submit_search(),
            KeyCode::Esc => app.cancel_search_input(),
            _ => {}
        }
        return;
    }

    match k.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('/') => app.start_search_input(),
        KeyCode::Up | KeyCode::Char('k') => app.up(),
        KeyCode::Down | KeyCode::Char('j') => app.down(),
        KeyCode::Left | KeyCode::Char('h') => app.left(),
        KeyCode::Right | KeyCode::Char('l') => app.right(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('g') => app.generate_description(),
        KeyCode::Char('s') => app.toggle_speech(),
        KeyCode::Char('f') if ctrl => app.cycle_fps(),
        _ => {}
    }
}
