mod app_service;
mod app_state;
mod catalog;
mod commands;
mod ui;

use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::mpsc;

use crate::app_service::run_refresh;
use crate::app_state::{App, AppEvent};
use crate::catalog::ENV_CSV_URL;
use crate::commands::AppCommand;
use crate::ui::draw;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // The TUI owns the terminal, so logs go to a file.
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_dir = std::path::PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join(format!("app-{}.log", ts));
    let log_file = std::fs::File::create(log_path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("scentdeck", log::LevelFilter::Info)
        .init();

    let mut startup_info = Vec::new();

    let current_dir = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    startup_info.push(format!("Working directory: {}", current_dir.display()));

    // Load .env by hand (KEY=VALUE lines, # comments, quote trimming),
    // falling back to the process environment.
    let env_path = current_dir.join(".env");
    if env_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&env_path) {
            startup_info.push(format!("✓ Loaded .env file: {}", env_path.display()));
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some(equal_pos) = line.find('=') {
                    let key = line[..equal_pos].trim();
                    let value = line[equal_pos + 1..].trim();
                    let value = value.trim_matches(|c| c == '"' || c == '\'');
                    std::env::set_var(key, value);
                }
            }
        } else {
            startup_info.push("⚠ Could not read .env file".to_string());
        }
    } else {
        startup_info.push(format!(
            "⚠ No .env file at {}, using process environment",
            env_path.display()
        ));
    }

    match std::env::var(ENV_CSV_URL) {
        Ok(url) => startup_info.push(format!("✓ {} = {}", ENV_CSV_URL, url)),
        Err(_) => {
            startup_info.push(format!("✗ {} is not set", ENV_CSV_URL));
            startup_info.push(format!(
                "  Add {}=https://... to .env to enable fetching",
                ENV_CSV_URL
            ));
        }
    }

    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();

    // Single background actor: owns the HTTP side, processes commands
    // serially, so at most one fetch is in flight.
    let evt_tx_bg = evt_tx.clone();
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                AppCommand::Refresh => {
                    run_refresh(&evt_tx_bg).await;
                }
                AppCommand::Help => {
                    let _ = evt_tx_bg.send(AppEvent::Message(
                        "Commands: refresh | filter <text> | family <name|all> | status <name|any> | scope any|top|heart|base | help | quit"
                            .to_string(),
                    ));
                }
                // Quit is handled on the UI side; it never reaches the actor.
                AppCommand::Quit => {}
                AppCommand::Unknown(msg) => {
                    let _ = evt_tx_bg.send(AppEvent::Message(format!("✗ {}", msg)));
                }
            }
        }
    });

    // Fetch once on startup, like a page load.
    let _ = cmd_tx.send(AppCommand::Refresh);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(startup_info, cmd_tx, evt_rx);

    let rx = app.evt_rx.take().unwrap();
    let res = run_app_loop(&mut terminal, &mut app, rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        while let Ok(event) = evt_rx.try_recv() {
            match event {
                AppEvent::Message(msg) => app.add_log(msg),
                AppEvent::Error(msg) => app.set_error(msg),
                AppEvent::Loading => {
                    app.loading = true;
                    app.add_log("Fetching catalog…".to_string());
                }
                AppEvent::Scents(list) => app.set_dataset(list),
            }
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.handle_key_event(key.code) {
                        return Ok(());
                    }
                }
            }
        }
    }
}
