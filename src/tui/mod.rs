//! Terminal UI for the chessboard.

mod app;
mod input;
mod layout;
mod orchestrator;
mod players;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use strictly_chess::BoardSession;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use crate::app_config::AppConfig;
use app::App;
use orchestrator::{GameEvent, Orchestrator};

pub use input::{PointerAction, PromotionPanel, pointer_action};
pub use layout::BoardLayout;
pub use players::{Player, SimpleEngine};

/// Runs the interactive board until the user quits.
pub async fn run_tui(config: AppConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!("Starting Strictly Chessboard TUI");

    let (session, board_rx) =
        BoardSession::new(*config.board(), 0.0, config.termination_delay());
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let orchestrator = Orchestrator::new(
        session.clone(),
        Box::new(SimpleEngine::new(
            format!("{} (engine)", config.white_name()),
            config.engine_delay(),
        )),
        Box::new(SimpleEngine::new(
            format!("{} (engine)", config.black_name()),
            config.engine_delay(),
        )),
        board_rx,
        event_tx,
    );
    let orchestration = tokio::spawn(async move {
        if let Err(e) = orchestrator.run().await {
            error!(error = %e, "Orchestrator stopped");
        }
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, config);
    let res = run_app(&mut terminal, &mut app, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    orchestration.abort();

    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()> {
    app.restart().await;

    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        let size = terminal.size()?;
        app.fit(ui::board_region(Rect::new(0, 0, size.width, size.height)))
            .await;

        {
            let session = app.session().clone();
            let board = session.lock().await;
            terminal.draw(|f| ui::draw(f, app, &board))?;
        }

        if app.should_quit() {
            return Ok(());
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code).await;
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse).await,
                Event::FocusLost => app.pointer_leave().await,
                _ => {}
            }
        }
    }
}
