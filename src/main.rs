//! Vet booking TUI - book a veterinary appointment from the terminal
//!
//! A Ratatui-based form that loads the doctor directory from the scheduling
//! service, validates the appointment and submits it once.

mod app;
mod auth;
mod config;
mod scheduling;
mod state;
mod ui;
mod workflow;

use anyhow::Result;
use app::{App, AppEvent};
use auth::{CredentialChain, EnvCredential, TokenFile};
use config::BookingConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use scheduling::HttpSchedulingClient;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workflow::{Completion, FormSession};

/// How long the loop waits for a network outcome before polling input again
const TICK: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vet_booking_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = BookingConfig::load()?;
    let session = build_session(&config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(session, tx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();
    let result = run_app(&mut terminal, &mut app, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    match app.into_completion() {
        Some(Completion::Closed(appointment)) => {
            let draft = appointment.draft();
            println!(
                "Booked {} with {} at {}",
                draft.pet_name,
                appointment.doctor_name(),
                appointment.appointment_time_utc()
            );
        }
        Some(Completion::Abandoned) => println!(
            "Booking interrupted before the service answered; it may have been created. \
             Check with the clinic before booking again"
        ),
        Some(Completion::Cancelled) | None => println!("Booking cancelled"),
    }

    Ok(())
}

fn build_session(config: &BookingConfig) -> Result<FormSession> {
    let base_url = config.api_base_url();
    tracing::info!("Using scheduling service at {base_url}");
    let api = HttpSchedulingClient::new(&base_url, config.request_timeout())?;

    let mut credentials = CredentialChain::new().with(EnvCredential::from_default_env());
    if let Some(path) = config.token_path() {
        credentials = credentials.with(TokenFile::new(path));
    }

    Ok(FormSession::new(
        Arc::new(api),
        Arc::new(credentials),
        config.local_zone()?,
    ))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Let spawned requests progress, waking early when one reports back
        tokio::select! {
            Some(event) = events.recv() => app.handle_event(event),
            _ = tokio::time::sleep(TICK) => {}
        }

        // Drain pending terminal input without blocking the runtime
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
