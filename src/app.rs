use std::io::Stdout;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tokio::runtime::Handle;

use crate::config::Settings;
use crate::controller::{Controller, lock};
use crate::input::handle_key;
use crate::models::FocusArea;
use crate::network::PredictionClient;
use crate::theme::Theme;
use crate::ui::render_form;

/// State of the interactive form that is not part of the controller.
pub struct App {
    pub controller: Arc<Mutex<Controller>>,
    pub client: PredictionClient,
    pub currency: String,
    pub focus: usize,
    /// One-line feedback such as "copied to clipboard".
    pub notice: Option<String>,
}

impl App {
    pub fn new(
        controller: Controller,
        client: PredictionClient,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            client,
            currency: currency.into(),
            focus: 0,
            notice: None,
        }
    }

    pub fn focus_area(&self) -> FocusArea {
        FocusArea::from_index(self.focus)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FocusArea::COUNT;
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FocusArea::COUNT - 1) % FocusArea::COUNT;
    }
}

/// Leaves raw mode and the alternate screen when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(std::io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Runs the form until the user quits. The terminal is restored on every exit path.
pub fn run(settings: &Settings, client: PredictionClient, handle: &Handle) -> Result<()> {
    let mut app = App::new(
        Controller::new(settings.conversion_rate),
        client,
        settings.currency.clone(),
    );

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    event_loop(&mut terminal, &mut app, handle)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    handle: &Handle,
) -> Result<()> {
    let theme = Theme::default();
    loop {
        {
            let view: &App = app;
            let ctl = lock(&view.controller);
            terminal.draw(|f| render_form(f, view, &ctl, &theme))?;
        }

        // Short poll so a settled request shows up without a key press.
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key_event) = event::read()? {
                if !handle_key(key_event, app, handle)? {
                    break;
                }
            }
        }
    }
    tracing::info!("form closed");
    Ok(())
}
