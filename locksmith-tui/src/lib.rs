//! Locksmith TUI - live password strength in the terminal
//!
//! Keystrokes go to a [`LiveOrchestrator`]; every frame is drawn from its
//! latest snapshot. The headless [`check_password`] path reuses the same
//! client and resolver for one-shot analysis from the command line.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod input;
pub mod view;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use locksmith_core::{
    resolver, AnalysisResult, AnalysisService, DerivedMetrics, HttpAnalysisClient,
    LiveOrchestrator, LocksmithConfig, CONNECTIVITY_ERROR_MESSAGE,
};
use locksmith_utils::{get_logger, Logger};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use std::{
    io::{self, Stdout},
    sync::Arc,
    time::Duration,
};

pub use input::{InputAction, InputState};
pub use view::{ResultView, StatCard, ViewModel};

/// Redraw interval; also bounds how long a key press waits to be read
const TICK_RATE: Duration = Duration::from_millis(100);

/// Interactive password strength screen
pub struct LocksmithTui {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    input: InputState,
    orchestrator: LiveOrchestrator,
    tick: usize,
    logger: Logger,
}

impl LocksmithTui {
    /// Take over the terminal
    pub fn new(service: Arc<dyn AnalysisService>, config: &LocksmithConfig) -> Result<Self> {
        enable_raw_mode().map_err(|e| anyhow!("Failed to enable raw mode: {e}"))?;
        let mut stdout = io::stdout();

        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| anyhow!("Failed to initialize terminal: {e}"))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|e| anyhow!("Failed to create terminal: {e}"))?;

        let mut tui = Self::new_headless(service, config);
        tui.terminal = Some(terminal);
        Ok(tui)
    }

    /// Screen state without a terminal, for driving the app from code
    pub fn new_headless(service: Arc<dyn AnalysisService>, config: &LocksmithConfig) -> Self {
        let mut logger = get_logger("locksmith.tui");
        if let Ok(level) = config.log_level() {
            logger.set_level(level);
        }

        Self {
            terminal: None,
            input: InputState::new(),
            orchestrator: LiveOrchestrator::new(service, &config.orchestrator),
            tick: 0,
            logger,
        }
    }

    /// Apply a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.input.handle_key(key) {
            InputAction::Quit => return true,
            InputAction::Edited => self.orchestrator.set_input(self.input.text()),
            InputAction::ToggledMask | InputAction::Ignored => {}
        }
        false
    }

    pub fn view_model(&self) -> ViewModel {
        ViewModel::build(&self.input, &self.orchestrator.snapshot())
    }

    /// Run the event loop until Esc or Ctrl+C.
    ///
    /// Key polling blocks, so this needs the multi-threaded runtime.
    pub async fn run(&mut self) -> Result<()> {
        self.logger.info("session started");

        loop {
            self.draw()?;

            let polled = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
                if event::poll(TICK_RATE)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            })?;

            if let Some(Event::Key(key)) = polled {
                if key.kind == KeyEventKind::Press && self.handle_key(key) {
                    break;
                }
            }

            self.tick = self.tick.wrapping_add(1);
            tokio::task::yield_now().await;
        }

        self.orchestrator.shutdown();
        self.logger.info("session ended");
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let view = self.view_model();
        let tick = self.tick;
        if let Some(terminal) = &mut self.terminal {
            terminal.draw(|f| view::render(f, &view, tick))?;
        }
        Ok(())
    }
}

impl Drop for LocksmithTui {
    fn drop(&mut self) {
        if let Some(terminal) = &mut self.terminal {
            let _ = disable_raw_mode();
            let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
            let _ = terminal.show_cursor();
        }
    }
}

/// Create and run the TUI against the configured service
pub async fn run_tui(config: &LocksmithConfig) -> Result<()> {
    let client = HttpAnalysisClient::from_config(&config.service)?;
    tracing::info!(endpoint = client.endpoint(), "using analysis service");

    let mut tui = LocksmithTui::new(Arc::new(client), config)?;
    tui.run().await
}

/// One-shot analysis. Every failure reads as the connectivity message.
pub async fn check_password(service: &dyn AnalysisService, password: &str) -> Result<AnalysisResult> {
    if password.is_empty() {
        return Err(anyhow!("Password must not be empty"));
    }

    service.analyze(password).await.map_err(|e| {
        tracing::warn!(error = %e, "analysis request failed");
        anyhow!(CONNECTIVITY_ERROR_MESSAGE)
    })
}

/// Export an analysis with its derived metrics for programmatic consumption
pub fn export_structured_data(result: &AnalysisResult) -> Result<String> {
    #[derive(Serialize)]
    struct StructuredExport<'a> {
        metrics: DerivedMetrics,
        border_color: &'static str,
        verdict_color_hex: &'static str,
        issues: Vec<String>,
        character_types: Vec<CharacterTypeExport>,
        result: &'a AnalysisResult,
        timestamp: DateTime<Utc>,
    }

    #[derive(Serialize)]
    struct CharacterTypeExport {
        label: &'static str,
        present: bool,
    }

    let metrics = DerivedMetrics::resolve(Some(result));
    let export = StructuredExport {
        border_color: metrics.border_hex(),
        verdict_color_hex: metrics.verdict_color.hex(),
        metrics,
        issues: resolver::issues(result),
        character_types: resolver::char_class_rows(result)
            .into_iter()
            .map(|(class, present)| CharacterTypeExport {
                label: class.label(),
                present,
            })
            .collect(),
        result,
        timestamp: Utc::now(),
    };

    Ok(serde_json::to_string_pretty(&export)?)
}

/// Plain text rendering of the result panels
pub fn render_summary(result: &AnalysisResult) -> String {
    let view = ResultView::build(result);
    let metrics = &view.metrics;
    let mut lines = vec![format!(
        "{:<16} {} ({}/100)",
        "Strength:", metrics.verdict_label, metrics.score
    )];

    for card in &view.stat_cards {
        let label = format!("{}:", card.label);
        let flag = if card.alert { " !" } else { "" };
        let line = format!("{label:<16} {}{flag}", card.value);
        lines.push(match card.subtitle {
            Some(subtitle) => format!("{line}  ({subtitle})"),
            None => line,
        });
    }

    let classes: Vec<String> = view
        .char_classes
        .iter()
        .map(|(label, present)| format!("{label} {}", if *present { "✓" } else { "—" }))
        .collect();
    lines.push(format!("Character types: {}", classes.join("  ")));

    lines.push("Issues:".to_string());
    if view.issues.is_empty() {
        lines.push("  None detected.".to_string());
    }
    lines.extend(view.issues.iter().map(|issue| format!("  — {issue}")));

    lines.push("Suggestions:".to_string());
    if view.suggestions.is_empty() {
        lines.push("  No improvements needed.".to_string());
    }
    lines.extend(view.suggestions.iter().map(|suggestion| format!("  — {suggestion}")));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
