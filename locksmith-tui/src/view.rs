//! Screen model and rendering
//!
//! [`ViewModel`] is built from the input field and the latest orchestrator
//! snapshot, and is everything the renderer needs. Rendering itself is a
//! set of free functions over a ratatui [`Frame`].

use locksmith_core::resolver::{self, ColorToken, DerivedMetrics};
use locksmith_core::{AnalysisResult, AnalysisSnapshot, AnalysisStatus, Palette};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::input::InputState;

/// Terminal width at which stat cards sit in one row
pub const WIDE_LAYOUT_MIN_COLS: u16 = 100;

pub const TITLE: &str = "Locksmith";
pub const SUBTITLE: &str = "PASSWORD STRENGTH ANALYZER";
pub const TAGLINE: &str = "Analyze entropy, detect patterns, and check against known data breaches.";
pub const PLACEHOLDER: &str = "Type your password…";
pub const EMPTY_STATE: &str = "Waiting for input…";
pub const BREACH_NOTE: &str =
    "Breach check via HaveIBeenPwned · k-anonymity · no password transmitted";
pub const CRACK_TIME_NOTE: &str = "offline · 10B guesses/sec";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    /// Draw the value in the alert color
    pub alert: bool,
    pub subtitle: Option<&'static str>,
}

/// Everything shown once a result is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub metrics: DerivedMetrics,
    pub stat_cards: Vec<StatCard>,
    pub char_classes: Vec<(&'static str, bool)>,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ResultView {
    pub fn build(result: &AnalysisResult) -> Self {
        let metrics = DerivedMetrics::resolve(Some(result));
        let (breach_value, breach_note) = resolver::breach_summary(result.breached);

        let stat_cards = vec![
            StatCard {
                label: "Entropy",
                value: format!("{} bits", result.entropy),
                alert: false,
                subtitle: None,
            },
            StatCard {
                label: "Length",
                value: format!("{} chars", result.length),
                alert: false,
                subtitle: None,
            },
            StatCard {
                label: "Time to crack",
                value: result.crack_time.clone(),
                alert: metrics.fast_crack,
                subtitle: Some(CRACK_TIME_NOTE),
            },
            StatCard {
                label: "Breach check",
                value: breach_value.to_string(),
                alert: result.breached,
                subtitle: Some(breach_note),
            },
        ];

        Self {
            metrics,
            stat_cards,
            char_classes: resolver::char_class_rows(result)
                .into_iter()
                .map(|(class, present)| (class.label(), present))
                .collect(),
            issues: resolver::issues(result),
            suggestions: result.recommendations.clone(),
        }
    }
}

/// Screen state for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub input_display: String,
    pub input_empty: bool,
    pub masked: bool,
    pub border_hex: &'static str,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

impl ViewModel {
    pub fn build(input: &InputState, snapshot: &AnalysisSnapshot) -> Self {
        let result = snapshot.result.as_ref().map(ResultView::build);
        let border_hex = result
            .as_ref()
            .map_or(Palette::BORDER, |view| view.metrics.border_hex());

        Self {
            input_display: input.display(),
            input_empty: input.is_empty(),
            masked: input.is_masked(),
            border_hex,
            loading: snapshot.status == AnalysisStatus::Loading,
            error: snapshot.status.error_message().map(str::to_string),
            result,
        }
    }

    pub fn show_empty_state(&self) -> bool {
        self.input_empty && !self.loading
    }
}

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Resolve a palette hex string to a terminal color
pub fn color(hex: &str) -> Color {
    Palette::rgb(hex).map_or(Color::Reset, |(r, g, b)| Color::Rgb(r, g, b))
}

fn token_color(token: ColorToken) -> Color {
    color(token.hex())
}

fn muted() -> Style {
    Style::default().fg(color(Palette::MUTED))
}

/// Longest suffix of `text` that fits in `width` columns
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

/// Draw a whole frame
pub fn render(f: &mut Frame, view: &ViewModel, tick: usize) {
    let size = f.size();
    f.render_widget(
        Block::default().style(
            Style::default()
                .bg(color(Palette::BACKGROUND))
                .fg(color(Palette::TEXT)),
        ),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Input
            Constraint::Length(1), // Error
            Constraint::Length(3), // Score
            Constraint::Min(0),    // Results
            Constraint::Length(2), // Footer
        ])
        .split(size);

    render_header(f, chunks[0]);
    render_input(f, chunks[1], view, tick);
    if let Some(error) = &view.error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(color(Palette::RED))),
            chunks[2],
        );
    }

    match &view.result {
        Some(result) => {
            render_score(f, chunks[3], result, view.border_hex);
            render_results(f, chunks[4], result, size.width >= WIDE_LAYOUT_MIN_COLS);
        }
        None if view.show_empty_state() => {
            f.render_widget(
                Paragraph::new(EMPTY_STATE).style(Style::default().fg(color(Palette::BORDER))),
                chunks[4],
            );
        }
        None => {}
    }

    render_footer(f, chunks[5], view.result.is_some());
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, muted())),
        Line::from(Span::styled(TAGLINE, muted())),
    ]);
    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, view: &ViewModel, tick: usize) {
    let toggle = if view.masked { "show" } else { "hide" };
    let right_title = if view.loading {
        format!(" {} {toggle} ", spinner_frame(tick))
    } else {
        format!(" {toggle} ")
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(view.border_hex)))
        .title(" Password ")
        .title(Title::from(right_title).alignment(Alignment::Right));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if view.input_empty {
        f.render_widget(
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(color(Palette::BORDER))),
            inner,
        );
        f.set_cursor(inner.x, inner.y);
        return;
    }

    let shown = visible_tail(&view.input_display, usize::from(inner.width.saturating_sub(1)));
    f.render_widget(Paragraph::new(shown), inner);

    let offset = u16::try_from(shown.width()).unwrap_or(inner.width);
    f.set_cursor(inner.x + offset.min(inner.width.saturating_sub(1)), inner.y);
}

fn render_score(f: &mut Frame, area: Rect, result: &ResultView, border_hex: &str) {
    let metrics = &result.metrics;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(border_hex)))
                .title(" Strength "),
        )
        .gauge_style(
            Style::default()
                .fg(token_color(metrics.verdict_color))
                .bg(color(Palette::BORDER)),
        )
        .percent(u16::from(metrics.score))
        .label(Span::styled(
            metrics.verdict_label,
            Style::default().add_modifier(Modifier::BOLD),
        ));
    f.render_widget(gauge, area);
}

fn render_results(f: &mut Frame, area: Rect, result: &ResultView, wide: bool) {
    if wide {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);
        for (card, slot) in result.stat_cards.iter().zip(cards.iter()) {
            render_stat_card(f, *slot, card);
        }

        let lists = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(rows[1]);
        render_lists(f, &lists, result);
    } else {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(area);
        for (row, pair) in rows.iter().take(2).zip(result.stat_cards.chunks(2)) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2); 2])
                .split(*row);
            for (card, slot) in pair.iter().zip(cells.iter()) {
                render_stat_card(f, *slot, card);
            }
        }

        let lists = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(rows[2]);
        render_lists(f, &lists, result);
    }
}

fn render_stat_card(f: &mut Frame, area: Rect, card: &StatCard) {
    let value_color = if card.alert {
        color(Palette::RED)
    } else {
        color(Palette::TEXT)
    };

    let mut lines = vec![Line::from(Span::styled(
        card.value.clone(),
        Style::default().fg(value_color).add_modifier(Modifier::BOLD),
    ))];
    if let Some(subtitle) = card.subtitle {
        lines.push(Line::from(Span::styled(subtitle, muted())));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(Palette::BORDER)))
            .title(Span::styled(card.label.to_uppercase(), muted())),
    );
    f.render_widget(paragraph, area);
}

fn section(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(color(Palette::BORDER)))
        .title(Span::styled(title, muted()))
}

fn render_lists(f: &mut Frame, areas: &[Rect], result: &ResultView) {
    let char_lines: Vec<Line> = result
        .char_classes
        .iter()
        .map(|(label, present)| {
            let (mark, style) = if *present {
                ("✓", Style::default().fg(color(Palette::TEXT)))
            } else {
                ("—", Style::default().fg(color(Palette::BORDER)))
            };
            let label_style = if *present { Style::default() } else { muted() };
            Line::from(vec![
                Span::styled(format!("{label:<12}"), label_style),
                Span::styled(mark, style),
            ])
        })
        .collect();

    let issue_lines: Vec<Line> = if result.issues.is_empty() {
        vec![Line::from(Span::styled("None detected.", muted()))]
    } else {
        result
            .issues
            .iter()
            .map(|issue| {
                Line::from(Span::styled(
                    format!("— {issue}"),
                    Style::default().fg(color(Palette::RED)),
                ))
            })
            .collect()
    };

    let suggestion_lines: Vec<Line> = if result.suggestions.is_empty() {
        vec![Line::from(Span::styled("No improvements needed.", muted()))]
    } else {
        result
            .suggestions
            .iter()
            .map(|suggestion| Line::from(format!("— {suggestion}")))
            .collect()
    };

    let sections = [
        ("CHARACTER TYPES", char_lines),
        ("ISSUES", issue_lines),
        ("SUGGESTIONS", suggestion_lines),
    ];
    for ((title, lines), area) in sections.into_iter().zip(areas.iter()) {
        f.render_widget(
            Paragraph::new(lines)
                .block(section(title))
                .wrap(Wrap { trim: true }),
            *area,
        );
    }
}

fn render_footer(f: &mut Frame, area: Rect, has_result: bool) {
    let key = Style::default()
        .fg(color(Palette::TEXT))
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::with_capacity(2);
    lines.push(if has_result {
        Line::from(Span::styled(
            BREACH_NOTE,
            Style::default().fg(color(Palette::BORDER)),
        ))
    } else {
        Line::from("")
    });
    lines.push(Line::from(vec![
        Span::styled("Esc", key),
        Span::styled(":quit ", muted()),
        Span::styled("Tab", key),
        Span::styled(":show/hide ", muted()),
        Span::styled("Ctrl+U", key),
        Span::styled(":clear", muted()),
    ]));

    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use locksmith_core::{CharClass, Verdict, CONNECTIVITY_ERROR_MESSAGE};
    use ratatui::{backend::TestBackend, Terminal};

    fn weak_result() -> AnalysisResult {
        let mut result = AnalysisResult::new(20.0, Verdict::Weak, "3 seconds");
        result.length = 8;
        result.char_sets = vec![CharClass::Lower, CharClass::Digit];
        result.penalties = vec!["Common dictionary word".to_string()];
        result.recommendations = vec!["Use at least 14 characters".to_string()];
        result.has_leetspeak = true;
        result.breached = true;
        result
    }

    fn strong_result() -> AnalysisResult {
        let mut result = AnalysisResult::new(100.0, Verdict::Strong, "centuries");
        result.length = 20;
        result.char_sets = CharClass::ALL.to_vec();
        result
    }

    fn typed(text: &str) -> InputState {
        let mut input = InputState::new();
        for c in text.chars() {
            input.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        input
    }

    fn snapshot(status: AnalysisStatus, result: Option<AnalysisResult>) -> AnalysisSnapshot {
        AnalysisSnapshot {
            status,
            result,
            ..AnalysisSnapshot::idle(1)
        }
    }

    fn screen_text(view: &ViewModel, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, view, 0)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_stat_cards_for_weak_result() {
        let view = ResultView::build(&weak_result());

        let values: Vec<&str> = view.stat_cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["20 bits", "8 chars", "3 seconds", "Found"]);

        let crack = &view.stat_cards[2];
        assert!(crack.alert);
        assert_eq!(crack.subtitle, Some(CRACK_TIME_NOTE));

        let breach = &view.stat_cards[3];
        assert!(breach.alert);
        assert_eq!(breach.subtitle, Some("In known breach DB"));

        assert_eq!(
            view.issues,
            ["Common dictionary word", "Predictable leetspeak", "Found in data breach"]
        );
        assert_eq!(
            view.char_classes,
            [
                ("Lowercase", true),
                ("Uppercase", false),
                ("Numbers", true),
                ("Symbols", false)
            ]
        );
    }

    #[test]
    fn test_stat_cards_for_strong_result() {
        let view = ResultView::build(&strong_result());

        assert!(!view.stat_cards[2].alert);
        assert_eq!(view.stat_cards[3].value, "Clean");
        assert_eq!(view.stat_cards[3].subtitle, Some("Not in breach DB"));
        assert!(view.issues.is_empty());
        assert!(view.char_classes.iter().all(|(_, present)| *present));
    }

    #[test]
    fn test_fractional_entropy_is_shown_as_is() {
        let view = ResultView::build(&AnalysisResult::new(48.7, Verdict::Weak, "4 hours"));
        assert_eq!(view.stat_cards[0].value, "48.7 bits");
    }

    #[test]
    fn test_idle_view() {
        let view = ViewModel::build(&InputState::new(), &AnalysisSnapshot::idle(0));

        assert!(view.show_empty_state());
        assert_eq!(view.border_hex, Palette::BORDER);
        assert!(view.result.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn test_border_follows_risk_band() {
        let input = typed("abc");
        let weak = ViewModel::build(&input, &snapshot(AnalysisStatus::Success, Some(weak_result())));
        assert_eq!(weak.border_hex, Palette::BAND_CRITICAL);

        let strong = ViewModel::build(
            &input,
            &snapshot(AnalysisStatus::Success, Some(strong_result())),
        );
        assert_eq!(strong.border_hex, Palette::BAND_STRONG);
    }

    #[test]
    fn test_loading_and_error_flags() {
        let input = typed("abc");

        let loading = ViewModel::build(&input, &snapshot(AnalysisStatus::Loading, None));
        assert!(loading.loading);
        assert!(!loading.show_empty_state());

        let failed = ViewModel::build(
            &input,
            &snapshot(
                AnalysisStatus::Error(CONNECTIVITY_ERROR_MESSAGE.to_string()),
                None,
            ),
        );
        assert_eq!(failed.error.as_deref(), Some(CONNECTIVITY_ERROR_MESSAGE));
        assert!(!failed.loading);
    }

    #[test]
    fn test_masked_display() {
        let view = ViewModel::build(&typed("abc"), &AnalysisSnapshot::idle(0));
        assert_eq!(view.input_display, "•••");
        assert!(view.masked);
    }

    #[test]
    fn test_visible_tail() {
        assert_eq!(visible_tail("abcdef", 3), "def");
        assert_eq!(visible_tail("abc", 10), "abc");
        assert_eq!(visible_tail("abc", 0), "");
        // double-width characters take two columns
        assert_eq!(visible_tail("a漢字", 4), "漢字");
        assert_eq!(visible_tail("a漢字", 3), "字");
    }

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER.len()));
    }

    #[test]
    fn test_render_wide_result() {
        let view = ViewModel::build(
            &typed("hunter2"),
            &snapshot(AnalysisStatus::Success, Some(weak_result())),
        );
        let text = screen_text(&view, 120, 40);

        assert!(text.contains(TITLE));
        assert!(text.contains("20 bits"));
        assert!(text.contains("Found"));
        assert!(text.contains("Predictable leetspeak"));
        assert!(text.contains("Use at least 14 characters"));
        assert!(text.contains("Weak"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn test_render_narrow_result() {
        let view = ViewModel::build(
            &typed("abc"),
            &snapshot(AnalysisStatus::Success, Some(strong_result())),
        );
        let text = screen_text(&view, 60, 40);

        assert!(text.contains("Clean"));
        assert!(text.contains("None detected."));
        assert!(text.contains("No improvements needed."));
    }

    #[test]
    fn test_render_empty_state_and_error() {
        let idle = ViewModel::build(&InputState::new(), &AnalysisSnapshot::idle(0));
        let text = screen_text(&idle, 80, 24);
        assert!(text.contains(EMPTY_STATE));
        assert!(text.contains(PLACEHOLDER));

        let failed = ViewModel::build(
            &typed("abc"),
            &snapshot(
                AnalysisStatus::Error(CONNECTIVITY_ERROR_MESSAGE.to_string()),
                None,
            ),
        );
        let text = screen_text(&failed, 80, 24);
        assert!(text.contains(CONNECTIVITY_ERROR_MESSAGE));
        assert!(!text.contains(EMPTY_STATE));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let view = ViewModel::build(
            &typed("abc"),
            &snapshot(AnalysisStatus::Loading, Some(weak_result())),
        );
        screen_text(&view, 10, 5);
    }
}
