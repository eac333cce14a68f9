//! Ratatui-based terminal UI.
//!
//! The left panel is the parameter form; the right panel shows the live
//! gradation curve and the latest prediction. Submissions run on a worker
//! thread so the form stays editable while a request is outstanding.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::cli::TuiArgs;
use crate::client::PredictionService;
use crate::domain::{Field, FieldGroup};
use crate::error::AppError;
use crate::session::{Session, SubmissionState, SubmitError};

mod plotters_chart;

use plotters_chart::GradationChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let client = crate::app::pipeline::connect(&args.backend)?;
    let backend_url = client.config().backend_url.clone();

    let mut app = App::new(Arc::new(client), backend_url);
    // Fetched once in the background; failure only hides the header line.
    app.session.load_model_info_in_background(Arc::clone(&app.service));

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    session: Session,
    service: Arc<dyn PredictionService>,
    backend_url: String,
    selected: usize,
    /// Input buffer while a field is being typed into.
    editing: Option<String>,
    status: String,
}

impl App {
    fn new(service: Arc<dyn PredictionService>, backend_url: String) -> Self {
        Self {
            session: Session::new(),
            service,
            backend_url,
            selected: 0,
            editing: None,
            status: "Ready.".to_string(),
        }
    }

    fn selected_field(&self) -> Field {
        Field::ALL[self.selected]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.session.poll_submission() {
                self.status = settled_status(self.session.state());
                needs_redraw = true;
            }
            if self.session.poll_model_info() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(Field::COUNT - 1),
            KeyCode::Left => self.step_selected(-1),
            KeyCode::Right => self.step_selected(1),
            KeyCode::PageDown => self.step_selected(-10),
            KeyCode::PageUp => self.step_selected(10),
            KeyCode::Enter => {
                let field = self.selected_field();
                let p = field.display_precision();
                self.editing = Some(format!("{:.p$}", self.session.params().get(field)));
                self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label());
            }
            KeyCode::Char('p') => self.submit(),
            KeyCode::Char('x') => {
                self.session.reset_fields();
                self.status = "All parameters reset to defaults.".to_string();
            }
            KeyCode::Esc => {
                self.session.dismiss();
                self.status = "Ready.".to_string();
            }
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let raw = std::mem::take(buffer);
                self.editing = None;
                let field = self.selected_field();
                self.status = match self.session.set_field(field, &raw) {
                    Ok(params) => format!("{} = {}", field.label(), params.get(field)),
                    Err(err) => format!("Rejected: {err}"),
                };
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') => {
                buffer.push(c);
            }
            _ => {}
        }
    }

    fn step_selected(&mut self, steps: i32) {
        let field = self.selected_field();
        self.status = match self.session.step_field(field, steps) {
            Ok(params) => {
                let p = field.display_precision();
                format!("{} = {:.p$}", field.label(), params.get(field))
            }
            Err(err) => format!("Rejected: {err}"),
        };
    }

    fn submit(&mut self) {
        match self.session.submit_in_background(Arc::clone(&self.service)) {
            Ok(()) => self.status = "Predicting...".to_string(),
            Err(SubmitError::InFlight) => self.status = "A prediction is already running.".to_string(),
            Err(err) => self.status = format!("Prediction failed: {err}"),
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("vma", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | asphalt mix VMA prediction | backend: {}", self.backend_url)),
        ]));
        if let Some(line) = self.model_line() {
            lines.push(Line::from(Span::styled(line, Style::default().fg(Color::Gray))));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn model_line(&self) -> Option<String> {
        match self.session.model_info() {
            Some(info) => Some(format!(
                "model: {} | R²={} | RMSE={}",
                info.model_type, info.r2_score, info.rmse
            )),
            None if self.session.is_loading_model_info() => Some("model: loading...".to_string()),
            None => None,
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(columns[1]);

        self.draw_chart(frame, right[0]);
        self.draw_result(frame, right[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let params = self.session.params();
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .enumerate()
            .map(|(i, &field)| {
                let value = match (&self.editing, i == self.selected) {
                    (Some(buffer), true) => format!("{buffer}_"),
                    _ => {
                        let p = field.display_precision();
                        format!("{:.p$}", params.get(field))
                    }
                };
                let style = match field.group() {
                    FieldGroup::Mix => Style::default().fg(Color::White),
                    FieldGroup::Gradation => Style::default().fg(Color::Gray),
                };
                ListItem::new(format!(
                    "{:<19} {:>8} [{}-{}]",
                    field.label(),
                    value,
                    field.min(),
                    field.max()
                ))
                .style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Mix Design Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Live Gradation Curve").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        // Recomputed from the store on every draw.
        let curve = self.session.curve();
        let points: Vec<(f64, f64)> = curve
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.percent_passing))
            .collect();
        let labels: Vec<&'static str> = curve.iter().map(|p| p.label).collect();
        let inverted = curve.non_monotone_pairs();
        let flagged: Vec<(f64, f64)> = points
            .iter()
            .zip(curve.iter())
            .filter(|(_, p)| inverted.iter().any(|(_, finer)| *finer == p.field))
            .map(|(xy, _)| *xy)
            .collect();

        frame.render_widget(
            GradationChart {
                points: &points,
                labels: &labels,
                flagged: &flagged,
            },
            inner,
        );
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        match self.session.state() {
            SubmissionState::Submitting => lines.push(Line::from(Span::styled(
                "Predicting...",
                Style::default().fg(Color::Yellow),
            ))),
            SubmissionState::Failed(err) => lines.push(Line::from(Span::styled(
                format!("Prediction failed: {err} (p to retry)"),
                Style::default().fg(Color::Red),
            ))),
            SubmissionState::Idle | SubmissionState::Succeeded(_) => {}
        }

        match self.session.prediction() {
            Some(result) => {
                lines.push(Line::from(vec![
                    Span::raw("Predicted VMA: "),
                    Span::styled(
                        format!("{:.2}%", result.predicted_vma),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  confidence: {}", result.confidence)),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("predicted on {}", result.timestamp),
                    Style::default().fg(Color::Gray),
                )));
            }
            None if lines.is_empty() => lines.push(Line::from(Span::styled(
                "No prediction yet. Press p to predict.",
                Style::default().fg(Color::Gray),
            ))),
            None => {}
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Prediction").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ step  PgUp/PgDn ×10  Enter type value  p predict  x reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn settled_status(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Succeeded(result) => format!("Predicted VMA {:.2}%.", result.predicted_vma),
        SubmissionState::Failed(err) => format!("Prediction failed: {err}"),
        SubmissionState::Idle | SubmissionState::Submitting => "Ready.".to_string(),
    }
}
