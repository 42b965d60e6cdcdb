use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use finhealth::dashboard::{forecast_line, security_line, ADVICE_TITLE, CHART_TITLE};
use finhealth::{
    format_amount, Completion, DashboardView, Hue, MetricCard, Notice, NoticeKind, Report,
    ReportSink, UploadController, UploadFile,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, warn};

const BAR_SCALE: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingPath,
}

pub struct App {
    pub controller: UploadController,
    pub input_mode: InputMode,
    pub path_input: String,
    pub should_quit: bool,
    sink: Box<dyn ReportSink>,
    runtime: Handle,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
}

impl App {
    pub fn new(controller: UploadController, sink: Box<dyn ReportSink>, runtime: Handle) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();

        Self {
            controller,
            input_mode: InputMode::Normal,
            path_input: String::new(),
            should_quit: false,
            sink,
            runtime,
            completions_tx,
            completions_rx,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Left | KeyCode::Char('h') => {
                    let industry = self.controller.selection().industry.previous();
                    self.controller.select_industry(industry);
                }
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('i') => {
                    let industry = self.controller.selection().industry.next();
                    self.controller.select_industry(industry);
                }
                KeyCode::Char('f') => {
                    self.path_input.clear();
                    self.input_mode = InputMode::EditingPath;
                }
                KeyCode::Char('s') | KeyCode::Enter => self.submit(),
                KeyCode::Char('p') => self.export_report(),
                KeyCode::Char('c') => self.controller.dismiss_notice(),
                _ => {}
            },
            InputMode::EditingPath => match key.code {
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Enter => {
                    let path = std::mem::take(&mut self.path_input);
                    self.select_path(&path);
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Backspace => {
                    self.path_input.pop();
                }
                KeyCode::Char(c) => self.path_input.push(c),
                _ => {}
            },
        }
    }

    /// Empty path clears the selection; unreadable paths keep the old one.
    pub fn select_path(&mut self, path: &str) {
        let path = path.trim();
        if path.is_empty() {
            self.controller.select_file(None);
            return;
        }

        match UploadFile::from_path(std::path::Path::new(path)) {
            Ok(file) => {
                info!("Selected {} ({} bytes)", file.file_name, file.len());
                self.controller.select_file(Some(file));
                self.controller.dismiss_notice();
            }
            Err(e) => {
                warn!("Cannot read {}: {}", path, e);
                self.controller
                    .set_notice(Notice::validation(format!("Cannot read {}: {}", path, e)));
            }
        }
    }

    pub fn submit(&mut self) {
        // Rejections and in-flight no-ops are reported through the controller.
        let Ok(Some(submission)) = self.controller.submit() else {
            return;
        };

        let id = submission.id();
        let tx = self.completions_tx.clone();
        let request = self.runtime.spawn(submission.run());
        self.runtime.spawn(async move {
            let completion = match request.await {
                Ok(completion) => completion,
                Err(e) => {
                    warn!("analysis task {} ended without a result: {}", id, e);
                    Completion::aborted(id, e.to_string())
                }
            };
            let _ = tx.send(completion);
        });
    }

    /// Hand finished requests to the controller. Returns true if any arrived.
    pub fn poll_completions(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.controller.complete(completion);
            changed = true;
        }
        changed
    }

    pub fn export_report(&mut self) {
        let view = self.controller.dashboard();
        let industry = self.controller.selection().industry;

        let delivered = Report::from_view(view.as_ref(), industry, Utc::now())
            .and_then(|report| self.sink.deliver(&report));

        let notice = match delivered {
            Ok(location) => Notice::info(format!("Report saved to {}", location)),
            Err(e) => Notice::failure(format!("Report export failed: {}", e)),
        };
        self.controller.set_notice(notice);
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|f| ui(f, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        if app.poll_completions() {
            dirty = true;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(5), // Controls
            Constraint::Min(0),    // Dashboard
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0]);
    render_controls(f, chunks[1], app);

    if let Some(view) = app.controller.dashboard() {
        render_dashboard(f, chunks[2], &view);
    }

    render_status_bar(f, chunks[3], app);
}

fn rgb(hue: Hue) -> Color {
    Color::Rgb(hue.r, hue.g, hue.b)
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "SME FinHealth AI",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            "AI-Powered Credit Scoring, Tax Compliance & Financial Forecasting",
            Style::default().fg(Color::DarkGray),
        ),
    ])])
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_controls(f: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let selection = app.controller.selection();

    let file_line = if app.input_mode == InputMode::EditingPath {
        Line::from(vec![
            Span::styled("  Upload Financial Statement: ", label),
            Span::styled(format!("{}_", app.path_input), Style::default().fg(Color::White)),
            Span::styled("  (Enter confirm, Esc cancel)", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let file = match &selection.file {
            Some(file) => Span::styled(
                format!("{} ({} bytes)", file.file_name, file.len()),
                Style::default().fg(Color::Green),
            ),
            None => Span::styled("No file selected", Style::default().fg(Color::DarkGray)),
        };
        Line::from(vec![Span::styled("  Upload Financial Statement: ", label), file])
    };

    let button = if app.controller.is_busy() {
        Span::styled(
            "[ Analyzing Data... ]",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(
            "[ Generate AI Report ]",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
    };

    let content = vec![
        Line::from(vec![
            Span::styled("  Industry Segment: ", label),
            Span::raw("< "),
            Span::styled(selection.industry.label(), Style::default().fg(Color::White)),
            Span::raw(" >"),
        ]),
        file_line,
        Line::from(vec![Span::raw("  "), button]),
    ];

    let controls = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Upload "),
    );

    f.render_widget(controls, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    for (card, card_area) in view.cards.iter().zip(card_areas.iter()) {
        render_card(f, *card_area, card);
    }

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_chart(f, panels[0], view);
    render_advice(f, panels[1], view);
}

fn render_card(f: &mut Frame, area: Rect, card: &MetricCard) {
    let content = vec![
        Line::from(Span::styled(
            card.title.to_uppercase(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            card.value.display(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(card.accent))),
    );

    f.render_widget(widget, area);
}

fn render_chart(f: &mut Frame, area: Rect, view: &DashboardView) {
    let max = view
        .chart
        .iter()
        .map(|b| b.value.max(0.0))
        .fold(0.0_f64, f64::max);

    let bars: Vec<Bar> = view
        .chart
        .iter()
        .map(|bar| {
            Bar::default()
                .value(bar_height(bar.value, max))
                .label(Line::from(bar.label))
                .text_value(format_amount(bar.value))
                .style(Style::default().fg(rgb(bar.hue)))
                .value_style(Style::default().fg(Color::Black).bg(rgb(bar.hue)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", CHART_TITLE)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(BAR_SCALE)
        .bar_width(12)
        .bar_gap(3);

    f.render_widget(chart, area);
}

/// Height relative to the tallest bar, in `0..=BAR_SCALE`. Bars cannot go
/// below the axis; the label still shows the signed amount.
fn bar_height(value: f64, max: f64) -> u64 {
    if value > 0.0 && max > 0.0 {
        (value / max * BAR_SCALE as f64).round() as u64
    } else {
        0
    }
}

fn render_advice(f: &mut Frame, area: Rect, view: &DashboardView) {
    let panel = &view.advice;

    let mut content = vec![
        Line::from(Span::styled(
            "English Report:",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(panel.advice.clone()),
    ];

    if let Some(health) = &panel.health {
        content.push(Line::from(vec![
            Span::styled("Health: ", Style::default().fg(Color::Cyan)),
            Span::raw(health.clone()),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        forecast_line(panel),
        Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD),
    )));
    content.push(Line::from(Span::styled(
        security_line(panel),
        Style::default().fg(Color::DarkGray),
    )));
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("p", Style::default().fg(Color::Yellow)),
        Span::raw(" Download Investor-Ready Report"),
    ]));

    let advice = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(format!(" {} ", ADVICE_TITLE)),
        );

    f.render_widget(advice, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.controller.state().name()),
        Style::default().fg(Color::Cyan),
    )];
    status_spans.push(Span::raw("| "));

    if let Some(notice) = app.controller.notice() {
        let color = match notice.kind {
            NoticeKind::Validation => Color::Yellow,
            NoticeKind::Failure => Color::Red,
            NoticeKind::Info => Color::Green,
        };
        status_spans.push(Span::styled(notice.message.clone(), Style::default().fg(color)));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    } else {
        for (key, action) in [
            ("←/→", " Industry | "),
            ("f", " File | "),
            ("s", " Submit | "),
            ("p", " Report | "),
        ] {
            status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(action));
        }
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
