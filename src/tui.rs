use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use miette::IntoDiagnostic;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, LookupResult, OpenResult, ProgressEvent, ProgressSink};
use crate::domain::Direction as NavDirection;
use crate::domain::DocumentId;
use crate::lookup::LookupStatus;
use crate::probe::DocumentLoader;

const HINTS_BROWSE: &str =
    "/ search  Tab filter  Enter lookup  v view  q quit";
const HINTS_VIEWER: &str = "←/→ prev/next  Esc close";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Browse,
    Viewer,
}

#[derive(Debug)]
struct ViewerState {
    document_id: DocumentId,
    dataset_name: String,
    via_gap: bool,
    status: String,
    loaded_url: Option<String>,
    done: bool,
}

enum WorkerMsg {
    Progress(u64, String),
    Done(u64, Result<OpenResult, String>),
}

struct ChannelSink {
    seq: u64,
    tx: Sender<WorkerMsg>,
}

impl ProgressSink for ChannelSink {
    fn event(&self, event: ProgressEvent) {
        let _ = self.tx.send(WorkerMsg::Progress(self.seq, event.message));
    }
}

/// Interactive browser over the registry: dataset table with gap rows,
/// filter cycling, an id lookup line, and a viewer pane whose probe runs
/// on a worker thread. Results from a superseded open are discarded by
/// sequence number, mirroring the session's generation guard.
pub struct Tui {
    view: View,
    input: String,
    input_focused: bool,
    filter: Option<u32>,
    lookup: Option<LookupResult>,
    viewer: Option<ViewerState>,
    open_seq: u64,
    tx: Sender<WorkerMsg>,
    rx: Receiver<WorkerMsg>,
}

impl Tui {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            view: View::Browse,
            input: String::new(),
            input_focused: false,
            filter: None,
            lookup: None,
            viewer: None,
            open_seq: 0,
            tx,
            rx,
        }
    }

    pub fn run<L>(&mut self, app: App<L>) -> miette::Result<()>
    where
        L: DocumentLoader + Clone + Send + 'static,
    {
        let mut stdout = io::stdout();
        enable_raw_mode().into_diagnostic()?;
        stdout.execute(EnterAlternateScreen).into_diagnostic()?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).into_diagnostic()?;
        terminal.clear().into_diagnostic()?;

        let result = self.event_loop(&mut terminal, &app);

        disable_raw_mode().into_diagnostic()?;
        let mut stdout = io::stdout();
        stdout.execute(LeaveAlternateScreen).into_diagnostic()?;
        result
    }

    fn event_loop<L>(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        app: &App<L>,
    ) -> miette::Result<()>
    where
        L: DocumentLoader + Clone + Send + 'static,
    {
        loop {
            self.drain_worker();

            terminal
                .draw(|frame| draw_ui(frame, self, app))
                .into_diagnostic()?;

            if event::poll(Duration::from_millis(120)).into_diagnostic()? {
                if let Event::Key(key) = event::read().into_diagnostic()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key, app) {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn drain_worker(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                WorkerMsg::Progress(seq, message) if seq == self.open_seq => {
                    if let Some(viewer) = self.viewer.as_mut() {
                        viewer.status = message;
                    }
                }
                WorkerMsg::Done(seq, outcome) if seq == self.open_seq => {
                    if let Some(viewer) = self.viewer.as_mut() {
                        viewer.done = true;
                        match outcome {
                            Ok(result) if result.loaded => {
                                viewer.status = format!(
                                    "loaded as .{}",
                                    result.extension.as_deref().unwrap_or("?")
                                );
                                viewer.loaded_url = result.url;
                            }
                            Ok(_) => {
                                viewer.status =
                                    "load exhausted: no candidate extension loaded".to_string();
                            }
                            Err(message) => viewer.status = message,
                        }
                    }
                }
                // Stale progress from an open the user has moved past.
                _ => {}
            }
        }
    }

    fn handle_key<L>(&mut self, key: KeyEvent, app: &App<L>) -> bool
    where
        L: DocumentLoader + Clone + Send + 'static,
    {
        if self.input_focused {
            match key.code {
                KeyCode::Esc => {
                    self.input.clear();
                    self.input_focused = false;
                    self.lookup = None;
                }
                KeyCode::Enter => {
                    self.lookup = Some(app.lookup(&self.input));
                    self.input_focused = false;
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(ch) => self.input.push(ch),
                _ => {}
            }
            return false;
        }

        match (self.view, key.code) {
            (View::Browse, KeyCode::Char('/')) => {
                self.input_focused = true;
            }
            (View::Viewer, KeyCode::Esc) => {
                self.close_viewer();
            }
            (View::Viewer, KeyCode::Left) => self.navigate(app, NavDirection::Backward),
            (View::Viewer, KeyCode::Right) => self.navigate(app, NavDirection::Forward),
            (View::Browse, KeyCode::Esc) => {
                self.lookup = None;
            }
            (View::Browse, KeyCode::Tab) => {
                self.filter = next_filter(self.filter, app);
            }
            (View::Browse, KeyCode::Char('v')) => {
                let id = self
                    .lookup
                    .as_ref()
                    .filter(|result| {
                        matches!(result.status, LookupStatus::Found | LookupStatus::Gap)
                    })
                    .and_then(|result| result.document_id.as_deref())
                    .and_then(DocumentId::parse);
                if let Some(id) = id {
                    self.open_viewer(app, id);
                }
            }
            (_, KeyCode::Char('q')) => return true,
            _ => {}
        }
        false
    }

    fn navigate<L>(&mut self, app: &App<L>, direction: NavDirection)
    where
        L: DocumentLoader + Clone + Send + 'static,
    {
        let Some(current) = self.viewer.as_ref().map(|viewer| viewer.document_id) else {
            return;
        };
        if let Some(next) = crate::navigate::navigate(app.registry(), current, direction) {
            self.open_viewer(app, next);
        }
    }

    fn open_viewer<L>(&mut self, app: &App<L>, id: DocumentId)
    where
        L: DocumentLoader + Clone + Send + 'static,
    {
        let Some(resolution) = app.registry().resolve(id) else {
            return;
        };

        // A new open supersedes whatever probe is still in flight.
        self.open_seq += 1;
        self.viewer = Some(ViewerState {
            document_id: id,
            dataset_name: resolution.dataset.name.clone(),
            via_gap: resolution.via_gap.is_some(),
            status: "probing...".to_string(),
            loaded_url: None,
            done: false,
        });
        self.view = View::Viewer;

        let seq = self.open_seq;
        let tx = self.tx.clone();
        let worker_app = app.clone();
        let input = id.to_string();
        thread::spawn(move || {
            let sink = ChannelSink {
                seq,
                tx: tx.clone(),
            };
            let outcome = worker_app
                .open(&input, &sink)
                .map_err(|err| err.to_string());
            let _ = tx.send(WorkerMsg::Done(seq, outcome));
        });
    }

    fn close_viewer(&mut self) {
        // Pending worker results for this open become stale via open_seq.
        self.open_seq += 1;
        self.viewer = None;
        self.view = View::Browse;
    }
}

impl Default for Tui {
    fn default() -> Self {
        Self::new()
    }
}

fn next_filter<L: DocumentLoader>(current: Option<u32>, app: &App<L>) -> Option<u32> {
    let ids: Vec<u32> = app
        .registry()
        .datasets
        .iter()
        .map(|dataset| dataset.id)
        .collect();
    match current {
        None => ids.first().copied(),
        Some(id) => ids
            .iter()
            .skip_while(|candidate| **candidate != id)
            .nth(1)
            .copied(),
    }
}

fn draw_ui<L: DocumentLoader>(frame: &mut ratatui::Frame<'_>, tui: &Tui, app: &App<L>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], tui);
    match tui.view {
        View::Browse => draw_browse(frame, chunks[1], tui, app),
        View::Viewer => draw_viewer(frame, chunks[1], tui),
    }
    draw_footer(frame, chunks[2], tui);
}

fn draw_header(frame: &mut ratatui::Frame<'_>, area: Rect, tui: &Tui) {
    let filter = match tui.filter {
        Some(id) => format!("dataset {id}"),
        None => "all".to_string(),
    };
    let title = Line::from(vec![
        Span::styled(
            "efta-locate",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  filter: {filter}")),
    ]);
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_browse<L: DocumentLoader>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    tui: &Tui,
    app: &App<L>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Length(4)])
        .split(area);

    let mut lines = Vec::new();
    for dataset in &app.registry().datasets {
        if tui.filter.is_some_and(|id| id != dataset.id) {
            continue;
        }
        lines.push(Line::from(format!(
            "{}  {} - {}  ({} files, {})",
            dataset.name, dataset.start_id, dataset.end_id, dataset.file_count, dataset.size_label
        )));
        if tui.filter.is_none() {
            if let Some(gap) = app
                .registry()
                .gaps
                .iter()
                .find(|gap| gap.start.value() == dataset.end_id.value() + 1)
            {
                lines.push(Line::from(Span::styled(
                    format!("  gap  {} - {}  (try datasets {:?})", gap.start, gap.end, gap.candidates),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Datasets")),
        chunks[0],
    );

    let input_style = if tui.input_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(tui.input.as_str(), input_style))).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Document id (EFTA00001234 or 1234)"),
        ),
        chunks[1],
    );

    let message = tui
        .lookup
        .as_ref()
        .map(|result| result.message.as_str())
        .unwrap_or("");
    frame.render_widget(
        Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Lookup")),
        chunks[2],
    );
}

fn draw_viewer(frame: &mut ratatui::Frame<'_>, area: Rect, tui: &Tui) {
    let mut lines = Vec::new();
    if let Some(viewer) = &tui.viewer {
        lines.push(Line::from(format!("Document: {}", viewer.document_id)));
        let mut dataset = format!("Dataset:  {}", viewer.dataset_name);
        if viewer.via_gap {
            dataset.push_str("  (gap fallback, best guess)");
        }
        lines.push(Line::from(dataset));
        lines.push(Line::from(format!("Status:   {}", viewer.status)));
        if let Some(url) = &viewer.loaded_url {
            lines.push(Line::from(format!("URL:      {url}")));
        }
        if !viewer.done {
            lines.push(Line::from(Span::styled(
                "probing candidate extensions...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Viewer")),
        area,
    );
}

fn draw_footer(frame: &mut ratatui::Frame<'_>, area: Rect, tui: &Tui) {
    let hints = match tui.view {
        View::Browse => HINTS_BROWSE,
        View::Viewer => HINTS_VIEWER,
    };
    frame.render_widget(
        Paragraph::new(hints).block(Block::default().borders(Borders::ALL)),
        area,
    );
}
