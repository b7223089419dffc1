mod caret;
mod surface;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as Panel, Borders, Paragraph},
};
use screenplay_config::Config;
use screenplay_engine::blocks::CONTENT_KINDS;
use screenplay_engine::pagination::overlay::FIRST_NUMBERED_PAGE;
use screenplay_engine::{Alignment, BlockKind, ScreenplaySession};
use std::{
    fs::File,
    io::{Stdout, stdout},
    time::{Duration, Instant},
};

use caret::Motion;
use surface::{COLUMNS_PER_INCH, TerminalSurface, wrap, wrap_width};

/// Longest the loop sleeps waiting for input when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

struct App {
    session: ScreenplaySession,
    started: Instant,
}

impl App {
    fn new(config: &Config) -> Self {
        let mut session = ScreenplaySession::new(config.page, &config.timing);
        session.format_block(BlockKind::SceneHeading, Duration::ZERO);
        Self {
            session,
            started: Instant::now(),
        }
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn surface(&self) -> TerminalSurface {
        TerminalSurface::layout(self.session.document(), self.session.geometry())
    }

    /// Fires every due timer against a fresh layout.
    fn tick(&mut self) {
        let now = self.now();
        while let Some(deadline) = self.session.next_deadline()
            && deadline <= now
        {
            let surface = self.surface();
            let report = self.session.tick(now, &surface);
            if let Some(outcome) = report.pagination {
                log::debug!("pagination pass: {outcome:?}");
            }
        }
    }

    fn poll_timeout(&self) -> Duration {
        self.session
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL)
    }

    /// Returns `false` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let now = self.now();
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Char(digit) if alt => {
                if let Some(kind) = BlockKind::from_shortcut_digit(digit) {
                    self.session.format_block(kind, now);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Err(err) = self.session.type_text(&c.to_string(), now) {
                    log::debug!("typing ignored: {err}");
                }
            }
            KeyCode::Enter => {
                self.session.press_enter(now);
            }
            KeyCode::Backspace => {
                if let Err(err) = self.session.delete_backward(now) {
                    log::debug!("delete ignored: {err}");
                }
            }
            KeyCode::Left => self.move_caret(Motion::Left),
            KeyCode::Right => self.move_caret(Motion::Right),
            KeyCode::Up => self.move_caret(Motion::Up),
            KeyCode::Down => self.move_caret(Motion::Down),
            KeyCode::Home => self.move_caret(Motion::Home),
            KeyCode::End => self.move_caret(Motion::End),
            _ => {}
        }
        true
    }

    fn move_caret(&mut self, motion: Motion) {
        let now = self.now();
        if let Some(point) = caret::moved(self.session.document(), motion)
            && let Err(err) = self.session.set_selection(point, now)
        {
            log::warn!("caret move rejected: {err}");
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    match &config.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config)?;
    log::info!("screenplay editor starting up");
    log::info!("Config path: {}", Config::config_path().display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(app.poll_timeout())? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)
        {
            return Ok(());
        }
    }
}

/// Rendered script lines plus the caret's row and column within them.
struct Script {
    lines: Vec<Line<'static>>,
    caret: Option<(usize, usize)>,
}

fn render_script(session: &ScreenplaySession) -> Script {
    let doc = session.document();
    let caret = doc.selection().map(|selection| selection.anchor);
    let mut lines = Vec::new();
    let mut caret_at = None;
    let mut page = 1;

    for block in doc.blocks() {
        if block.is_spacer() {
            page += 1;
            let label = if page >= FIRST_NUMBERED_PAGE {
                format!(" page {page} ")
            } else {
                String::new()
            };
            lines.push(Line::from(Span::styled(
                format!("{label:─^60}"),
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }

        let presentation = block.kind().presentation();
        if presentation.space_before_px > 0.0 && !lines.is_empty() {
            lines.push(Line::default());
        }

        let width = wrap_width(block);
        let indent = (presentation.indent_left_in * COLUMNS_PER_INCH).round() as usize;
        let mut style = Style::default();
        if presentation.bold {
            style = style.add_modifier(Modifier::BOLD);
        }

        let wrapped = wrap(&block.text(), width);
        for (index, line) in wrapped.iter().enumerate() {
            let pad = match presentation.alignment {
                Alignment::Left => indent,
                Alignment::Right => indent + width.saturating_sub(line.text.chars().count()),
            };
            if let Some(point) = caret
                && point.key == block.key()
                && point.offset >= line.start
                && wrapped.get(index + 1).is_none_or(|next| point.offset < next.start)
            {
                caret_at = Some((lines.len(), pad + point.offset - line.start));
            }
            lines.push(Line::from(Span::styled(
                format!("{}{}", " ".repeat(pad), line.text),
                style,
            )));
        }

        if presentation.space_after_px > 0.0 {
            lines.push(Line::default());
        }
    }

    Script {
        lines,
        caret: caret_at,
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let session = &app.session;
    let surface = app.surface();
    let script = render_script(session);

    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = script
        .caret
        .map(|(row, _)| row.saturating_sub(visible.saturating_sub(1)))
        .unwrap_or(0);

    let title = format!(
        "Screenplay ({} page{})",
        session.page_count(&surface),
        if session.page_count(&surface) == 1 { "" } else { "s" }
    );
    let script_panel = Paragraph::new(script.lines)
        .block(Panel::default().borders(Borders::ALL).title(title))
        .scroll((scroll as u16, 0));
    f.render_widget(script_panel, chunks[0]);

    if let Some((row, column)) = script.caret {
        f.set_cursor_position(Position::new(
            chunks[0].x + 1 + column as u16,
            chunks[0].y + 1 + (row - scroll) as u16,
        ));
    }

    // Format toolbar
    let mut spans = Vec::new();
    for kind in CONTENT_KINDS {
        let digit = kind.shortcut_digit().unwrap_or('?');
        let style = if kind == session.active_format() {
            Style::default().bg(Color::Yellow).fg(Color::Black)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" Alt+{digit} {kind} "), style));
    }
    spans.push(Span::raw(" | Esc: Quit"));

    let toolbar = Paragraph::new(vec![Line::from(spans)])
        .block(Panel::default().borders(Borders::ALL).title("Format"));
    f.render_widget(toolbar, chunks[1]);
}
