use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::time::{Duration, Instant};

use webmail_tui::app::{App, View};
use webmail_tui::config::Config;
use webmail_tui::logging;
use webmail_tui::mail::HttpClient;
use webmail_tui::ui::{
    render_alerts, render_compose, render_compose_help, render_detail, render_help,
    render_mailbox,
};
use webmail_tui::worker::Worker;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Terminal client for a /emails webmail server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Server base URL, overrides [server] base_url
    #[arg(long)]
    server: Option<String>,
    /// Mailbox to open first (inbox, sent, archive)
    #[arg(long, default_value = "inbox")]
    mailbox: String,
    /// Open this email instead of a mailbox
    #[arg(long)]
    email: Option<u64>,
    /// Config file (default: <config dir>/webmail-tui/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log file, overrides [logging] file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref());
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }
    logging::init(&config.logging, cli.log_file.as_deref())?;
    tracing::info!(server = %config.server.base_url, "starting");

    let client = HttpClient::new(&config.server)?;
    let worker = Worker::spawn(client)?;

    let mut app = App::new(Arc::new(config));
    match cli.email {
        Some(id) => app.open_detail(id),
        None => app.load_mailbox(&cli.mailbox),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &worker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}

fn run(terminal: &mut Term, app: &mut App, worker: &Worker) -> Result<()> {
    loop {
        while let Some(done) = worker.try_recv() {
            app.apply(done);
        }
        for job in app.take_jobs() {
            worker.submit(job)?;
        }
        app.alerts.expire(Instant::now());

        terminal.draw(|f| render(app, f))?;

        // Poll with timeout so responses show up without input
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                handle_key(app, key, terminal)?;
            }
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    if app.view == View::MailboxList && app.handle_click(mouse.column, mouse.row) {
                        app.open_selected();
                    }
                }
            }
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, terminal: &mut Term) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match app.view {
        View::MailboxList => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('i') => app.load_mailbox("inbox"),
            KeyCode::Char('s') => app.load_mailbox("sent"),
            KeyCode::Char('a') => app.load_mailbox("archive"),
            KeyCode::Char('c') => app.open_compose(),
            KeyCode::Char('R') => app.reload(),
            KeyCode::Char('j') | KeyCode::Down => app.next(),
            KeyCode::Char('k') | KeyCode::Up => app.previous(),
            KeyCode::Enter => app.open_selected(),
            KeyCode::Char('x') => app.toggle_selected_archive(),
            _ => {}
        },
        View::EmailDetail => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.reload(),
            KeyCode::Char('j') | KeyCode::Down => app.detail_scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => app.detail_scroll_up(),
            KeyCode::Char('r') => app.reply(),
            KeyCode::Char('x') => app.toggle_detail_archive(),
            _ => {}
        },
        View::Compose => match key.code {
            KeyCode::Esc => app.reload(),
            KeyCode::Char('s') if ctrl => app.send(),
            KeyCode::Char('e') if ctrl => edit_in_editor(app, terminal)?,
            KeyCode::Tab => app.compose.focus = app.compose.focus.next(),
            KeyCode::BackTab => app.compose.focus = app.compose.focus.previous(),
            KeyCode::Enter => {
                if app.compose.focus == webmail_tui::app::ComposeField::Body {
                    app.compose.body.push('\n');
                } else {
                    app.compose.focus = app.compose.focus.next();
                }
            }
            KeyCode::Backspace => {
                app.compose.field_mut().pop();
            }
            KeyCode::Char(c) if !ctrl => app.compose.field_mut().push(c),
            _ => {}
        },
    }
    Ok(())
}

fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let config = app.config.clone();
    let theme = &config.theme;

    // Alerts on top, then the active view, then the help bar
    let alert_height = app.alerts.visible_count() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(alert_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    if alert_height > 0 {
        render_alerts(f, chunks[0], &app.alerts, theme);
    }

    match app.view {
        View::MailboxList => {
            app.set_list_area(chunks[1]);
            let rows = app.rows();
            render_mailbox(
                f,
                chunks[1],
                app.heading(),
                &rows,
                &mut app.list_state,
                app.loading,
                &config.layout,
                theme,
            );
            render_help(f, chunks[2], app.view, app.loading, theme);
        }
        View::EmailDetail => {
            render_detail(f, chunks[1], app.detail.as_ref(), app.detail_scroll, theme);
            render_help(f, chunks[2], app.view, app.loading, theme);
        }
        View::Compose => {
            render_compose(f, chunks[1], &app.compose, theme);
            render_compose_help(f, chunks[2], app.is_sending(), theme);
        }
    }
}

/// Hand the draft to $EDITOR and read it back
fn edit_in_editor(app: &mut App, terminal: &mut Term) -> Result<()> {
    use std::io::Write;

    let mut temp_file = tempfile::Builder::new().suffix(".eml").tempfile()?;
    write!(temp_file, "{}", app.compose.to_draft_text())?;
    temp_file.flush()?;
    let path = temp_file.path().to_owned();

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = Command::new(&editor).arg(&path).status();

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    terminal.clear()?;

    match status {
        Ok(status) if status.success() => {
            let content = std::fs::read_to_string(&path)?;
            app.compose.apply_draft_text(&content);
        }
        Ok(status) => tracing::warn!(%editor, ?status, "editor exited with failure, draft unchanged"),
        Err(e) => tracing::warn!(%editor, error = %e, "could not start editor"),
    }
    Ok(())
}
