mod app;
mod config;
mod content;
mod event;
mod session;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use app::{App, AppScreen};
use config::Config;
use content::banks::{EmbeddedBanks, QuestionBanks};
use content::category::CATEGORIES;
use content::loader::FALLBACK_CATEGORY;
use event::{AppEvent, EventHandler};
use session::game::Phase;
use ui::components::category_menu::CategoryMenu;
use ui::components::confirm_dialog::ConfirmDialog;
use ui::components::error_history::ErrorHistoryView;
use ui::components::leaderboard::Leaderboard;
use ui::components::question_card::QuestionCard;
use ui::components::result_card::ResultCard;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::name_input::InputResult;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "neonquiz", version, about = "Terminal trivia quiz against the clock")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Number of questions per quiz")]
    questions: Option<usize>,

    #[arg(short, long, help = "Seconds allowed per question")]
    seconds: Option<u32>,

    #[arg(long, help = "Check the bundled question banks and exit")]
    verify_banks: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verify_banks {
        return verify_banks();
    }

    init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("Using default config: {e}");
        Config::default()
    });
    if let Some(questions) = cli.questions {
        config.question_count = questions;
    }
    if let Some(seconds) = cli.seconds {
        config.seconds_per_question = seconds;
    }
    config.validate();

    let theme_name = cli.theme.as_deref().unwrap_or(&config.theme);
    let theme = Theme::load(theme_name).unwrap_or_else(|| {
        log::warn!("Unknown theme '{theme_name}', using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("Exited with error: {err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to `<data_dir>/neonquiz/neonquiz.log`; the terminal belongs to the UI.
fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("neonquiz")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("neonquiz.log"))
    else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn verify_banks() -> Result<()> {
    let banks = EmbeddedBanks;
    let mut broken = 0;
    for category in CATEGORIES {
        match banks.fetch(category.id) {
            Ok(questions) => println!("{:<16} {:>3} questions", category.id, questions.len()),
            Err(content::banks::BankError::Missing(_)) => {
                println!("{:<16}   - (uses '{FALLBACK_CATEGORY}')", category.id)
            }
            Err(e) => {
                broken += 1;
                println!("{:<16} ERROR {e}", category.id);
            }
        }
    }
    if broken > 0 {
        anyhow::bail!("{broken} question bank(s) failed to load");
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        // Countdowns follow the wall clock, so typing never starves them.
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Loading | AppScreen::Game => handle_game_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::Leaderboard => handle_leaderboard_key(app, key),
        AppScreen::About => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.go_home(),
            _ => {}
        },
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.prev_tab(),
        KeyCode::Down | KeyCode::Char('j') => app.home_next(),
        KeyCode::Up | KeyCode::Char('k') => app.home_prev(),
        KeyCode::Enter => app.start_selected(),
        KeyCode::Char('f') => app.toggle_favorite(),
        KeyCode::Char('e') => app.go_to_history(),
        KeyCode::Char('r') => app.go_to_leaderboard(),
        KeyCode::Char('?') => app.go_to_about(),
        _ => {}
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent) {
    // Exit confirmation owns input while shown.
    if app.exit_pending() {
        match key.code {
            KeyCode::Char('y') => app.go_home(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_exit(),
            _ => {}
        }
        return;
    }

    if app.session_phase() == Some(Phase::Empty) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.go_home();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.request_exit(),
        KeyCode::Down | KeyCode::Char('j') => app.highlight_next(),
        KeyCode::Up | KeyCode::Char('k') => app.highlight_prev(),
        KeyCode::Enter => app.confirm(),
        KeyCode::Char(' ') | KeyCode::Char('n') => app.next_question(),
        KeyCode::Char(ch @ '1'..='6') => app.select_option(ch as usize - '1' as usize),
        KeyCode::Char(ch @ 'a'..='f') => app.select_option(ch as usize - 'a' as usize),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    if let Some(input) = app.name_input.as_mut() {
        match input.handle(key) {
            InputResult::Submit => app.submit_name(),
            InputResult::Cancel => app.skip_name(),
            InputResult::Continue => app.name_error = None,
        }
        return;
    }

    match key.code {
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('l') => app.go_to_leaderboard(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_home(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    if app.history_confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.confirm_clear_history(),
            KeyCode::Char('n') | KeyCode::Esc => app.history_confirm_clear = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Down | KeyCode::Char('j') => app.history_next(),
        KeyCode::Up | KeyCode::Char('k') => app.history_prev(),
        KeyCode::Char(' ') | KeyCode::Char('m') => app.toggle_history_mark(),
        KeyCode::Char('r') | KeyCode::Enter => app.start_revision(),
        KeyCode::Char('x') | KeyCode::Delete => app.delete_selected_history(),
        KeyCode::Char('c') => app.request_clear_history(),
        _ => {}
    }
}

fn handle_leaderboard_key(app: &mut App, key: KeyEvent) {
    if app.ranking_confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.confirm_clear_ranking(),
            KeyCode::Char('n') | KeyCode::Esc => app.ranking_confirm_clear = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Char('c') => app.request_clear_ranking(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::Loading => render_loading(frame, app),
        AppScreen::Game => render_game(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
        AppScreen::Leaderboard => render_leaderboard(frame, app),
        AppScreen::About => render_about(frame, app),
    }

    let exit_overlay = matches!(app.screen, AppScreen::Loading | AppScreen::Game) && app.exit_pending();
    if exit_overlay {
        frame.render_widget(
            ConfirmDialog::new("Leave quiz", "Quit this quiz? Progress will be lost.", app.theme),
            area,
        );
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " neonquiz ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .take(area.height.max(1) as usize)
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    let info = format!(
        " | {} favorite(s) | {} question(s), {}s each",
        app.favorites.len(),
        app.config.question_count,
        app.config.seconds_per_question
    );
    render_header(frame, app, layout.header, &info);

    let categories = app.home_categories();
    let menu = CategoryMenu::new(
        app.tab,
        &categories,
        &app.favorites,
        app.home_selected,
        app.theme,
    );
    let menu_area = centered_rect(60, 100, 56, 12, layout.main);
    frame.render_widget(&menu, menu_area);

    render_footer(
        frame,
        app,
        layout.footer,
        &[
            "[Enter] Play",
            "[Tab] Switch tab",
            "[f] Favorite",
            "[e] Errors",
            "[r] Ranking",
            "[?] About",
            "[q] Quit",
        ],
    );
}

fn render_loading(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;
    let title = app.session.as_ref().map_or("", |s| s.title());
    render_header(frame, app, layout.header, &format!(" | {title}"));

    let area = centered_rect(40, 20, 30, 5, layout.main);
    let loading = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading questions...",
            Style::default()
                .fg(colors.accent_alt())
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::bordered().border_style(Style::default().fg(colors.border())));
    frame.render_widget(loading, area);

    render_footer(frame, app, layout.footer, &["[Esc] Leave"]);
}

fn render_game(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;
    let Some(session) = app.session.as_ref() else {
        return;
    };
    render_header(frame, app, layout.header, &format!(" | {}", session.title()));

    if session.phase() == Phase::Empty {
        let area = centered_rect(50, 20, 40, 5, layout.main);
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No questions available for this category.",
                Style::default().fg(colors.warning()),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(colors.border())));
        frame.render_widget(msg, area);
        render_footer(frame, app, layout.footer, &["[Esc] Home"]);
        return;
    }

    let card_area = centered_rect(70, 100, 60, 16, layout.main);
    frame.render_widget(
        QuestionCard::new(session, app.highlighted_option, app.theme),
        card_area,
    );

    let hints: &[&str] = if session.state().answer_checked {
        if session.is_last_question() {
            &["[Enter/n] See results", "[Esc] Leave"]
        } else {
            &["[Enter/n] Next question", "[Esc] Leave"]
        }
    } else {
        &["[1-4/a-d] Answer", "[j/k] Move", "[Enter] Choose", "[Esc] Leave"]
    };
    render_footer(frame, app, layout.footer, hints);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(session) = app.session.as_ref() else {
        return;
    };

    let centered = centered_rect(60, 60, 56, 16, area);
    let mut card = ResultCard::new(session.title(), session.result(), app.theme);
    card.errors_recorded = session.errors_recorded();
    card.position = app.last_position;
    card.is_revision = session.is_revision();
    frame.render_widget(card, centered);

    if let Some(input) = &app.name_input {
        render_name_prompt(frame, app, input);
    }
}

fn render_name_prompt(frame: &mut ratatui::Frame, app: &App, input: &ui::name_input::NameInput) {
    let colors = &app.theme.colors;
    let area = centered_rect(40, 30, 44, 8, frame.area());

    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(" New high score! ")
        .border_style(Style::default().fg(colors.warning()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let (before, cursor_ch, after) = input.render_parts();
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent_alt());
    let field = Line::from(vec![
        Span::styled(" > ", Style::default().fg(colors.accent())),
        Span::styled(before, Style::default().fg(colors.fg())),
        Span::styled(cursor_ch.map_or(" ".to_string(), |c| c.to_string()), cursor_style),
        Span::styled(after, Style::default().fg(colors.fg())),
    ]);

    let status = match &app.name_error {
        Some(e) => Line::from(Span::styled(format!(" {e}"), Style::default().fg(colors.incorrect()))),
        None => Line::from(""),
    };

    let lines = vec![
        Line::from(Span::styled(
            " Enter your name for the leaderboard:",
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        field,
        status,
        Line::from(Span::styled(
            " [Enter] Save  [Esc] Skip",
            Style::default().fg(colors.accent()),
        )),
    ];
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(
        ErrorHistoryView::new(
            &app.history,
            app.history_selected,
            &app.history_marked,
            app.theme,
        ),
        area,
    );
    if app.history_confirm_clear {
        frame.render_widget(
            ConfirmDialog::new("Clear history", "Delete every saved mistake?", app.theme),
            area,
        );
    }
}

fn render_leaderboard(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let mut board = Leaderboard::new(&app.ranking, Utc::now(), app.theme);
    board.highlight = app.last_position;
    frame.render_widget(board, area);
    if app.ranking_confirm_clear {
        frame.render_widget(
            ConfirmDialog::new("Clear leaderboard", "Remove every ranked score?", app.theme),
            area,
        );
    }
}

fn render_about(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = centered_rect(60, 60, 56, 14, frame.area());

    let lines = vec![
        Line::from(Span::styled(
            "neonquiz",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Each quiz draws {} random questions from the chosen category.",
            app.config.question_count
        )),
        Line::from(format!(
            "You have {} seconds per question; running out counts as a miss.",
            app.config.seconds_per_question
        )),
        Line::from("Wrong and timed-out answers are kept in Error History for revision."),
        Line::from("Top scores enter the local leaderboard."),
        Line::from(""),
        Line::from(Span::styled(
            format!("Version {}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(colors.muted()),
        )),
    ];

    let about = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(colors.fg()))
        .block(
            Block::bordered()
                .title(" About ")
                .border_style(Style::default().fg(colors.accent()))
                .style(Style::default().bg(colors.bg())),
        );
    frame.render_widget(about, area);

    let footer_area = Rect {
        y: area.y + area.height,
        height: 1,
        ..area
    };
    if footer_area.y < frame.area().height {
        render_footer(frame, app, footer_area, &["[Esc] Back"]);
    }
}
