use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing::{info, warn};

use crate::db::Database;
use crate::ui::app::{local_today, App, InputMode, PendingAction, Screen};
use crate::ui::commands::{self, switch_screen};
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

const CLOCK_POLL: Duration = Duration::from_secs(30);

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let settings = db.get_settings()?;
    let mut app = App::new(local_today, settings);
    app.refresh_all(db)?;
    info!(locked = app.is_locked(), "tui started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }
    info!("tui stopped");

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        app.sync_today();
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        // Idle redraws pick up a date change
        if !event::poll(CLOCK_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Locked => handle_lock_input(key, app, db)?,
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Search => handle_search_input(key, app),
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

fn is_quit(key: &event::KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

// ── Input handlers ───────────────────────────────────────────

fn handle_lock_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if is_quit(&key) {
        app.running = false;
        return Ok(());
    }
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() && app.pin_input.len() < 4 => {
            app.pin_input.push(c);
            if app.pin_input.len() == 4 {
                let candidate = std::mem::take(&mut app.pin_input);
                if db.verify_pin(&candidate)? {
                    app.input_mode = InputMode::Normal;
                    app.refresh_all(db)?;
                    app.set_status("Unlocked");
                } else {
                    app.set_status("Incorrect PIN");
                }
            }
        }
        KeyCode::Backspace => {
            app.pin_input.pop();
        }
        KeyCode::Esc => app.pin_input.clear(),
        _ => {}
    }
    Ok(())
}

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if is_quit(&key) {
        app.running = false;
        return Ok(());
    }
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.screen = Screen::Transactions;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(&screen) = Screen::all().get(idx) {
                switch_screen(app, db, screen)?;
            }
        }
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            switch_screen(app, db, screens[(idx + 1) % screens.len()])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('D') => commands::handle_command("delete", app, db)?,
        KeyCode::Char('f') if app.screen == Screen::Transactions => {
            app.cycle_date_range();
            app.set_status(format!("Showing: {}", app.filter.range));
        }
        KeyCode::Char('y') if app.screen == Screen::Transactions => {
            app.cycle_type_filter();
            let label = app.filter.kind.map_or("all".to_string(), |k| k.to_string());
            app.set_status(format!("Type: {label}"));
        }
        KeyCode::Char('c') if app.screen == Screen::Transactions => {
            app.cycle_category_filter();
            let label = app
                .filter
                .category
                .map_or("all".to_string(), |c| c.to_string());
            app.set_status(format!("Category: {label}"));
        }
        KeyCode::Char('p') if app.screen == Screen::Reports => {
            commands::handle_command("period", app, db)?;
        }
        KeyCode::Esc if app.screen == Screen::Transactions && !app.search_input.is_empty() => {
            app.search_input.clear();
            app.apply_filters();
            app.set_status("Search cleared");
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.apply_filters();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.apply_filters();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.apply_filters();
        }
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                run_pending(action, app, db)?;
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

fn run_pending(action: PendingAction, app: &mut App, db: &mut Database) -> Result<()> {
    match action {
        PendingAction::DeleteTransaction { id, description } => {
            if db.delete_transaction(id)? {
                info!(id, "transaction deleted from tui");
                app.set_status(format!("Deleted: {description}"));
            } else {
                app.set_status(format!("'{description}' was already deleted"));
            }
        }
        PendingAction::DeleteBudget { id, name } => {
            if db.delete_budget(id)? {
                info!(id, "budget deleted from tui");
                app.set_status(format!("Deleted budget: {name}"));
            } else {
                app.set_status(format!("Budget '{name}' was already deleted"));
            }
        }
        PendingAction::ClearAllData => {
            db.clear_all_data()?;
            warn!("all data cleared from tui");
            app.set_status("All data cleared");
        }
    }
    app.refresh_all(db)
}

// ── Navigation helpers ───────────────────────────────────────

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            let page = app.transaction_page();
            scroll_down(
                &mut app.transaction_index,
                &mut app.transaction_scroll,
                app.visible_transactions.len(),
                page,
            );
        }
        Screen::Budgets => {
            let page = app.budget_page();
            let len = app.budget_lines().len();
            scroll_down(&mut app.budget_index, &mut app.budget_scroll, len, page);
        }
        Screen::Dashboard | Screen::Reports => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::Budgets => scroll_up(&mut app.budget_index, &mut app.budget_scroll),
        Screen::Dashboard | Screen::Reports => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll);
        }
        Screen::Budgets => scroll_to_top(&mut app.budget_index, &mut app.budget_scroll),
        Screen::Dashboard | Screen::Reports => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            let page = app.transaction_page();
            scroll_to_bottom(
                &mut app.transaction_index,
                &mut app.transaction_scroll,
                app.visible_transactions.len(),
                page,
            );
        }
        Screen::Budgets => {
            let page = app.budget_page();
            let len = app.budget_lines().len();
            scroll_to_bottom(&mut app.budget_index, &mut app.budget_scroll, len, page);
        }
        Screen::Dashboard | Screen::Reports => {}
    }
}
