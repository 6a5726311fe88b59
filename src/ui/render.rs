use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::screens;
use super::theme::Palette;

pub(crate) fn render(f: &mut Frame, app: &App) {
    if app.is_locked() {
        screens::lock::render(f, f.area(), app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area(), app.palette());
    }
}

/// Bordered block with the dim bold title used by every panel.
pub(crate) fn panel<'a>(title: impl Into<String>, p: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(p.border_style())
        .title(Span::styled(format!(" {} ", title.into()), p.title_style()))
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = i + 1;
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), p.dim_style()),
                    Span::styled(
                        format!("{s}"),
                        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{s}"), p.dim_style()))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(p.overlay)))
        .style(Style::default().bg(p.header_bg));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Dashboard => screens::dashboard::render(f, area, app),
        Screen::Transactions => screens::transactions::render(f, area, app),
        Screen::Budgets => screens::budgets::render(f, area, app),
        Screen::Reports => screens::reports::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => p.accent,
        InputMode::Command => p.green,
        InputMode::Search => p.yellow,
        InputMode::Confirm | InputMode::Locked => p.red,
    };
    let mode_style = Style::default()
        .fg(p.header_bg)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = match app.screen {
        Screen::Reports => format!(" {} | {} ", app.screen, app.report_period),
        _ => format!(
            " {} | {} | {} txns ",
            app.screen,
            app.today.format("%b %Y"),
            app.transactions.len()
        ),
    };

    let right = match app.screen {
        Screen::Dashboard => " :add | :budget | ? help ",
        Screen::Transactions => " f range | y type | c category | D delete | / search ",
        Screen::Budgets => " :budget <target> <amount> | D delete ",
        Screen::Reports => " p period | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(mode_label, mode_style),
        Span::styled(info, p.status_bar_style()),
        Span::styled(" ".repeat(pad), p.status_bar_style()),
        Span::styled(right, p.status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(p.accent)),
                Span::styled(&app.command_input, p.command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => {
            let match_info = if app.search_input.is_empty() {
                String::new()
            } else {
                format!("  ({} matches)", app.visible_transactions.len())
            };
            (
                Line::from(vec![
                    Span::styled("/", Style::default().fg(p.yellow)),
                    Span::styled(&app.search_input, p.command_bar_style()),
                    Span::styled(match_info, p.dim_style()),
                ]),
                Some(1 + app.search_input.chars().count() as u16),
            )
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(p.yellow)),
                Span::styled(" [y/N] ", Style::default().fg(p.red)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Locked => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, / to search, ? for help",
                    p.dim_style(),
                ))
            } else {
                Line::from(Span::styled(&app.status_message, p.command_bar_style()))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(p.command_bg));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect, p: &Palette) {
    let key_lines = [
        "  j/k or Up/Down   Move cursor           1-4        Switch tabs",
        "  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom",
        "  f (Transactions) Cycle date range      y          Cycle type",
        "  c (Transactions) Cycle category        D          Delete selected",
        "  p (Reports)      Cycle period          Ctrl-q     Quit",
        "  :               Command mode           /          Search (live)",
    ];

    let mut help_text = vec![
        Line::from(Span::styled(
            " FinSavvy Help ",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Keys", p.section_style())),
    ];
    help_text.extend(
        key_lines
            .iter()
            .map(|l| Line::from(Span::styled(*l, p.normal_style()))),
    );
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Commands", p.section_style())));

    // Built from the registry; aliases share a description and are skipped
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = commands::COMMANDS
        .iter()
        .filter(|(name, _)| name.len() > 1)
        .map(|(name, cmd)| (*name, cmd.description))
        .collect();
    cmd_lines.sort_by_key(|(name, _)| *name);
    cmd_lines.retain(|(_, desc)| seen.insert(*desc));
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            p.normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        p.dim_style(),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 76.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.accent))
            .style(Style::default().bg(p.header_bg)),
    );
    f.render_widget(help, popup_area);
}
