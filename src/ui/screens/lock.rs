use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::app::App;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    f.render_widget(Block::default().style(Style::default().bg(p.header_bg)), area);

    let width = 36.min(area.width);
    let height = 8.min(area.height);
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let masked: String = "●".repeat(app.pin_input.chars().count());
    let slots: String = "○".repeat(4usize.saturating_sub(app.pin_input.chars().count()));
    let status = if app.status_message.is_empty() {
        Span::styled("Enter your 4-digit PIN", p.dim_style())
    } else {
        Span::styled(app.status_message.clone(), Style::default().fg(p.red))
    };

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{masked}{slots}"),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(status),
        Line::from(Span::styled("Ctrl-q to quit", p.dim_style())),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.accent))
            .title(Span::styled(" FinSavvy is locked ", p.title_style())),
    );

    f.render_widget(Clear, popup);
    f.render_widget(text, popup);
}
