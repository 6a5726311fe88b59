use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::budgets::BudgetLine;
use crate::models::BudgetTarget;
use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::util::{format_amount, progress_bar, truncate};

/// `name  spent/budget [████░░] 42% status`, coloured by progress status.
pub(crate) fn budget_line(
    line: &BudgetLine,
    app: &App,
    bar_width: usize,
    name_style: Style,
) -> Line<'static> {
    let p = app.palette();
    let progress = line.progress;
    let color = p.status_color(progress.status());
    let verb = match line.budget.target {
        BudgetTarget::Savings => "saved",
        BudgetTarget::Category(_) => "spent",
    };
    let name = truncate(&line.budget.target.to_string(), 20);

    Line::from(vec![
        Span::styled(format!("{name:<21}"), name_style),
        Span::styled(
            format!(
                "{} {verb} of {} ",
                format_amount(progress.spent, app.currency()),
                format_amount(progress.budget, app.currency())
            ),
            Style::default().fg(color),
        ),
        Span::styled(progress_bar(progress.percentage, bar_width), Style::default().fg(color)),
        Span::styled(
            format!(" {:>3}%", progress.percentage),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let lines = app.budget_lines();
    let title = format!("Budgets for {}", app.today.format("%B %Y"));

    if lines.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No budgets set for this month", p.dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Use :budget <category> <amount> for a spending limit",
                p.dim_style(),
            )),
            Line::from(Span::styled(
                "or :budget savings <amount> for a savings goal",
                p.dim_style(),
            )),
        ])
        .centered()
        .block(panel(title, p));
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, line)| {
            let style = if i == app.budget_index {
                p.selected_style()
            } else if i % 2 == 0 {
                p.alt_row_style()
            } else {
                p.normal_style()
            };
            ListItem::new(budget_line(line, app, 20, style))
        })
        .collect();

    f.render_widget(List::new(items).block(panel(title, p)), area);
}
