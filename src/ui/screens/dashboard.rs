use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::aggregate;
use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::screens::budgets::budget_line;
use crate::ui::util::{format_amount, format_signed, truncate};

const RECENT_COUNT: usize = 8;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(6),    // Recent + budgets
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_recent(f, lower[0], app);
    render_budget_overview(f, lower[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let all = &app.transactions;
    let balance = aggregate::balance(all);
    let income = aggregate::total_income(all);
    let expenses = aggregate::total_expenses(all);
    let month_savings = app.budget_engine().savings();
    let income_count = all.iter().filter(|t| t.is_income()).count();
    let expense_count = all.iter().filter(|t| t.is_expense()).count();

    render_card(
        f,
        cards[0],
        app,
        "Balance",
        balance,
        p.signed_color(balance < Decimal::ZERO),
        format!("{} txns", all.len()),
    );
    render_card(
        f,
        cards[1],
        app,
        "Income",
        income,
        p.green,
        format!("{income_count} txns"),
    );
    render_card(
        f,
        cards[2],
        app,
        "Expenses",
        expenses,
        p.red,
        format!("{expense_count} txns"),
    );
    render_card(
        f,
        cards[3],
        app,
        "Saved This Month",
        month_savings,
        p.signed_color(month_savings < Decimal::ZERO),
        app.today.format("%B").to_string(),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    amount: Decimal,
    color: Color,
    subtitle: String,
) {
    let p = app.palette();
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            format_amount(amount, app.currency()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, p.dim_style())),
    ])
    .centered()
    .block(panel(title, p));

    f.render_widget(text, area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let recent = aggregate::recent(&app.transactions, RECENT_COUNT);
    if recent.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No transactions yet", p.dim_style())),
            Line::from(Span::styled(
                "Add one with :add expense 12.50 food Lunch",
                p.dim_style(),
            )),
        ])
        .centered()
        .block(panel("Recent Transactions", p));
        f.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = recent
        .iter()
        .map(|txn| {
            let amount_style = if txn.is_expense() {
                p.expense_style()
            } else {
                p.income_style()
            };
            Row::new(vec![
                Cell::from(txn.date.format("%b %d").to_string()),
                Cell::from(truncate(&txn.description, 28)),
                Cell::from(txn.category.label()),
                Cell::from(Span::styled(
                    format_signed(txn.amount, app.currency()),
                    amount_style,
                )),
            ])
            .style(p.normal_style())
        })
        .collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths).block(panel("Recent Transactions", p));
    f.render_widget(table, area);
}

fn render_budget_overview(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let lines = app.budget_lines();
    let title = format!("Budgets for {}", app.today.format("%B %Y"));
    if lines.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No budgets this month", p.dim_style())),
            Line::from(Span::styled(":budget food 300", p.dim_style())),
        ])
        .centered()
        .block(panel(title, p));
        f.render_widget(msg, area);
        return;
    }

    let bar_width = (area.width as usize).saturating_sub(30).clamp(6, 20);
    let text: Vec<Line> = lines
        .iter()
        .map(|line| budget_line(line, app, bar_width, p.normal_style()))
        .collect();
    f.render_widget(Paragraph::new(text).block(panel(title, p)), area);
}
