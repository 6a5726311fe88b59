use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::util::{format_signed, truncate};

fn title(app: &App) -> String {
    let filter = &app.filter;
    let mut parts = vec![filter.range.to_string()];
    if let Some(kind) = filter.kind {
        parts.push(kind.to_string());
    }
    if let Some(category) = filter.category {
        parts.push(category.to_string());
    }
    if !app.search_input.is_empty() {
        parts.push(format!("search: '{}'", app.search_input));
    }
    format!(
        "Transactions ({}) | {}",
        app.visible_transactions.len(),
        parts.join(" | ")
    )
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    if app.visible_transactions.is_empty() {
        let hint = if app.transactions.is_empty() {
            "Add one with :add <income|expense> <amount> <category> <description>"
        } else {
            "Nothing matches the current filters (f, y, c to cycle, Esc clears search)"
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No transactions", p.dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, p.dim_style())),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(panel(title(app), p)),
            area,
        );
        return;
    }

    let header = Row::new(
        ["Date", "Description", "Category", "Type", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(p.header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .visible_transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let amount_style = if txn.is_expense() {
                p.expense_style()
            } else {
                p.income_style()
            };
            let style = if i == app.transaction_index {
                p.selected_style()
            } else if i % 2 == 1 {
                p.alt_row_style()
            } else {
                p.normal_style()
            };

            Row::new(vec![
                Cell::from(txn.date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(txn.category.label()),
                Cell::from(txn.kind().to_string()),
                Cell::from(Span::styled(
                    format_signed(txn.amount, app.currency()),
                    amount_style,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(15),
        Constraint::Length(9),
        Constraint::Length(15),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(title(app), p));
    f.render_widget(table, area);
}
