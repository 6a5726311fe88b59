use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate;
use crate::budgets::percentage;
use crate::report::{IncomeExpensePoint, TrendPoint};
use crate::ui::app::App;
use crate::ui::render::panel;
use crate::ui::util::{format_amount, progress_bar};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),      // Summary
            Constraint::Percentage(45), // Bars + breakdown
            Constraint::Min(6),         // Trend
        ])
        .split(area);

    let report = app.report();
    render_summary(f, chunks[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_income_expense(f, middle[0], app, &report.income_expense_series());
    render_breakdown(f, middle[1], app);
    render_trend(f, chunks[2], app, &report.trend_series());
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let summary = app.report().summary();
    let cell = |label: &str, amount: Decimal, style: Style| {
        vec![
            Span::styled(format!("{label}: "), p.dim_style()),
            Span::styled(
                format_amount(amount, app.currency()),
                style.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
        ]
    };
    let mut spans = cell("Income", summary.income, p.income_style());
    spans.extend(cell("Expenses", summary.expenses, p.expense_style()));
    spans.extend(cell(
        "Net Savings",
        summary.net_savings,
        Style::default().fg(p.signed_color(summary.net_savings < Decimal::ZERO)),
    ));

    let title = format!(
        "{} (since {})",
        app.report_period,
        app.report().window_start().format("%b %-d, %Y")
    );
    let text = Paragraph::new(Line::from(spans))
        .centered()
        .block(panel(title, p));
    f.render_widget(text, area);
}

fn to_bar_value(amount: Decimal) -> u64 {
    amount.round().to_u64().unwrap_or(0)
}

fn render_income_expense(f: &mut Frame, area: Rect, app: &App, series: &[IncomeExpensePoint]) {
    let p = app.palette();
    let mut chart = BarChart::default()
        .block(panel("Income vs Expenses", p))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2)
        .value_style(Style::default().fg(p.header_bg));

    for point in series {
        let bars = [
            Bar::default()
                .value(to_bar_value(point.income))
                .text_value(String::new())
                .style(Style::default().fg(p.green)),
            Bar::default()
                .value(to_bar_value(point.expenses))
                .text_value(String::new())
                .style(Style::default().fg(p.red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(point.label.clone()))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let breakdown = app.report().category_breakdown();
    if breakdown.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No spending in this period",
            p.dim_style(),
        )))
        .centered()
        .block(panel("Spending by Category", p));
        f.render_widget(msg, area);
        return;
    }

    let total: Decimal = breakdown.values().copied().sum();
    let bar_width = (area.width as usize).saturating_sub(32).clamp(4, 16);
    let lines: Vec<Line> = aggregate::ranked_categories(&breakdown)
        .into_iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|(category, amount)| {
            let share = percentage(amount, total);
            Line::from(vec![
                Span::styled(format!("{:<14}", category.label()), p.normal_style()),
                Span::styled(progress_bar(share, bar_width), Style::default().fg(p.accent)),
                Span::styled(format!(" {share:>3}% "), p.dim_style()),
                Span::styled(format_amount(amount, app.currency()), p.expense_style()),
            ])
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(panel("Spending by Category", p)),
        area,
    );
}

fn render_trend(f: &mut Frame, area: Rect, app: &App, series: &[TrendPoint]) {
    let p = app.palette();
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, point.running_balance.to_f64().unwrap_or(0.0)))
        .collect();

    let (min, max) = points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
    let span = if max > min { max - min } else { 1.0 };
    let y_bounds = [min - span * 0.05, max + span * 0.05];
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let x_labels: Vec<String> = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => {
            vec![first.label.clone(), last.label.clone()]
        }
        (Some(only), _) => vec![only.label.clone()],
        _ => Vec::new(),
    };
    let y_labels = vec![
        format_amount(Decimal::from_f64_retain(min).unwrap_or_default().round(), app.currency()),
        format_amount(Decimal::from_f64_retain(max).unwrap_or_default().round(), app.currency()),
    ];

    let datasets = vec![Dataset::default()
        .name("Running balance")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(p.accent))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(panel("Balance Trend", p))
        .x_axis(
            Axis::default()
                .style(p.dim_style())
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(p.dim_style())
                .bounds(y_bounds)
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}
