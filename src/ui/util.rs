use rust_decimal::Decimal;

/// Format an amount with the currency symbol, thousand separators and
/// 2 decimal places, e.g. `-1234.5` with `€` → `"-€1,234.50"`.
pub(crate) fn format_amount(val: Decimal, currency: &str) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{currency}{with_commas}.{dec_part}")
}

/// Like [`format_amount`] but always shows a leading `+` for income.
pub(crate) fn format_signed(val: Decimal, currency: &str) -> String {
    if val > Decimal::ZERO {
        format!("+{}", format_amount(val, currency))
    } else {
        format_amount(val, currency)
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Text gauge for a 0..=100 percentage.
pub(crate) fn progress_bar(percentage: u8, width: usize) -> String {
    let filled = (usize::from(percentage.min(100)) * width) / 100;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Keep a cursor inside a list that may have shrunk.
pub(crate) fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
