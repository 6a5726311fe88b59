#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_with_separators() {
    assert_eq!(format_amount(dec!(1234567.891), "$"), "$1,234,567.89");
    assert_eq!(format_amount(dec!(999.9), "$"), "$999.90");
}

#[test]
fn test_format_amount_negative_and_zero() {
    assert_eq!(format_amount(dec!(-42.5), "$"), "-$42.50");
    assert_eq!(format_amount(Decimal::ZERO, "$"), "$0.00");
}

#[test]
fn test_format_amount_uses_currency_symbol() {
    assert_eq!(format_amount(dec!(1500), "€"), "€1,500.00");
    assert_eq!(format_amount(dec!(-3), "kr "), "-kr 3.00");
}

#[test]
fn test_format_signed() {
    assert_eq!(format_signed(dec!(20), "$"), "+$20.00");
    assert_eq!(format_signed(dec!(-20), "$"), "-$20.00");
    assert_eq!(format_signed(Decimal::ZERO, "$"), "$0.00");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate() {
    assert_eq!(truncate("hello", 5), "hello");
    assert_eq!(truncate("hello world", 5), "hell…");
    assert_eq!(truncate("hello", 0), "");
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café résumé", 5), "café…");
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

// ── progress_bar ──────────────────────────────────────────────

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(0, 4), "[░░░░]");
    assert_eq!(progress_bar(50, 4), "[██░░]");
    assert_eq!(progress_bar(100, 4), "[████]");
    // Out-of-range input is capped
    assert_eq!(progress_bar(250, 4), "[████]");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_keeps_cursor_visible() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);

    scroll_to_bottom(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (9, 7));
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!(index, 9);
}

#[test]
fn test_scroll_up_and_top() {
    let (mut index, mut scroll) = (4, 4);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (3, 3));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 0);
}

#[test]
fn test_clamp_cursor_after_shrink() {
    let (mut index, mut scroll) = (8, 6);
    clamp_cursor(&mut index, &mut scroll, 3);
    assert_eq!((index, scroll), (2, 2));

    clamp_cursor(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}
