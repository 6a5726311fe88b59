#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::Category;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn txn(description: &str, amount: Decimal, category: Category, day: u32) -> Transaction {
    Transaction {
        id: Some(1),
        description: description.into(),
        amount,
        category,
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        timestamp: String::new(),
    }
}

#[test]
fn test_write_csv_rows() {
    let transactions = vec![
        txn("Groceries", dec!(-42.5), Category::Food, 5),
        txn("Salary", dec!(2000), Category::Salary, 1),
    ];
    let mut buf = Vec::new();
    let rows = write_csv(&mut buf, &transactions).unwrap();
    assert_eq!(rows, 2);

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Date,Description,Category,Type,Amount");
    assert_eq!(lines[1], "2024-03-05,Groceries,food,Expense,42.50");
    assert_eq!(lines[2], "2024-03-01,Salary,salary,Income,2000.00");
}

#[test]
fn test_write_csv_quotes_commas() {
    let transactions = vec![txn("Dinner, drinks", dec!(-30), Category::Entertainment, 2)];
    let mut buf = Vec::new();
    write_csv(&mut buf, &transactions).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("\"Dinner, drinks\""));
}

#[test]
fn test_zero_amount_exports_as_income() {
    let transactions = vec![txn("Refund", Decimal::ZERO, Category::Other, 3)];
    let mut buf = Vec::new();
    write_csv(&mut buf, &transactions).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.lines().nth(1).unwrap().ends_with("Income,0.00"));
}

#[test]
fn test_export_to_path_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let transactions = vec![txn("Bus", dec!(-2.75), Category::Transport, 9)];
    assert_eq!(export_to_path(&path, &transactions).unwrap(), 1);

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][2], "transport");
    assert_eq!(&records[0][3], "Expense");
    assert_eq!(&records[0][4], "2.75");
}

#[test]
fn test_export_empty_list_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(export_to_path(&path, &[]).unwrap(), 0);
    assert!(!path.exists());
}

#[test]
fn test_default_path_is_dated() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
    assert_eq!(
        default_path(today),
        PathBuf::from("finsavvy-export-2024-03-14.csv")
    );
}
