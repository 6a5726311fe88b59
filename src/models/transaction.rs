use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Classification by sign alone. Zero counts as income.
    pub fn of(amount: Decimal) -> Self {
        if amount < Decimal::ZERO {
            Self::Expense
        } else {
            Self::Income
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "+" => Some(Self::Income),
            "expense" | "exp" | "out" | "-" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Applies this type's sign to a user-entered magnitude.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount.abs(),
            Self::Expense => -amount.abs(),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    /// RFC 3339 instant of creation or last full replacement.
    pub timestamp: String,
}

impl Transaction {
    pub fn new(
        description: String,
        kind: TransactionType,
        amount: Decimal,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            description,
            amount: kind.signed(amount),
            category,
            date,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn kind(&self) -> TransactionType {
        TransactionType::of(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
