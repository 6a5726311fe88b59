use rust_decimal::Decimal;

use super::Category;

/// What a budget constrains: spending in one category, or the month's savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTarget {
    Category(Category),
    Savings,
}

impl BudgetTarget {
    /// Value of the `type` column.
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Category(_) => "category",
            Self::Savings => "savings",
        }
    }

    /// Value of the `category` column. Savings goals store `"savings"`.
    pub fn category_str(&self) -> &'static str {
        match self {
            Self::Category(c) => c.as_str(),
            Self::Savings => "savings",
        }
    }

    pub fn from_columns(kind: &str, category: &str) -> Option<Self> {
        match kind {
            "savings" => Some(Self::Savings),
            "category" => Category::parse(category).map(Self::Category),
            _ => None,
        }
    }

    /// Parses user input: `savings` or a category key.
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("savings") {
            Some(Self::Savings)
        } else {
            Category::parse(s).map(Self::Category)
        }
    }
}

impl std::fmt::Display for BudgetTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category(c) => write!(f, "{c}"),
            Self::Savings => write!(f, "Monthly Savings Goal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: Option<i64>,
    pub target: BudgetTarget,
    pub amount: Decimal,
    /// Format: "YYYY-MM"
    pub month: String,
}

impl Budget {
    pub fn new(target: BudgetTarget, amount: Decimal, month: String) -> Self {
        Self {
            id: None,
            target,
            amount,
            month,
        }
    }
}
