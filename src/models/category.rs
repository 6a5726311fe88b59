use super::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Shopping,
    Housing,
    Income,
    Salary,
    Freelance,
    Interest,
    Gift,
    Other,
}

impl Category {
    /// Stable storage key, also used for search matching.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Housing => "housing",
            Self::Income => "income",
            Self::Salary => "salary",
            Self::Freelance => "freelance",
            Self::Interest => "interest",
            Self::Gift => "gift",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Housing => "Housing",
            Self::Income => "Income",
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Interest => "Interest",
            Self::Gift => "Gift",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup by key. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all().iter().copied().find(|c| c.as_str() == lower)
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Utilities,
            Self::Entertainment,
            Self::Shopping,
            Self::Housing,
            Self::Income,
            Self::Salary,
            Self::Freelance,
            Self::Interest,
            Self::Gift,
            Self::Other,
        ]
    }

    /// The category vocabulary offered for a transaction type.
    pub fn for_type(kind: TransactionType) -> &'static [Category] {
        match kind {
            TransactionType::Expense => &[
                Self::Food,
                Self::Transport,
                Self::Utilities,
                Self::Entertainment,
                Self::Shopping,
                Self::Housing,
                Self::Other,
            ],
            TransactionType::Income => &[
                Self::Income,
                Self::Salary,
                Self::Freelance,
                Self::Interest,
                Self::Gift,
                Self::Other,
            ],
        }
    }

    pub fn allowed_for(&self, kind: TransactionType) -> bool {
        Self::for_type(kind).contains(self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
