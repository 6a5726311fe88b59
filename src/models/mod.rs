mod budget;
mod category;
mod settings;
mod transaction;

pub use budget::{Budget, BudgetTarget};
pub use category::Category;
pub use settings::{Settings, Theme};
pub use transaction::{Transaction, TransactionType};

#[cfg(test)]
mod tests;
