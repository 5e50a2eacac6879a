//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionKind};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a category applies to income, expenses or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
    Both,
}

impl CategoryKind {
    /// All kinds, in form drop-down order.
    pub const ALL: [CategoryKind; 3] =
        [CategoryKind::Expense, CategoryKind::Income, CategoryKind::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
            CategoryKind::Both => "both",
        }
    }

    /// The label shown in tables and drop-downs.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
            CategoryKind::Both => "Income & Expense",
        }
    }

    /// Whether a category of this kind can label a transaction of `kind`.
    pub fn accepts(&self, kind: TransactionKind) -> bool {
        match self {
            CategoryKind::Both => true,
            CategoryKind::Income => kind == TransactionKind::Income,
            CategoryKind::Expense => kind == TransactionKind::Expense,
        }
    }

    pub(crate) fn from_sql(raw: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            "both" => Ok(CategoryKind::Both),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("unknown category kind {other:?}").into(),
            )),
        }
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A label for grouping transactions (e.g., 'Software', 'Ad Spend', 'Sales').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub kind: CategoryKind,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    pub kind: CategoryKind,
}

#[cfg(test)]
mod category_kind_tests {
    use crate::transaction::TransactionKind;

    use super::CategoryKind;

    #[test]
    fn both_accepts_either_transaction_kind() {
        assert!(CategoryKind::Both.accepts(TransactionKind::Income));
        assert!(CategoryKind::Both.accepts(TransactionKind::Expense));
    }

    #[test]
    fn income_only_accepts_income() {
        assert!(CategoryKind::Income.accepts(TransactionKind::Income));
        assert!(!CategoryKind::Income.accepts(TransactionKind::Expense));
    }

    #[test]
    fn expense_only_accepts_expense() {
        assert!(CategoryKind::Expense.accepts(TransactionKind::Expense));
        assert!(!CategoryKind::Expense.accepts(TransactionKind::Income));
    }
}
