//! Core business model domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionKind};

/// A validated, non-empty business model name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ModelName(String);

impl ModelName {
    /// Create a business model name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyModelName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyModelName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a business model name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a business model generates income, expenses or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Income,
    Expense,
    Both,
}

impl ModelKind {
    /// All kinds, in form drop-down order.
    pub const ALL: [ModelKind; 3] = [ModelKind::Both, ModelKind::Income, ModelKind::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Income => "income",
            ModelKind::Expense => "expense",
            ModelKind::Both => "both",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Income => "Income",
            ModelKind::Expense => "Expense",
            ModelKind::Both => "Both",
        }
    }

    /// Whether this model can be attached to a transaction of `kind`.
    pub fn accepts(&self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (ModelKind::Both, _)
                | (ModelKind::Income, TransactionKind::Income)
                | (ModelKind::Expense, TransactionKind::Expense)
        )
    }

    pub(crate) fn from_sql(raw: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw {
            "income" => Ok(ModelKind::Income),
            "expense" => Ok(ModelKind::Expense),
            "both" => Ok(ModelKind::Both),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("unknown business model kind {other:?}").into(),
            )),
        }
    }
}

/// Database identifier for a business model.
pub type ModelId = i64;

/// A way the seller does business, e.g. print-on-demand or digital downloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessModel {
    pub id: ModelId,
    pub name: ModelName,
    pub description: Option<String>,
    pub kind: ModelKind,
}

/// Form data for business model creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelFormData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: ModelKind,
}

#[cfg(test)]
mod model_kind_tests {
    use crate::transaction::TransactionKind;

    use super::ModelKind;

    #[test]
    fn accepts_matches_kind() {
        assert!(ModelKind::Both.accepts(TransactionKind::Income));
        assert!(ModelKind::Both.accepts(TransactionKind::Expense));
        assert!(ModelKind::Income.accepts(TransactionKind::Income));
        assert!(!ModelKind::Income.accepts(TransactionKind::Expense));
        assert!(ModelKind::Expense.accepts(TransactionKind::Expense));
        assert!(!ModelKind::Expense.accepts(TransactionKind::Income));
    }
}
