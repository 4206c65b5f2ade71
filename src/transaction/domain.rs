//! Core types for income and expense transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{budget::BudgetId, category::CategoryId};

/// Alias for transaction row IDs.
pub type TransactionId = i64;

/// Whether a transaction adds to or draws from a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// The lowercase string stored in the database and sent in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(()),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense entry against a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub budget_id: BudgetId,
    pub category_id: Option<CategoryId>,
    pub amount: f64,
    pub description: String,
    pub date: Date,
    pub kind: TransactionKind,
}

/// A transaction joined with the names needed for listing rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListEntry {
    pub transaction: Transaction,
    pub budget_name: String,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
}

/// The raw strings submitted by the transaction create form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFormData {
    pub budget_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    pub kind: String,
}
