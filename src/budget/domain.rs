//! Core types for budgets.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::auth::UserID;

/// Alias for budget row IDs.
pub type BudgetId = i64;

/// How often a budget's allowance resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Weekly,
    Yearly,
}

impl BudgetPeriod {
    /// The lowercase string stored in the database and sent in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    /// All periods, in the order they appear in forms.
    pub fn all() -> [BudgetPeriod; 3] {
        [
            BudgetPeriod::Monthly,
            BudgetPeriod::Weekly,
            BudgetPeriod::Yearly,
        ]
    }
}

impl FromStr for BudgetPeriod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BudgetPeriod::Monthly),
            "weekly" => Ok(BudgetPeriod::Weekly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            _ => Err(()),
        }
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending budget owned by a single user.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserID,
    pub name: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

/// The raw strings submitted by the budget create and edit forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetFormData {
    pub name: String,
    pub amount: String,
    pub period: String,
}

#[cfg(test)]
mod budget_period_tests {
    use std::str::FromStr;

    use super::BudgetPeriod;

    #[test]
    fn parses_all_periods() {
        assert_eq!(
            BudgetPeriod::from_str("monthly"),
            Ok(BudgetPeriod::Monthly)
        );
        assert_eq!(BudgetPeriod::from_str("weekly"), Ok(BudgetPeriod::Weekly));
        assert_eq!(BudgetPeriod::from_str("yearly"), Ok(BudgetPeriod::Yearly));
    }

    #[test]
    fn rejects_unknown_period() {
        assert_eq!(BudgetPeriod::from_str("daily"), Err(()));
        assert_eq!(BudgetPeriod::from_str("Monthly"), Err(()));
        assert_eq!(BudgetPeriod::from_str(""), Err(()));
    }

    #[test]
    fn round_trips_through_as_str() {
        for period in BudgetPeriod::all() {
            assert_eq!(BudgetPeriod::from_str(period.as_str()), Ok(period));
        }
    }
}
