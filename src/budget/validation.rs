//! Validation of budget form input.

use std::str::FromStr;

use crate::{
    budget::domain::{BudgetFormData, BudgetPeriod},
    forms::FieldErrors,
};

pub const NAME_REQUIRED_MSG: &str = "Name is required";
pub const NAME_TOO_LONG_MSG: &str = "Name must be less than 100 characters";
pub const AMOUNT_NOT_A_NUMBER_MSG: &str = "Amount must be a number";
pub const AMOUNT_NOT_POSITIVE_MSG: &str = "Amount must be greater than 0";
pub const INVALID_PERIOD_MSG: &str = "Period must be monthly, weekly, or yearly";

/// The maximum number of characters allowed in a budget name.
pub const MAX_NAME_LENGTH: usize = 100;

/// A fully validated budget ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub name: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

/// A validated partial update. Fields left as `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub period: Option<BudgetPeriod>,
}

/// The raw strings submitted for a partial budget update.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct BudgetPatchFormData {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub period: Option<String>,
}

/// Validate the create-budget form, collecting all problems at once.
pub fn validate_new_budget(form: &BudgetFormData) -> Result<NewBudget, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = validate_name(&form.name, &mut errors);
    let amount = validate_amount(&form.amount, &mut errors);
    let period = validate_period(&form.period, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewBudget {
        name: name.unwrap_or_default(),
        amount: amount.unwrap_or_default(),
        period: period.unwrap_or(BudgetPeriod::Monthly),
    })
}

/// Validate a partial update. Absent fields pass through untouched, but any
/// present field must be valid on its own.
pub fn validate_budget_patch(form: &BudgetPatchFormData) -> Result<BudgetPatch, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = form
        .name
        .as_deref()
        .and_then(|name| validate_name(name, &mut errors));
    let amount = form
        .amount
        .as_deref()
        .and_then(|amount| validate_amount(amount, &mut errors));
    let period = form
        .period
        .as_deref()
        .and_then(|period| validate_period(period, &mut errors));

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(BudgetPatch {
        name,
        amount,
        period,
    })
}

fn validate_name(raw_name: &str, errors: &mut FieldErrors) -> Option<String> {
    let name = raw_name.trim();

    if name.is_empty() {
        errors.add("name", NAME_REQUIRED_MSG);
        return None;
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        errors.add("name", NAME_TOO_LONG_MSG);
        return None;
    }

    Some(name.to_owned())
}

fn validate_amount(raw_amount: &str, errors: &mut FieldErrors) -> Option<f64> {
    let amount = match raw_amount.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => {
            errors.add("amount", AMOUNT_NOT_A_NUMBER_MSG);
            return None;
        }
    };

    if amount <= 0.0 {
        errors.add("amount", AMOUNT_NOT_POSITIVE_MSG);
        return None;
    }

    Some(amount)
}

fn validate_period(raw_period: &str, errors: &mut FieldErrors) -> Option<BudgetPeriod> {
    match BudgetPeriod::from_str(raw_period) {
        Ok(period) => Some(period),
        Err(()) => {
            errors.add("period", INVALID_PERIOD_MSG);
            None
        }
    }
}
