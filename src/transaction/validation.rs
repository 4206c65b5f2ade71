//! Validation of transaction form input.

use std::str::FromStr;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    budget::BudgetId,
    category::CategoryId,
    forms::FieldErrors,
    transaction::domain::{TransactionFormData, TransactionKind},
};

pub const INVALID_BUDGET_MSG: &str = "Invalid budget";
pub const INVALID_CATEGORY_MSG: &str = "Invalid category";
pub const AMOUNT_NOT_A_NUMBER_MSG: &str = "Amount must be a number";
pub const AMOUNT_ZERO_MSG: &str = "Amount cannot be zero";
pub const DESCRIPTION_TOO_LONG_MSG: &str = "Description must be less than 500 characters";
pub const INVALID_DATE_MSG: &str = "Invalid date format";
pub const INVALID_KIND_MSG: &str = "Type must be income or expense";

/// The maximum number of characters allowed in a description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Dates are accepted in this form only, e.g. "2026-08-27".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A fully validated transaction ready to insert.
///
/// The budget and category IDs are well formed but not yet checked against
/// the database. The endpoints do that while holding the connection.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub budget_id: BudgetId,
    pub category_id: Option<CategoryId>,
    pub amount: f64,
    pub description: String,
    pub date: Date,
    pub kind: TransactionKind,
}

/// A validated partial update. Fields left as `None` are not changed. The
/// category field distinguishes "leave alone" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub budget_id: Option<BudgetId>,
    pub category_id: Option<Option<CategoryId>>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub kind: Option<TransactionKind>,
}

/// The raw strings submitted for a partial transaction update.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TransactionPatchFormData {
    pub budget_id: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub kind: Option<String>,
}

/// Validate the create-transaction form, collecting all problems at once.
pub fn validate_new_transaction(
    form: &TransactionFormData,
) -> Result<NewTransaction, FieldErrors> {
    let mut errors = FieldErrors::default();

    let budget_id = validate_budget_id(&form.budget_id, &mut errors);
    let category_id = validate_category_id(form.category_id.as_deref(), &mut errors);
    let amount = validate_amount(&form.amount, &mut errors);
    let description = validate_description(&form.description, &mut errors);
    let date = validate_date(&form.date, &mut errors);
    let kind = validate_kind(&form.kind, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewTransaction {
        budget_id: budget_id.unwrap_or_default(),
        category_id: category_id.unwrap_or_default(),
        amount: amount.unwrap_or_default(),
        description: description.unwrap_or_default(),
        date: date.unwrap_or(Date::MIN),
        kind: kind.unwrap_or(TransactionKind::Expense),
    })
}

/// Validate a partial update. Absent fields pass through untouched, but any
/// present field must be valid on its own.
pub fn validate_transaction_patch(
    form: &TransactionPatchFormData,
) -> Result<TransactionPatch, FieldErrors> {
    let mut errors = FieldErrors::default();

    let budget_id = form
        .budget_id
        .as_deref()
        .and_then(|budget_id| validate_budget_id(budget_id, &mut errors));
    let category_id = form
        .category_id
        .as_deref()
        .and_then(|category_id| validate_category_id(Some(category_id), &mut errors));
    let amount = form
        .amount
        .as_deref()
        .and_then(|amount| validate_amount(amount, &mut errors));
    let description = form
        .description
        .as_deref()
        .and_then(|description| validate_description(description, &mut errors));
    let date = form
        .date
        .as_deref()
        .and_then(|date| validate_date(date, &mut errors));
    let kind = form
        .kind
        .as_deref()
        .and_then(|kind| validate_kind(kind, &mut errors));

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(TransactionPatch {
        budget_id,
        category_id,
        amount,
        description,
        date,
        kind,
    })
}

fn validate_budget_id(raw_budget_id: &str, errors: &mut FieldErrors) -> Option<BudgetId> {
    match raw_budget_id.trim().parse::<BudgetId>() {
        Ok(budget_id) => Some(budget_id),
        Err(_) => {
            errors.add("budget_id", INVALID_BUDGET_MSG);
            None
        }
    }
}

/// An absent, empty, or "none" category means no category. Anything else must
/// parse as an ID.
fn validate_category_id(
    raw_category_id: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<Option<CategoryId>> {
    let raw_category_id = match raw_category_id {
        None | Some("") | Some("none") => return Some(None),
        Some(raw_category_id) => raw_category_id,
    };

    match raw_category_id.trim().parse::<CategoryId>() {
        Ok(category_id) => Some(Some(category_id)),
        Err(_) => {
            errors.add("category_id", INVALID_CATEGORY_MSG);
            None
        }
    }
}

fn validate_amount(raw_amount: &str, errors: &mut FieldErrors) -> Option<f64> {
    let amount = match raw_amount.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => {
            errors.add("amount", AMOUNT_NOT_A_NUMBER_MSG);
            return None;
        }
    };

    if amount == 0.0 {
        errors.add("amount", AMOUNT_ZERO_MSG);
        return None;
    }

    Some(amount)
}

fn validate_description(raw_description: &str, errors: &mut FieldErrors) -> Option<String> {
    let description = raw_description.trim();

    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        errors.add("description", DESCRIPTION_TOO_LONG_MSG);
        return None;
    }

    Some(description.to_owned())
}

fn validate_date(raw_date: &str, errors: &mut FieldErrors) -> Option<Date> {
    match Date::parse(raw_date, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add("date", INVALID_DATE_MSG);
            None
        }
    }
}

fn validate_kind(raw_kind: &str, errors: &mut FieldErrors) -> Option<TransactionKind> {
    match TransactionKind::from_str(raw_kind) {
        Ok(kind) => Some(kind),
        Err(()) => {
            errors.add("kind", INVALID_KIND_MSG);
            None
        }
    }
}

#[cfg(test)]
mod new_transaction_tests {
    use time::macros::date;

    use crate::transaction::domain::{TransactionFormData, TransactionKind};

    use super::{
        AMOUNT_NOT_A_NUMBER_MSG, AMOUNT_ZERO_MSG, DESCRIPTION_TOO_LONG_MSG, INVALID_BUDGET_MSG,
        INVALID_CATEGORY_MSG, INVALID_DATE_MSG, INVALID_KIND_MSG, validate_new_transaction,
    };

    fn form() -> TransactionFormData {
        TransactionFormData {
            budget_id: "1".to_string(),
            category_id: None,
            amount: "42.50".to_string(),
            description: "Weekly shop".to_string(),
            date: "2026-08-27".to_string(),
            kind: "expense".to_string(),
        }
    }

    #[test]
    fn accepts_valid_transaction() {
        let transaction = validate_new_transaction(&form()).unwrap();

        assert_eq!(transaction.budget_id, 1);
        assert_eq!(transaction.category_id, None);
        assert_eq!(transaction.amount, 42.50);
        assert_eq!(transaction.description, "Weekly shop");
        assert_eq!(transaction.date, date!(2026 - 08 - 27));
        assert_eq!(transaction.kind, TransactionKind::Expense);
    }

    #[test]
    fn accepts_negative_amount() {
        let mut data = form();
        data.amount = "-42.50".to_string();

        let transaction = validate_new_transaction(&data).unwrap();

        assert_eq!(transaction.amount, -42.50);
    }

    #[test]
    fn rejects_zero_amount() {
        let mut data = form();
        data.amount = "0".to_string();

        let errors = validate_new_transaction(&data).unwrap_err();

        assert_eq!(errors.get("amount"), &[AMOUNT_ZERO_MSG.to_owned()]);
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let mut data = form();
        data.amount = "lots".to_string();

        let errors = validate_new_transaction(&data).unwrap_err();

        assert_eq!(errors.get("amount"), &[AMOUNT_NOT_A_NUMBER_MSG.to_owned()]);
    }

    #[test]
    fn rejects_malformed_budget_id() {
        let mut data = form();
        data.budget_id = "abc".to_string();

        let errors = validate_new_transaction(&data).unwrap_err();

        assert_eq!(errors.get("budget_id"), &[INVALID_BUDGET_MSG.to_owned()]);
    }

    #[test]
    fn treats_empty_and_none_category_as_absent() {
        for sentinel in [None, Some("".to_string()), Some("none".to_string())] {
            let mut data = form();
            data.category_id = sentinel;

            let transaction = validate_new_transaction(&data).unwrap();

            assert_eq!(transaction.category_id, None);
        }
    }

    #[test]
    fn accepts_numeric_category() {
        let mut data = form();
        data.category_id = Some("3".to_string());

        let transaction = validate_new_transaction(&data).unwrap();

        assert_eq!(transaction.category_id, Some(3));
    }

    #[test]
    fn rejects_malformed_category() {
        let mut data = form();
        data.category_id = Some("abc".to_string());

        let errors = validate_new_transaction(&data).unwrap_err();

        assert_eq!(
            errors.get("category_id"),
            &[INVALID_CATEGORY_MSG.to_owned()]
        );
    }

    #[test]
    fn accepts_empty_description() {
        let mut data = form();
        data.description = "".to_string();

        assert!(validate_new_transaction(&data).is_ok());
    }

    #[test]
    fn rejects_description_over_500_characters() {
        let mut data = form();
        data.description = "a".repeat(501);

        let errors = validate_new_transaction(&data).unwrap_err();

        assert_eq!(
            errors.get("description"),
            &[DESCRIPTION_TOO_LONG_MSG.to_owned()]
        );
    }

    #[test]
    fn accepts_description_of_exactly_500_characters() {
        let mut data = form();
        data.description = "a".repeat(500);

        assert!(validate_new_transaction(&data).is_ok());
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad_date in ["27/08/2026", "2026-8-27", "2026-02-30", "yesterday", ""] {
            let mut data = form();
            data.date = bad_date.to_string();

            let errors = validate_new_transaction(&data).unwrap_err();

            assert_eq!(
                errors.get("date"),
                &[INVALID_DATE_MSG.to_owned()],
                "date {bad_date:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut data = form();
        data.kind = "transfer".to_string();

        let errors = validate_new_transaction(&data).unwrap_err();

        assert_eq!(errors.get("kind"), &[INVALID_KIND_MSG.to_owned()]);
    }

    #[test]
    fn collects_errors_for_every_bad_field() {
        let data = TransactionFormData {
            budget_id: "abc".to_string(),
            category_id: Some("xyz".to_string()),
            amount: "zero".to_string(),
            description: "a".repeat(501),
            date: "tomorrow".to_string(),
            kind: "transfer".to_string(),
        };

        let errors = validate_new_transaction(&data).unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>().len(), 6);
    }
}
