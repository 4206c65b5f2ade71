//! Budgets: named spending envelopes with an amount and reset period.

mod create;
mod db;
mod delete;
mod detail;
mod domain;
mod edit;
mod list;
mod validation;

pub use create::{create_budget_endpoint, get_new_budget_page};
pub use db::{
    create_budget, create_budget_table, delete_budget, get_budget, get_budget_spending,
    get_budgets, update_budget,
};
pub use delete::delete_budget_endpoint;
pub use detail::get_budget_detail_page;
pub use domain::{Budget, BudgetFormData, BudgetId, BudgetPeriod};
pub use edit::{get_edit_budget_page, update_budget_endpoint};
pub use list::get_budgets_page;
pub use validation::{BudgetPatch, NewBudget, validate_budget_patch, validate_new_budget};
