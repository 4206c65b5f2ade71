//! Income and expense transactions recorded against budgets.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod validation;

pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transaction_entries, get_transaction_entries_for_budget, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{Transaction, TransactionId, TransactionKind, TransactionListEntry};
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use list::get_transactions_page;
pub(crate) use list::transaction_row;
pub use validation::{
    NewTransaction, TransactionPatch, validate_new_transaction, validate_transaction_patch,
};
